//! Loader: ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - picks the delimiter from the file extension (or you can override via [`IngestionOptions`])
//! - infers the schema from the header row, applying caller-supplied type hints
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]

pub mod csv;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    LogObserver,
};
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions};
