//! `school-dashboard` turns two per-school tables into the data behind a race and poverty
//! dashboard:
//!
//! - an enrollment table with per-grade and per-school total rows, race/ethnicity counts and
//!   percentages
//! - a free/reduced-price lunch (FRPL) table with a poverty percentage per school
//!
//! The pipeline, in order:
//!
//! 1. [`ingestion`]: load each delimited file into a [`types::DataSet`] (schema from the header)
//! 2. [`cleaning`]: reduce enrollment to one row per school, drop non-school poverty rows
//! 3. [`join`]: left-join on `school_name`
//! 4. [`select`]: apply the size range and school inclusion filters, flag high-poverty schools
//! 5. [`reshape`]: unpivot race counts into a long table
//! 6. [`views`]: aggregate the long table for each chart view
//!
//! [`pipeline::PreparedData`] caches steps 1–3 so that filter changes only re-run steps 4–5.
//!
//! ## Example
//!
//! ```rust
//! use school_dashboard::pipeline::{PipelineOptions, PreparedData};
//! use school_dashboard::types::{DataSet, DataType, Field, Schema, Value};
//! use school_dashboard::views::{aggregate, ChartView};
//!
//! let header = [
//!     "school_name", "school_group", "grade", "tot", "na_num", "na_pct", "aa_num", "aa_pct",
//!     "as_num", "as_pct", "hi_num", "hi_pct", "wh_num", "wh_pct", "pi_pct", "blank_col",
//! ];
//! let enrollment = DataSet::new(
//!     Schema::new(header.iter().map(|h| Field::new(*h, DataType::Utf8)).collect()),
//!     vec![
//!         ["X Total", "E", "ALL", "100", "50", "50%", "30", "30%", "0", "0%", "10", "10%", "10",
//!          "10%", "80%", ""]
//!             .iter()
//!             .map(|v| if v.is_empty() { Value::Null } else { Value::Utf8(v.to_string()) })
//!             .collect(),
//!     ],
//! );
//! let lunch = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("school_name", DataType::Utf8),
//!         Field::new("frpl_pct", DataType::Utf8),
//!     ]),
//!     vec![vec![Value::Utf8("X".into()), Value::Utf8("80%".into())]],
//! );
//!
//! let prepared = PreparedData::from_datasets(&enrollment, &lunch, PipelineOptions::default())?;
//! let dashboard = prepared.run(&prepared.default_filter())?;
//! assert_eq!(dashboard.long.len(), 4);
//! assert!(dashboard.long.iter().all(|r| r.high_poverty));
//!
//! let poverty = aggregate(ChartView::PovertyCharts, &dashboard.long);
//! assert_eq!(poverty.slices[0].population, 100);
//! # Ok::<(), school_dashboard::PipelineError>(())
//! ```
//!
//! ## Modules
//!
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: generic dataset transformations (filter/map/reduce/column ops)
//! - [`model`]: typed rows for each stage
//! - [`pipeline`]: stage orchestration and observer hooks
//! - [`export`]: CSV/JSON writers
//! - [`config`]: configuration file for the CLI
//! - [`error`]: the error type shared by every stage

pub mod cleaning;
pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod join;
pub mod model;
pub mod pipeline;
pub mod processing;
pub mod reshape;
pub mod select;
pub mod types;
pub mod views;

pub use error::{ErrorKind, PipelineError, PipelineResult};
