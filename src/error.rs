use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by loading, cleaning, and filtering functions.
///
/// This is a single error enum shared by every stage. Use [`PipelineError::kind`] to classify a
/// failure as a data-load, schema, conversion, or configuration problem.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited reader rejected the input (e.g. a record with the wrong number of fields).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input is structurally unusable (e.g. no header row).
    #[error("malformed input: {message}")]
    Malformed { message: String },

    /// A column required by a stage is absent.
    #[error("schema mismatch: {message}")]
    Schema { message: String },

    /// A value could not be converted to the type a stage requires.
    #[error("failed to convert value at row {row} column '{column}': {message} (raw='{raw}')")]
    Conversion {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Coarse classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input file missing, unreadable, or malformed.
    DataLoad,
    /// Expected column absent.
    Schema,
    /// A field cannot be parsed as the required type.
    Conversion,
    /// Invalid configuration.
    Config,
}

impl PipelineError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Io(_) | PipelineError::Csv(_) | PipelineError::Malformed { .. } => {
                ErrorKind::DataLoad
            }
            PipelineError::Schema { .. } => ErrorKind::Schema,
            PipelineError::Conversion { .. } => ErrorKind::Conversion,
            PipelineError::Config { .. } => ErrorKind::Config,
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        PipelineError::Schema {
            message: message.into(),
        }
    }

    pub(crate) fn missing_column(column: &str, available: &[&str]) -> Self {
        PipelineError::Schema {
            message: format!("missing required column '{column}'. columns={available:?}"),
        }
    }
}
