use thiserror::Error;

/// Errors raised at the collaborator boundary: config, batch caps, and input parsing.
///
/// Classifying a row never fails; these only come out of [`crate::engine::run`]
/// and the [`crate::loader`] helpers.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (zero row cap, bad delimiter, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Batch exceeds the configured row cap.
    #[error("batch of {rows} rows exceeds maximum of {max}")]
    BatchTooLarge { rows: usize, max: usize },
    /// Batch wall-clock limit exceeded.
    #[error("batch took {elapsed_ms}ms, limit is {limit_ms}ms")]
    Timeout { elapsed_ms: u64, limit_ms: u64 },
    /// Malformed CSV/TSV record.
    #[error("CSV error: {0}")]
    Csv(String),
    /// Malformed JSON input.
    #[error("JSON error: {0}")]
    Json(String),
    /// IO error (file read, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl From<csv::Error> for ClassifyError {
    fn from(error: csv::Error) -> Self {
        ClassifyError::Csv(error.to_string())
    }
}

impl From<serde_json::Error> for ClassifyError {
    fn from(error: serde_json::Error) -> Self {
        ClassifyError::Json(error.to_string())
    }
}

impl From<std::io::Error> for ClassifyError {
    fn from(error: std::io::Error) -> Self {
        ClassifyError::Io(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
