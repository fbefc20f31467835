//! Error types shared by the loader, the filter and the predictor.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    /// 1-based data row (header excluded).
    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Per-interaction errors shown inline; everything else aborts startup.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SchemaMismatch(_) | Self::Inference(_))
    }
}
