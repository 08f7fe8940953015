use thiserror::Error;

/// Errors raised by the timeline core.
///
/// None of these are fatal: every variant is recoverable by correcting the
/// input or picking another document.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No phase at position {position} (project has {len} phases)")]
    Index { position: usize, len: usize },

    #[error("Project document not found: {0}")]
    NotFound(String),

    #[error("Malformed project document {document}: {reason}")]
    Parse { document: String, reason: String },

    #[error("Nothing to generate: the project has no phases")]
    EmptyTimeline,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet export failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
