use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the ingestion-and-aggregation pipeline.
///
/// `GeometryInvalid` and `InputCorrupt`/`ParseError` are fatal to the job
/// that raised them; `ValidationError` is surfaced as a usage error by
/// callers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("geometry text is missing or incomplete: {reason}")]
    GeometryInvalid { reason: String },

    #[error("input archive is corrupt: {reason}")]
    InputCorrupt { reason: String },

    #[error("failed to read shard {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid argument: {reason}")]
    ValidationError { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
