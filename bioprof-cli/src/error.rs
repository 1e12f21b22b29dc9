use bioprof_core::CoreError;
use thiserror::Error;

/// CLI-level errors, including the ones the core crate has no business
/// knowing about (missing external tracer, bad CLI arguments).
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("prerequisite missing: {reason}")]
    PrereqMissing { reason: String },

    #[error("invalid argument: {reason}")]
    Usage { reason: String },

    #[error("tracer invocation failed: {reason}")]
    TracerFailed { reason: String },

    #[error("failed to package archive: {reason}")]
    ArchivePackagingFailed { reason: String },
}

impl CliError {
    /// Exit code per spec §6's table.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::PrereqMissing { .. } => 1,
            CliError::Core(CoreError::InputCorrupt { .. }) => 9,
            CliError::Core(CoreError::ParseError { .. }) => 3,
            CliError::Core(CoreError::GeometryInvalid { .. }) => 9,
            CliError::Core(CoreError::ValidationError { .. }) => 2,
            CliError::Core(CoreError::Io(_)) => 9,
            CliError::Usage { .. } => 2,
            CliError::TracerFailed { .. } => 7,
            CliError::ArchivePackagingFailed { .. } => 8,
        }
    }
}
