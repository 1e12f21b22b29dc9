use crate::error::CliError;
use bioprof_core::config::Config;
use std::path::{Path, PathBuf};
use tracing::info;

/// Run `post`: analyze an already-captured archive and print the report.
pub fn run(
    archive: &Path,
    work_dir: Option<PathBuf>,
    bucket_size: Option<u64>,
    percent: Option<f64>,
    top_count_limit: Option<usize>,
) -> Result<String, CliError> {
    if !archive.exists() {
        return Err(CliError::Core(bioprof_core::CoreError::InputCorrupt {
            reason: format!("archive not found: {}", archive.display()),
        }));
    }

    let mut config = Config::default();
    if let Some(b) = bucket_size {
        config.bucket_size = b;
    }
    if let Some(p) = percent {
        config.percent = p;
    }
    if let Some(t) = top_count_limit {
        config.top_count_limit = t;
    }

    let work_dir = work_dir.unwrap_or_else(|| std::env::temp_dir().join("bioprof-work"));

    info!(archive = %archive.display(), work_dir = %work_dir.display(), "running post analysis");
    let (report, geometry) = bioprof_core::profile_archive(archive, &work_dir, &config)?;

    Ok(bioprof_core::report::render(&report, &geometry))
}
