use crate::error::CliError;
use std::path::{Path, PathBuf};
use tracing::warn;

const MIN_DURATION_SECS: u64 = 3;

/// Validate `trace` arguments and derive the archive path the (unimplemented)
/// tracer invocation would produce.
///
/// Invoking the external tracer is out of scope (spec §1): this function
/// validates arguments up through archive naming, then fails with
/// [`CliError::PrereqMissing`].
pub fn run(device: &Path, duration_secs: u64, out_dir: &Path) -> Result<PathBuf, CliError> {
    if !device.starts_with("/dev/") {
        return Err(CliError::Usage {
            reason: format!("{} does not look like a block device path", device.display()),
        });
    }
    if duration_secs < MIN_DURATION_SECS {
        return Err(CliError::Usage {
            reason: format!("duration must be at least {MIN_DURATION_SECS}s, got {duration_secs}s"),
        });
    }

    let device_name = device
        .file_name()
        .ok_or_else(|| CliError::Usage {
            reason: format!("cannot derive device name from {}", device.display()),
        })?
        .to_string_lossy();
    let archive_path = out_dir.join(format!("{device_name}.tar"));

    warn!(
        device = %device.display(),
        duration_secs,
        archive = %archive_path.display(),
        "tracer invocation is not implemented by this crate"
    );

    Err(CliError::PrereqMissing {
        reason: format!(
            "no block-I/O tracer is wired up; would have captured {duration_secs}s from {} into {}",
            device.display(),
            archive_path.display()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_device_paths() {
        let err = run(Path::new("not-a-device"), 10, Path::new(".")).unwrap_err();
        assert!(matches!(err, CliError::Usage { .. }));
    }

    #[test]
    fn rejects_short_durations() {
        let err = run(Path::new("/dev/sdb"), 1, Path::new(".")).unwrap_err();
        assert!(matches!(err, CliError::Usage { .. }));
    }

    #[test]
    fn valid_arguments_fail_with_prereq_missing() {
        let err = run(Path::new("/dev/sdb"), 10, Path::new(".")).unwrap_err();
        assert!(matches!(err, CliError::PrereqMissing { .. }));
    }
}
