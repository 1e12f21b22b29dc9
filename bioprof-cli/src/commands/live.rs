use crate::error::CliError;
use std::path::Path;

const MIN_DURATION_SECS: u64 = 3;

/// Validate `live` arguments. Builds the [`bioprof_core::live::LiveFrame`]
/// data model once a tracer feeds counters in; rendering a UI from it is out
/// of scope (spec §1), so this stops at validation, matching `trace`.
pub fn run(device: &Path, duration_secs: u64) -> Result<(), CliError> {
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

    Err(CliError::PrereqMissing {
        reason: "no block-I/O tracer is wired up; live sampling has nothing to read from".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_durations() {
        let err = run(Path::new("/dev/sdb"), 2).unwrap_err();
        assert!(matches!(err, CliError::Usage { .. }));
    }
}
