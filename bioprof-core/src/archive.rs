//! Input bundle reader. See spec §4.2 and §6 "Archive layout".

use crate::error::CoreError;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::warn;

static BLOCK_EVENT_SHARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^blk\.out\.(.+)\.(\d+)\.blkparse\.gz$").unwrap());
static FILE_MAP_SHARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^filetrace\.(.+)\.(\d+)\.txt\.gz$").unwrap());
static GEOMETRY_MEMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^fdisk\.(.+)$").unwrap());

/// A classified and extracted input bundle, ready for parsing.
#[derive(Debug)]
pub struct Bundle {
    pub geometry_text: String,
    pub block_event_shards: Vec<PathBuf>,
    pub file_map_shards: Vec<PathBuf>,
}

/// Open `archive_path`, classify its members, and extract the recognized
/// ones into `work_dir`.
///
/// Fails with [`CoreError::InputCorrupt`] if no `fdisk.<dev>` member is
/// present, or if the archive itself cannot be read. Unrecognized members
/// are skipped with a warning, not extracted.
pub fn read_bundle(archive_path: &Path, work_dir: &Path) -> Result<Bundle, CoreError> {
    std::fs::create_dir_all(work_dir)?;

    let file = File::open(archive_path).map_err(|e| CoreError::InputCorrupt {
        reason: format!("cannot open {}: {e}", archive_path.display()),
    })?;
    let mut archive = tar::Archive::new(file);

    let mut geometry_text = None;
    let mut block_event_shards = Vec::new();
    let mut file_map_shards = Vec::new();

    let entries = archive.entries().map_err(|e| CoreError::InputCorrupt {
        reason: format!("cannot read archive entries: {e}"),
    })?;

    for entry in entries {
        let mut entry = entry.map_err(|e| CoreError::InputCorrupt {
            reason: format!("corrupt archive entry: {e}"),
        })?;
        let path = entry.path().map_err(|e| CoreError::InputCorrupt {
            reason: format!("invalid entry path: {e}"),
        })?;
        let name = path.to_string_lossy().to_string();

        if GEOMETRY_MEMBER.is_match(&name) {
            let mut text = String::new();
            entry
                .read_to_string(&mut text)
                .map_err(|e| CoreError::InputCorrupt {
                    reason: format!("cannot read geometry member {name}: {e}"),
                })?;
            geometry_text = Some(text);
        } else if BLOCK_EVENT_SHARD.is_match(&name) {
            block_event_shards.push(extract_member(&mut entry, work_dir, &name)?);
        } else if FILE_MAP_SHARD.is_match(&name) {
            file_map_shards.push(extract_member(&mut entry, work_dir, &name)?);
        } else {
            warn!(member = %name, "ignoring unrecognized archive member");
        }
    }

    let geometry_text = geometry_text.ok_or_else(|| CoreError::InputCorrupt {
        reason: "archive has no fdisk.<dev> geometry member".to_string(),
    })?;

    Ok(Bundle {
        geometry_text,
        block_event_shards,
        file_map_shards,
    })
}

fn extract_member(
    entry: &mut tar::Entry<'_, File>,
    work_dir: &Path,
    name: &str,
) -> Result<PathBuf, CoreError> {
    let safe_name = Path::new(name)
        .file_name()
        .ok_or_else(|| CoreError::InputCorrupt {
            reason: format!("archive member has no file name: {name}"),
        })?;
    let dest = work_dir.join(safe_name);
    entry.unpack(&dest).map_err(|e| CoreError::InputCorrupt {
        reason: format!("cannot extract {name}: {e}"),
    })?;
    Ok(dest)
}
