//! File-map shard parser. See spec §4.4.

use super::open_gz_lines;
use crate::error::CoreError;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::LazyLock;

static RECORD_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s+::\s+(.+)$").unwrap());

/// `path -> ordered list of raw "start:end" range tokens`, accumulated from
/// one shard. Duplicate paths within a shard have their range lists
/// concatenated, the same way duplicate paths across shards are merged by
/// the Reducer.
pub type PartialFileMap = FxHashMap<String, Vec<String>>;

/// Parse one decompressed file-map shard into a [`PartialFileMap`].
pub fn parse_file_map_shard(path: &Path) -> Result<PartialFileMap, CoreError> {
    let mut map: PartialFileMap = FxHashMap::default();

    for line in open_gz_lines(path)? {
        let line = line.map_err(|source| CoreError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(caps) = RECORD_LINE.captures(&line) else {
            continue;
        };
        let file_path = caps[1].to_string();
        let ranges_text = caps[2].trim();
        let tokens: Vec<String> = ranges_text
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();

        map.entry(file_path).or_default().extend(tokens);
    }

    Ok(map)
}
