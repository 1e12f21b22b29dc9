//! Per-shard parsers. See spec §4.3 and §4.4.

pub mod block_event;
pub mod file_map;

use crate::error::CoreError;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Open a gzip-compressed shard and return a buffered line reader over its
/// decompressed contents.
///
/// A failure here is an unrecoverable structural failure (spec §7
/// `ParseError`), distinct from a malformed *line*, which callers skip and
/// keep going.
pub(crate) fn open_gz_lines(path: &Path) -> Result<impl Iterator<Item = std::io::Result<String>>, CoreError> {
    let file = File::open(path).map_err(|source| CoreError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = GzDecoder::new(file);
    Ok(BufReader::new(decoder).lines())
}
