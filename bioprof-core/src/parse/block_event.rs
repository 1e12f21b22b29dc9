//! Block-event shard parser. See spec §4.3.

use super::open_gz_lines;
use crate::counters::{Direction, ThreadLocalCounters};
use crate::error::CoreError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::trace;

static EVENT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s+Q\s+(\S+)\s+(\S+)$").unwrap());

fn classify(direction: &str) -> Option<Direction> {
    match direction {
        "R" | "RW" => Some(Direction::Read),
        "W" | "WS" => Some(Direction::Write),
        _ => None,
    }
}

/// Compute the starting bucket for a request at sector `lba`, clamped to
/// `num_buckets - 1` (spec §3: "no out-of-range writes").
pub fn lba_to_bucket(lba: u64, sector_size: u64, bucket_size: u64, num_buckets: u64) -> u64 {
    let bucket = (lba * sector_size) / bucket_size;
    if num_buckets == 0 {
        0
    } else {
        bucket.min(num_buckets - 1)
    }
}

/// Parse one decompressed block-event shard, accumulating into a fresh
/// [`ThreadLocalCounters`]. Non-matching or unrecognized-direction lines are
/// skipped silently; an I/O failure reading the shard propagates as
/// [`CoreError::ParseError`].
pub fn parse_block_event_shard(
    path: &Path,
    sector_size: u64,
    bucket_size: u64,
    num_buckets: u64,
) -> Result<ThreadLocalCounters, CoreError> {
    let mut counters = ThreadLocalCounters::new();

    for line in open_gz_lines(path)? {
        let line = line.map_err(|source| CoreError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(caps) = EVENT_LINE.captures(&line) else {
            continue;
        };
        let direction_str = &caps[1];
        let Some(direction) = classify(direction_str) else {
            trace!(direction = direction_str, "skipping unrecognized direction");
            continue;
        };
        let Ok(lba) = caps[2].parse::<u64>() else {
            continue;
        };
        let Ok(size) = caps[3].parse::<u64>() else {
            continue;
        };

        let bucket = lba_to_bucket(lba, sector_size, bucket_size, num_buckets);
        counters.record_event(direction, bucket, size);
    }

    Ok(counters)
}
