//! Live-mode data model. See SPEC_FULL.md §10.6.
//!
//! The original's live mode was never implemented beyond a placeholder
//! message, so there's no cadence or rendering behavior to carry forward
//! here. This module only produces the bucket-traffic snapshot a renderer
//! would consume; building that renderer is out of scope.

use crate::counters::GlobalCounters;
use rustc_hash::FxHashMap;

/// A single point-in-time snapshot of bucket traffic.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveFrame {
    pub buckets: FxHashMap<u32, u64>,
    pub sampled_at_secs: u64,
}

/// Summarize the current counters into a [`LiveFrame`] at `sampled_at_secs`.
///
/// Combines reads and writes per bucket, since live rendering distinguishes
/// hot spots, not direction.
pub fn summarize_live(counters: &GlobalCounters, sampled_at_secs: u64) -> LiveFrame {
    let mut buckets: FxHashMap<u32, u64> = FxHashMap::default();
    for (&bucket, &hits) in &counters.reads {
        *buckets.entry(bucket as u32).or_insert(0) += hits;
    }
    for (&bucket, &hits) in &counters.writes {
        *buckets.entry(bucket as u32).or_insert(0) += hits;
    }
    LiveFrame {
        buckets,
        sampled_at_secs,
    }
}
