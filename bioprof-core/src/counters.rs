//! Counter sets. See spec §3.
//!
//! Buckets are sparse in practice — most of a device's address space is
//! idle — so both counter shapes are hash maps keyed by bucket index rather
//! than dense arrays sized to `num_buckets`.

use rustc_hash::FxHashMap;

pub type BucketMap = FxHashMap<u64, u64>;
pub type SizeMap = FxHashMap<u64, u64>;

/// Direction of a block I/O event, after classifying `{R,RW}` vs `{W,WS}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// Per-worker counter set, owned for the duration of parsing one shard.
///
/// Shape mirrors [`GlobalCounters`] exactly; the Reducer drains one of
/// these into the global set once a shard finishes parsing.
#[derive(Debug, Clone, Default)]
pub struct ThreadLocalCounters {
    pub reads: BucketMap,
    pub writes: BucketMap,
    pub r_totals: SizeMap,
    pub w_totals: SizeMap,
    pub io_total: u64,
    pub read_total: u64,
    pub write_total: u64,
    pub bucket_hits_total: u64,
    pub total_blocks: u64,
    pub max_bucket_hits: u64,
}

impl ThreadLocalCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one accepted block-event (spec §4.3).
    ///
    /// One hit is recorded per event regardless of size, against the
    /// starting bucket only — see the Open Question in spec §9, preserved
    /// here exactly for parity with published skew numbers.
    pub fn record_event(&mut self, direction: Direction, bucket: u64, size_sectors: u64) {
        self.io_total += 1;
        self.total_blocks += size_sectors;

        match direction {
            Direction::Read => {
                self.read_total += 1;
                *self.r_totals.entry(size_sectors).or_insert(0) += 1;
                let entry = self.reads.entry(bucket).or_insert(0);
                *entry += 1;
                if *entry > self.max_bucket_hits {
                    self.max_bucket_hits = *entry;
                }
            }
            Direction::Write => {
                self.write_total += 1;
                *self.w_totals.entry(size_sectors).or_insert(0) += 1;
                let entry = self.writes.entry(bucket).or_insert(0);
                *entry += 1;
                if *entry > self.max_bucket_hits {
                    self.max_bucket_hits = *entry;
                }
            }
        }
        self.bucket_hits_total += 1;
    }
}

/// Global counter set, frozen once all shards have been reduced in. The
/// Analyzer reads this single-threaded; no synchronization is needed once
/// it is built (spec §5).
#[derive(Debug, Clone, Default)]
pub struct GlobalCounters {
    pub reads: BucketMap,
    pub writes: BucketMap,
    pub r_totals: SizeMap,
    pub w_totals: SizeMap,
    pub io_total: u64,
    pub read_total: u64,
    pub write_total: u64,
    pub bucket_hits_total: u64,
    pub total_blocks: u64,
    pub max_bucket_hits: u64,
}

impl GlobalCounters {
    pub fn reads_at(&self, bucket: u64) -> u64 {
        self.reads.get(&bucket).copied().unwrap_or(0)
    }

    pub fn writes_at(&self, bucket: u64) -> u64 {
        self.writes.get(&bucket).copied().unwrap_or(0)
    }
}
