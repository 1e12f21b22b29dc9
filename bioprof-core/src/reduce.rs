//! Reducer: merges thread-local counter sets into the global set under a
//! fixed lock order. See spec §4.5 and §5.
//!
//! Results are commutative and associative across shards for every field
//! except `max_bucket_hits`, which is an idempotent max. The lock order
//! below prevents deadlock if merges from different workers ever interleave;
//! each lock is held only for the duration of one scalar/map merge.

use crate::counters::{BucketMap, GlobalCounters, SizeMap, ThreadLocalCounters};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Global counter set under construction. Each field is behind its own
/// lock so that reducing one worker's counters never blocks on a field it
/// doesn't touch.
#[derive(Default)]
pub struct SharedCounters {
    max_bucket_hits: Mutex<u64>,
    total_blocks: Mutex<u64>,
    io_total: Mutex<u64>,
    read_totals: Mutex<(u64, SizeMap)>,
    write_totals: Mutex<(u64, SizeMap)>,
    reads: Mutex<BucketMap>,
    writes: Mutex<BucketMap>,
    bucket_hits_total: Mutex<u64>,
}

impl SharedCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one worker's thread-local counters into the shared set.
    ///
    /// Lock order: max_bucket_hits -> total_blocks -> io_total ->
    /// read_totals -> write_totals -> reads -> writes -> bucket_hits_total.
    /// No lock is ever held across the acquisition of another.
    pub fn reduce(&self, local: ThreadLocalCounters) {
        {
            let mut g = self.max_bucket_hits.lock();
            if local.max_bucket_hits > *g {
                *g = local.max_bucket_hits;
            }
        }
        {
            let mut g = self.total_blocks.lock();
            *g += local.total_blocks;
        }
        {
            let mut g = self.io_total.lock();
            *g += local.io_total;
        }
        {
            let mut g = self.read_totals.lock();
            g.0 += local.read_total;
            for (size, hits) in local.r_totals {
                *g.1.entry(size).or_insert(0) += hits;
            }
        }
        {
            let mut g = self.write_totals.lock();
            g.0 += local.write_total;
            for (size, hits) in local.w_totals {
                *g.1.entry(size).or_insert(0) += hits;
            }
        }
        {
            let mut g = self.reads.lock();
            for (bucket, hits) in local.reads {
                *g.entry(bucket).or_insert(0) += hits;
            }
        }
        {
            let mut g = self.writes.lock();
            for (bucket, hits) in local.writes {
                *g.entry(bucket).or_insert(0) += hits;
            }
        }
        {
            let mut g = self.bucket_hits_total.lock();
            *g += local.bucket_hits_total;
        }
    }

    /// Freeze the accumulated counters into an immutable snapshot for the
    /// single-threaded Analyzer (spec §5: "no synchronization required").
    pub fn into_snapshot(self) -> GlobalCounters {
        let (read_total, r_totals) = self.read_totals.into_inner();
        let (write_total, w_totals) = self.write_totals.into_inner();
        GlobalCounters {
            reads: self.reads.into_inner(),
            writes: self.writes.into_inner(),
            r_totals,
            w_totals,
            io_total: self.io_total.into_inner(),
            read_total,
            write_total,
            bucket_hits_total: self.bucket_hits_total.into_inner(),
            total_blocks: self.total_blocks.into_inner(),
            max_bucket_hits: self.max_bucket_hits.into_inner(),
        }
    }
}

/// Shared file->LBA-ranges map, reduced once per file-map shard under its
/// own lock (spec §4.5, last paragraph).
#[derive(Default)]
pub struct SharedFileMap {
    files_to_lbas: Mutex<FxHashMap<String, Vec<String>>>,
}

impl SharedFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one shard's partial file map in. Duplicate paths across shards
    /// have their range lists concatenated (spec §4.4); the Correlator
    /// de-duplicates at insertion time.
    pub fn reduce(&self, partial: FxHashMap<String, Vec<String>>) {
        let mut g = self.files_to_lbas.lock();
        for (path, ranges) in partial {
            g.entry(path).or_default().extend(ranges);
        }
    }

    pub fn into_inner(self) -> FxHashMap<String, Vec<String>> {
        self.files_to_lbas.into_inner()
    }
}
