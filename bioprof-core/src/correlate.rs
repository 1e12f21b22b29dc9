//! Bucket<->file correlator. See spec §4.6 and the interning design note in §9.
//!
//! The file->buckets relationship is bipartite many-to-many. Path strings
//! are interned into an arena once; each bucket keeps a compressed
//! [`RoaringBitmap`] of path ids rather than a `HashSet<String>`, so
//! membership checks are O(1) and duplicate insertions are free no-ops.

use crate::parse::block_event::lba_to_bucket;
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Inverted index from bucket to the set of files occupying it.
pub struct Correlator {
    paths: Vec<String>,
    path_ids: FxHashMap<String, u32>,
    bucket_to_files: FxHashMap<u64, RoaringBitmap>,
}

impl Correlator {
    fn intern(&mut self, path: &str) -> u32 {
        if let Some(&id) = self.path_ids.get(path) {
            return id;
        }
        let id = self.paths.len() as u32;
        self.paths.push(path.to_string());
        self.path_ids.insert(path.to_string(), id);
        id
    }

    /// Paths seen while building this correlator, in first-seen order.
    pub fn known_paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|s| s.as_str())
    }

    /// The files attributed to `bucket`, or an empty iterator if none.
    pub fn files_at(&self, bucket: u64) -> impl Iterator<Item = &str> {
        self.bucket_to_files
            .get(&bucket)
            .into_iter()
            .flat_map(|bitmap| bitmap.iter())
            .map(move |id| self.paths[id as usize].as_str())
    }

    pub fn bucket_has_files(&self, bucket: u64) -> bool {
        self.bucket_to_files
            .get(&bucket)
            .is_some_and(|b| !b.is_empty())
    }
}

/// Build a [`Correlator`] from the reduced file->LBA-ranges map.
///
/// `progress` is called after each file is processed with the fraction of
/// `files_to_lbas` consumed so far (spec §4.6: "Progress may be reported by
/// fraction of files_to_lbas processed").
pub fn build_correlator(
    files_to_lbas: &FxHashMap<String, Vec<String>>,
    sector_size: u64,
    bucket_size: u64,
    num_buckets: u64,
    mut progress: impl FnMut(f64),
) -> Correlator {
    let mut correlator = Correlator {
        paths: Vec::new(),
        path_ids: FxHashMap::default(),
        bucket_to_files: FxHashMap::default(),
    };

    let total = files_to_lbas.len().max(1);
    for (processed, (path, ranges)) in files_to_lbas.iter().enumerate() {
        let id = correlator.intern(path);

        for token in ranges {
            let Some((start_str, end_str)) = token.split_once(':') else {
                trace!(token, "skipping malformed range token");
                continue;
            };
            let (Ok(start), Ok(end)) = (start_str.parse::<u64>(), end_str.parse::<u64>()) else {
                trace!(token, "skipping malformed range token");
                continue;
            };

            let start_bucket = lba_to_bucket(start, sector_size, bucket_size, num_buckets);
            let finish_bucket = lba_to_bucket(end, sector_size, bucket_size, num_buckets);
            let (lo, hi) = if start_bucket <= finish_bucket {
                (start_bucket, finish_bucket)
            } else {
                (finish_bucket, start_bucket)
            };

            for bucket in lo..=hi {
                correlator
                    .bucket_to_files
                    .entry(bucket)
                    .or_default()
                    .insert(id);
            }
        }

        progress((processed + 1) as f64 / total as f64);
    }

    correlator
}
