//! Shard-parallel orchestration. See spec §5.
//!
//! A worker pool sized to the host's logical CPU count (capped by
//! `config.worker_cap`) processes block-event and file-map shards
//! concurrently. Each worker owns a disjoint thread-local counter set for
//! the duration of parsing one shard, then reduces it into the shared
//! state before picking up more work — the hot per-event loop itself never
//! suspends.

use crate::archive::Bundle;
use crate::config::Config;
use crate::counters::GlobalCounters;
use crate::error::CoreError;
use crate::geometry::Geometry;
use crate::parse::block_event::parse_block_event_shard;
use crate::parse::file_map::parse_file_map_shard;
use crate::reduce::{SharedCounters, SharedFileMap};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{error, info};

/// Everything the Analyzer needs: the reduced global counters and the
/// reduced file->LBA-ranges map.
pub struct PipelineOutput {
    pub counters: GlobalCounters,
    pub files_to_lbas: FxHashMap<String, Vec<String>>,
}

/// Run the full ingestion pipeline (parse + reduce) over an already-read
/// [`Bundle`].
///
/// If any worker hits a [`CoreError::ParseError`], the orchestrator still
/// joins every other worker before returning the first error observed
/// (spec §5: "it does not kill them").
pub fn run_pipeline(
    bundle: &Bundle,
    geometry: &Geometry,
    config: &Config,
) -> Result<PipelineOutput, CoreError> {
    let num_buckets = geometry.num_buckets(config.bucket_size);
    let sector_size = geometry.sector_size;
    let bucket_size = config.bucket_size;

    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let worker_count = available.min(config.worker_cap).max(1);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .build()
        .expect("failed to build shard-parsing thread pool");

    let shared_counters = SharedCounters::new();
    let shared_file_map = SharedFileMap::new();

    let (block_errors, file_map_errors): (Vec<Option<CoreError>>, Vec<Option<CoreError>>) =
        pool.install(|| {
            let block_errors: Vec<Option<CoreError>> = bundle
                .block_event_shards
                .par_iter()
                .map(|path| {
                    info!(shard = %path.display(), "parsing block-event shard");
                    match parse_block_event_shard(path, sector_size, bucket_size, num_buckets) {
                        Ok(local) => {
                            shared_counters.reduce(local);
                            None
                        }
                        Err(e) => {
                            error!(shard = %path.display(), error = %e, "shard parse failed");
                            Some(e)
                        }
                    }
                })
                .collect();

            let file_map_errors: Vec<Option<CoreError>> = bundle
                .file_map_shards
                .par_iter()
                .map(|path| {
                    info!(shard = %path.display(), "parsing file-map shard");
                    match parse_file_map_shard(path) {
                        Ok(partial) => {
                            shared_file_map.reduce(partial);
                            None
                        }
                        Err(e) => {
                            error!(shard = %path.display(), error = %e, "shard parse failed");
                            Some(e)
                        }
                    }
                })
                .collect();

            (block_errors, file_map_errors)
        });

    if let Some(err) = block_errors.into_iter().flatten().next() {
        return Err(err);
    }
    if let Some(err) = file_map_errors.into_iter().flatten().next() {
        return Err(err);
    }

    Ok(PipelineOutput {
        counters: shared_counters.into_snapshot(),
        files_to_lbas: shared_file_map.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_gz(dir: &std::path::Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::fast());
        for line in lines {
            writeln!(encoder, "{line}").unwrap();
        }
        encoder.finish().unwrap();
        path
    }

    #[test]
    fn scenario_b_multi_shard_merge() {
        let dir = tempfile::tempdir().unwrap();
        let shard0 = write_gz(dir.path(), "blk.out.sdb.0.blkparse.gz", &["R Q 0 8", "R Q 2048 8"]);
        let shard1 = write_gz(dir.path(), "blk.out.sdb.1.blkparse.gz", &["R Q 4096 8", "R Q 6144 8"]);

        let bundle = Bundle {
            geometry_text: String::new(),
            block_event_shards: vec![shard0, shard1],
            file_map_shards: vec![],
        };
        let geometry = Geometry {
            sector_size: 512,
            total_sectors: 8192,
            device_name: "sdb".to_string(),
        };
        let config = Config::default();

        let output = run_pipeline(&bundle, &geometry, &config).unwrap();
        assert_eq!(output.counters.reads_at(0), 1);
        assert_eq!(output.counters.reads_at(1), 1);
        assert_eq!(output.counters.reads_at(2), 1);
        assert_eq!(output.counters.reads_at(3), 1);
        assert_eq!(output.counters.io_total, 4);
    }

    #[test]
    fn scenario_f_empty_archive_completes_cleanly() {
        let bundle = Bundle {
            geometry_text: String::new(),
            block_event_shards: vec![],
            file_map_shards: vec![],
        };
        let geometry = Geometry {
            sector_size: 512,
            total_sectors: 2048,
            device_name: "sdb".to_string(),
        };
        let config = Config::default();

        let output = run_pipeline(&bundle, &geometry, &config).unwrap();
        assert_eq!(output.counters.io_total, 0);
        assert_eq!(output.counters.bucket_hits_total, 0);
        assert!(output.files_to_lbas.is_empty());
    }
}
