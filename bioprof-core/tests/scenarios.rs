//! End-to-end scenarios over real tar+gzip archives. See spec §8.

use bioprof_core::config::Config;
use bioprof_core::profile_archive;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn build_archive(path: &Path, geometry: &str, block_shards: &[&[&str]], file_shards: &[&[&str]]) {
    let file = File::create(path).unwrap();
    let mut builder = tar::Builder::new(file);

    let mut append = |name: &str, contents: &[u8]| {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, contents).unwrap();
    };

    append("fdisk.sdb", geometry.as_bytes());

    for (i, lines) in block_shards.iter().enumerate() {
        let mut buf = Vec::new();
        {
            let mut encoder = GzEncoder::new(&mut buf, Compression::fast());
            for line in *lines {
                writeln!(encoder, "{line}").unwrap();
            }
            encoder.finish().unwrap();
        }
        append(&format!("blk.out.sdb.{i}.blkparse.gz"), &buf);
    }

    for (i, lines) in file_shards.iter().enumerate() {
        let mut buf = Vec::new();
        {
            let mut encoder = GzEncoder::new(&mut buf, Compression::fast());
            for line in *lines {
                writeln!(encoder, "{line}").unwrap();
            }
            encoder.finish().unwrap();
        }
        append(&format!("filetrace.sdb.{i}.txt.gz"), &buf);
    }

    builder.finish().unwrap();
}

// DISK_GIB_LINE only recognizes the "GiB"/"TiB" suffix (see geometry.rs); the
// leading decimal is unused by the parser, only the trailing sector count is.
const SMALL_GEOMETRY: &str = "Units = sectors of 1 * 512 = 512 bytes\n\
    Disk /dev/sdb: 1.0 GiB, 1048576 bytes, 2048 sectors\n";

const FOUR_MIB_GEOMETRY: &str = "Units = sectors of 1 * 512 = 512 bytes\n\
    Disk /dev/sdb: 1.0 GiB, 4194304 bytes, 8192 sectors\n";

#[test]
fn scenario_a_single_shard_basic_counts() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("sdb.tar");
    build_archive(
        &archive_path,
        SMALL_GEOMETRY,
        &[&["R Q 0 8", "W Q 8 8"]],
        &[],
    );

    let work_dir = dir.path().join("work");
    let config = Config::default();
    let (report, geometry) = profile_archive(&archive_path, &work_dir, &config).unwrap();

    assert_eq!(geometry.num_buckets(config.bucket_size), 1);
    assert!(!report.histogram_iops.is_empty());
    assert!(report.top_files.is_none());
}

#[test]
fn scenario_b_multi_shard_archive_merges_across_shards() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("sdb.tar");
    build_archive(
        &archive_path,
        FOUR_MIB_GEOMETRY,
        &[
            &["R Q 0 8", "R Q 2048 8"],
            &["R Q 4096 8", "R Q 6144 8"],
        ],
        &[],
    );

    let work_dir = dir.path().join("work");
    let config = Config::default();
    let (report, geometry) = profile_archive(&archive_path, &work_dir, &config).unwrap();

    assert_eq!(geometry.num_buckets(config.bucket_size), 4);
    let last = report.histogram_iops.last().unwrap();
    assert!((last.gib_so_far - (4.0 * config.bucket_size as f64 / (1024.0 * 1024.0 * 1024.0))).abs() < 1e-9);
}

#[test]
fn scenario_d_file_map_attribution() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("sdb.tar");
    build_archive(
        &archive_path,
        FOUR_MIB_GEOMETRY,
        &[&[
            "R Q 0 8",
            "R Q 0 8",
            "R Q 0 8",
            "R Q 0 8",
            "R Q 0 8",
            "R Q 2048 8",
            "R Q 2048 8",
            "R Q 2048 8",
        ]],
        // bucket_size=1MiB, sector_size=512 => 2048 sectors per bucket; the
        // boundary between bucket 0 and bucket 1 falls at lba 2048.
        &[&["/a :: 0:2047", "/b :: 2048:4095"]],
    );

    let work_dir = dir.path().join("work");
    let config = Config::default();
    let (report, _geometry) = profile_archive(&archive_path, &work_dir, &config).unwrap();

    let top_files = report.top_files.unwrap();
    let a = top_files.iter().find(|f| f.path == "/a").unwrap();
    let b = top_files.iter().find(|f| f.path == "/b").unwrap();
    assert_eq!(a.hits, 5);
    assert_eq!(b.hits, 3);
    assert_eq!(report.unattributed_hits, 0);
}

#[test]
fn scenario_e_out_of_range_event_clamps_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("sdb.tar");
    build_archive(
        &archive_path,
        FOUR_MIB_GEOMETRY,
        &[&["R Q 99999999 8"]],
        &[],
    );

    let work_dir = dir.path().join("work");
    let config = Config::default();
    let result = profile_archive(&archive_path, &work_dir, &config);
    assert!(result.is_ok());
}

#[test]
fn scenario_f_empty_archive_completes_with_unavailable_percentages() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("sdb.tar");
    build_archive(&archive_path, FOUR_MIB_GEOMETRY, &[], &[]);

    let work_dir = dir.path().join("work");
    let config = Config::default();
    let (report, _geometry) = profile_archive(&archive_path, &work_dir, &config).unwrap();

    assert!(report.top_files.is_none());
    for row in &report.histogram_iops {
        assert!(row.io_percent_in_band.is_none());
        assert!(row.cumulative_io_percent.is_none());
    }
}

#[test]
fn missing_geometry_member_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("sdb.tar");

    let file = File::create(&archive_path).unwrap();
    let mut builder = tar::Builder::new(file);
    let contents = b"R Q 0 8\n";
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "blk.out.sdb.0.blkparse.gz", &contents[..])
        .unwrap();
    builder.finish().unwrap();

    let work_dir = dir.path().join("work");
    let config = Config::default();
    let err = profile_archive(&archive_path, &work_dir, &config).unwrap_err();
    assert!(matches!(err, bioprof_core::CoreError::InputCorrupt { .. }));
}

#[test]
fn reducer_is_order_independent_across_shard_splits() {
    let dir = tempfile::tempdir().unwrap();
    let one_shard = dir.path().join("one.tar");
    let two_shards = dir.path().join("two.tar");

    build_archive(
        &one_shard,
        FOUR_MIB_GEOMETRY,
        &[&["R Q 0 8", "R Q 2048 8", "R Q 4096 8", "R Q 6144 8"]],
        &[],
    );
    build_archive(
        &two_shards,
        FOUR_MIB_GEOMETRY,
        &[&["R Q 0 8", "R Q 2048 8"], &["R Q 4096 8", "R Q 6144 8"]],
        &[],
    );

    let config = Config::default();
    let (report_one, _) = profile_archive(&one_shard, &dir.path().join("w1"), &config).unwrap();
    let (report_two, _) = profile_archive(&two_shards, &dir.path().join("w2"), &config).unwrap();

    assert_eq!(report_one.histogram_iops.len(), report_two.histogram_iops.len());
    for (a, b) in report_one.histogram_iops.iter().zip(report_two.histogram_iops.iter()) {
        assert_eq!(a.io_percent_in_band, b.io_percent_in_band);
    }
}
