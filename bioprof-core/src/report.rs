//! Plain-text report rendering. See spec §6 "Report output".
//!
//! Kept deliberately dumb: the `Analyzer` already did the arithmetic, this
//! module just lays the typed rows out as text the way
//! `histogram-viz::main::print_histogram_stats` does, percentage formatting
//! included.

use crate::analyze::AnalysisReport;
use crate::geometry::Geometry;
use std::fmt::Write as _;

/// Render a full report from an [`AnalysisReport`] and the geometry it was
/// computed against.
pub fn render(report: &AnalysisReport, geometry: &Geometry) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Device: {} ({} sectors @ {} bytes)", geometry.device_name, geometry.total_sectors, geometry.sector_size);
    let _ = writeln!(out);

    let _ = writeln!(out, "-- Histogram IOPS --");
    for row in &report.histogram_iops {
        match (row.io_percent_in_band, row.cumulative_io_percent) {
            (Some(pct), Some(cum)) => {
                let _ = writeln!(out, "  {:>10.3} GiB   {:>6.2}% of IOPS   {:>6.2}% cumulative", row.gib_so_far, pct, cum);
            }
            _ => {
                let _ = writeln!(out, "  {:>10.3} GiB   (no I/O observed)", row.gib_so_far);
            }
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "-- Histogram bandwidth --");
    for row in &report.histogram_bw {
        match row.bw_percent_in_band {
            Some(pct) => {
                let _ = writeln!(out, "  {:>10.3} GiB   {:>6.2}% of bandwidth", row.gib_so_far, pct);
            }
            None => {
                let _ = writeln!(out, "  {:>10.3} GiB   (no bandwidth observed)", row.gib_so_far);
            }
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "-- Zipfian theta --");
    let _ = writeln!(
        out,
        "  min={:.4} max={:.4} avg={:.4} approx={:.4}",
        report.theta_range.min_theta,
        report.theta_range.max_theta,
        report.theta_range.avg_theta,
        report.theta_range.approx_theta,
    );
    let _ = writeln!(out);

    match &report.top_files {
        Some(files) if !files.is_empty() => {
            let _ = writeln!(out, "-- Top files by IOPS --");
            for file in files {
                match file.hit_rate {
                    Some(rate) => {
                        let _ = writeln!(out, "  {:>10} hits  {:>6.2}%  {}", file.hits, rate * 100.0, file.path);
                    }
                    None => {
                        let _ = writeln!(out, "  {:>10} hits  (rate unavailable)  {}", file.hits, file.path);
                    }
                }
            }
        }
        Some(_) => {
            let _ = writeln!(out, "-- Top files by IOPS --\n  (no files attributed)");
        }
        None => {
            let _ = writeln!(out, "-- Top files by IOPS --\n  (no file map supplied)");
        }
    }

    if report.unattributed_hits > 0 {
        let _ = writeln!(out, "\n{} bucket-hits had no attributed file", report.unattributed_hits);
    }

    out
}
