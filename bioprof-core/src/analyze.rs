//! Analyzer. Single linear scan over bucket indices producing the spatial
//! histogram, the skew/theta estimate, and the top-files ranking. See
//! spec §4.7.

use crate::config::Config;
use crate::correlate::Correlator;
use crate::counters::GlobalCounters;
use rustc_hash::FxHashMap;
use tracing::warn;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// One row of the IOPS-keyed capacity histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct IopsRow {
    pub gib_so_far: f64,
    /// `None` when `bucket_hits_total == 0` (spec §4.7 edge case).
    pub io_percent_in_band: Option<f64>,
    pub cumulative_io_percent: Option<f64>,
}

/// One row of the bandwidth-keyed capacity histogram, built from the same
/// band walk as [`IopsRow`] but keyed on bandwidth share (§10.6 of
/// SPEC_FULL.md).
#[derive(Debug, Clone, PartialEq)]
pub struct BwRow {
    pub gib_so_far: f64,
    pub bw_percent_in_band: Option<f64>,
}

/// Estimated Zipfian shape parameter range. See spec §4.7 and the design
/// note on the non-canonical, rank-based estimator this preserves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThetaRange {
    pub min_theta: f64,
    pub max_theta: f64,
    pub avg_theta: f64,
    pub approx_theta: f64,
}

/// One entry of the top-files-by-IOPS ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct TopFile {
    pub path: String,
    pub hits: u64,
    /// `None` when `bucket_hits_total == 0`.
    pub hit_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub histogram_iops: Vec<IopsRow>,
    pub histogram_bw: Vec<BwRow>,
    pub theta_range: ThetaRange,
    /// `None` if no file map was supplied at all; `Some` (possibly empty)
    /// otherwise.
    pub top_files: Option<Vec<TopFile>>,
    /// Bucket traffic for which no file-map entry exists (spec §3: "logged
    /// but not an error").
    pub unattributed_hits: u64,
}

/// `log_base(value)`, guarding the degenerate cases spec §4.7 calls out:
/// "If either ln argument is zero treat the result as 0."
fn theta_log(base: f64, value: f64) -> f64 {
    if value == 0.0 || base == 0.0 {
        0.0
    } else {
        value.ln() / base.ln()
    }
}

/// Run the Analyzer over frozen global counters.
///
/// `total_capacity` is the device's total capacity in bytes (from
/// [`crate::geometry::Geometry::total_capacity`]), used for band sizing.
pub fn analyze(
    counters: &GlobalCounters,
    correlator: Option<&Correlator>,
    num_buckets: u64,
    total_capacity: u64,
    config: &Config,
) -> AnalysisReport {
    let mut counts: FxHashMap<u64, u64> = FxHashMap::default();
    let mut bw_total: u64 = 0;
    let mut unattributed_hits: u64 = 0;

    let mut file_hit_count: Option<FxHashMap<String, u64>> = correlator.map(|c| {
        let mut m = FxHashMap::default();
        for path in c.known_paths() {
            m.insert(path.to_string(), 0);
        }
        m
    });

    for bucket in 0..num_buckets {
        let r = counters.reads_at(bucket);
        let w = counters.writes_at(bucket);
        let total = r + w;

        bw_total += total * config.bucket_size;
        *counts.entry(total).or_insert(0) += 1;

        if total > 0 {
            if let Some(correlator) = correlator {
                let mut attributed = false;
                for file in correlator.files_at(bucket) {
                    attributed = true;
                    if let Some(map) = file_hit_count.as_mut() {
                        *map.entry(file.to_string()).or_insert(0) += total;
                    }
                }
                if !attributed {
                    unattributed_hits += total;
                    warn!(bucket, hits = total, "bucket has hits but no attributed file");
                }
            }
        }
    }

    let bucket_hits_total = counters.bucket_hits_total;

    // Walk counts in descending key order, producing theta estimates and
    // capacity-band histogram rows in the same pass.
    let mut sorted_keys: Vec<u64> = counts.keys().copied().collect();
    sorted_keys.sort_unstable_by(|a, b| b.cmp(a));

    let mut max_set = false;
    let mut max = 0.0f64;
    let mut theta_count: u64 = 1;
    let mut theta_total = 0.0f64;
    let mut max_theta = 0.0f64;
    let mut min_theta = 999.0f64;

    let mut b_count: u64 = 0;
    let mut section_count: u64 = 0;
    let mut bw_count: u64 = 0;
    let mut gb_tot: u64 = 0;
    let mut io_sum: u64 = 0;

    let mut histogram_iops = Vec::new();
    let mut histogram_bw = Vec::new();

    let band_threshold = config.percent * total_capacity as f64;

    for key in sorted_keys {
        let repetitions = counts[&key];

        // Theta is a shape estimate over the *distinct nonzero* per-bucket
        // totals only (spec §4.7: "for each subsequent nonzero key"). The
        // band walk below still consumes every bucket, zero-hit ones
        // included, so that bands stay exhaustive over num_buckets (§8
        // invariant 7).
        if key > 0 {
            if !max_set {
                max_set = true;
                max = key as f64;
            } else {
                theta_count += 1;
                let min = key as f64;
                let cur_theta = theta_log(theta_count as f64, max) - theta_log(theta_count as f64, min);
                if cur_theta > max_theta {
                    max_theta = cur_theta;
                }
                if cur_theta < min_theta {
                    min_theta = cur_theta;
                }
                theta_total += cur_theta;
            }
        }

        for _ in 0..repetitions {
            section_count += key;
            b_count += 1;
            bw_count += key * config.bucket_size;

            if (b_count * config.bucket_size) as f64 > band_threshold {
                gb_tot += b_count * config.bucket_size;
                io_sum += section_count;

                let gib_so_far = gb_tot as f64 / GIB;
                let (io_percent_in_band, cumulative_io_percent) = if bucket_hits_total == 0 {
                    (None, None)
                } else {
                    (
                        Some(section_count as f64 / bucket_hits_total as f64 * 100.0),
                        Some(io_sum as f64 / bucket_hits_total as f64 * 100.0),
                    )
                };
                let bw_percent_in_band = if bw_total == 0 {
                    Some(0.0)
                } else {
                    Some(bw_count as f64 / bw_total as f64 * 100.0)
                };

                histogram_iops.push(IopsRow {
                    gib_so_far,
                    io_percent_in_band,
                    cumulative_io_percent,
                });
                histogram_bw.push(BwRow {
                    gib_so_far,
                    bw_percent_in_band,
                });

                b_count = 0;
                section_count = 0;
                bw_count = 0;
            }
        }
    }

    if b_count > 0 {
        gb_tot += b_count * config.bucket_size;
        io_sum += section_count;

        let gib_so_far = gb_tot as f64 / GIB;
        let (io_percent_in_band, cumulative_io_percent) = if bucket_hits_total == 0 {
            (None, None)
        } else {
            (
                Some(section_count as f64 / bucket_hits_total as f64 * 100.0),
                Some(io_sum as f64 / bucket_hits_total as f64 * 100.0),
            )
        };
        let bw_percent_in_band = if bw_total == 0 {
            Some(0.0)
        } else {
            Some(bw_count as f64 / bw_total as f64 * 100.0)
        };

        histogram_iops.push(IopsRow {
            gib_so_far,
            io_percent_in_band,
            cumulative_io_percent,
        });
        histogram_bw.push(BwRow {
            gib_so_far,
            bw_percent_in_band,
        });
    }

    let avg_theta = theta_total / theta_count as f64;
    let approx_theta = (avg_theta + (max_theta + min_theta) / 2.0) / 2.0;
    let theta_range = ThetaRange {
        min_theta,
        max_theta,
        avg_theta,
        approx_theta,
    };

    let top_files = file_hit_count.map(|map| {
        let mut entries: Vec<(String, u64)> = map.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
            .into_iter()
            .take(config.top_count_limit)
            .filter(|(_, hits)| *hits > 0)
            .map(|(path, hits)| TopFile {
                path,
                hits,
                hit_rate: if bucket_hits_total == 0 {
                    None
                } else {
                    Some(hits as f64 / bucket_hits_total as f64)
                },
            })
            .collect()
    });

    AnalysisReport {
        histogram_iops,
        histogram_bw,
        theta_range,
        top_files,
        unattributed_hits,
    }
}
