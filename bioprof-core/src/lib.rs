//! Block I/O profiling engine: parses kernel block-I/O trace shards and
//! device geometry, computes the spatial access distribution, I/O-size
//! distribution, and workload skew, and (optionally) attributes bucket
//! traffic back to files.
//!
//! See spec §2 for the pipeline overview this module wires together.

pub mod analyze;
pub mod archive;
pub mod config;
pub mod correlate;
pub mod counters;
pub mod error;
pub mod geometry;
pub mod live;
pub mod orchestrator;
pub mod parse;
pub mod reduce;
pub mod report;

pub use analyze::AnalysisReport;
pub use config::Config;
pub use error::{CoreError, Result};
pub use geometry::Geometry;

use std::path::Path;

/// Run the full `post`-mode pipeline over an archive: read the bundle, parse
/// geometry, parse and reduce shards, correlate buckets to files if a file
/// map was present, and analyze. This is what `bioprof-cli post` calls.
pub fn profile_archive(
    archive_path: &Path,
    work_dir: &Path,
    config: &Config,
) -> Result<(AnalysisReport, Geometry)> {
    let bundle = archive::read_bundle(archive_path, work_dir)?;
    let geometry = geometry::parse_geometry(&bundle.geometry_text)?;
    let num_buckets = geometry.num_buckets(config.bucket_size);

    let output = orchestrator::run_pipeline(&bundle, &geometry, config)?;

    let correlator = if output.files_to_lbas.is_empty() {
        None
    } else {
        Some(correlate::build_correlator(
            &output.files_to_lbas,
            geometry.sector_size,
            config.bucket_size,
            num_buckets,
            |_progress| {},
        ))
    };

    let report = analyze::analyze(
        &output.counters,
        correlator.as_ref(),
        num_buckets,
        geometry.total_capacity(),
        config,
    );

    Ok((report, geometry))
}
