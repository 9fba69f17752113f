//! Sequential stage driver: routes → trips → stop_times → publish.
//!
//! Each stage reads its source table fully, filters in memory, and writes
//! its `<table>_filtered.txt` output before the next stage starts. The
//! only cross-stage handoff is the kept-trip set flowing from the trip
//! pass into the stop-time pass.

use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::FilterConfig;
use crate::filter;
use crate::publish;
use crate::table;

/// Outcome of a single filter stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    /// The stage wrote its filtered table; `kept` excludes the header row.
    Filtered { kept: usize },
    /// The source table was missing or empty; no output was written.
    SkippedEmptySource,
}

impl StageStatus {
    pub fn failed(&self) -> bool {
        matches!(self, StageStatus::SkippedEmptySource)
    }
}

/// Per-stage outcomes for one full run.
#[derive(Debug)]
pub struct RunSummary {
    pub routes: StageStatus,
    pub trips: StageStatus,
    pub stop_times: StageStatus,
    /// Tables moved to their canonical names by the publish step.
    pub published: usize,
}

impl RunSummary {
    pub fn any_failed(&self) -> bool {
        self.routes.failed() || self.trips.failed() || self.stop_times.failed()
    }

    pub fn all_failed(&self) -> bool {
        self.routes.failed() && self.trips.failed() && self.stop_times.failed()
    }
}

/// Runs the full pipeline against `config`.
///
/// A stage whose source is missing or empty is reported and skipped; the
/// remaining stages still run. Only real I/O faults (unreadable file,
/// failed write) abort the run.
#[tracing::instrument(
    skip(config),
    fields(
        source = %config.source_directory.display(),
        dest = %config.destination_directory.display(),
    )
)]
pub fn run(config: &FilterConfig) -> Result<RunSummary> {
    std::fs::create_dir_all(&config.destination_directory)?;

    let routes = filter_routes_stage(config)?;
    let (trips, kept_trips) = filter_trips_stage(config)?;
    let stop_times = filter_stop_times_stage(config, &kept_trips)?;

    let published = publish::publish(&config.destination_directory)?;

    Ok(RunSummary {
        routes,
        trips,
        stop_times,
        published,
    })
}

fn filter_routes_stage(config: &FilterConfig) -> Result<StageStatus> {
    let Some(content) = load_source(config, "routes")? else {
        return Ok(StageStatus::SkippedEmptySource);
    };

    let lines = table::split_lines(&content);
    let output = filter::filter_routes(&lines, &config.allowed_route_ids);
    table::write_table(&filtered_path(config, "routes"), &output.lines)?;

    info!(kept = output.kept, "Filtered routes.txt");
    Ok(StageStatus::Filtered { kept: output.kept })
}

fn filter_trips_stage(config: &FilterConfig) -> Result<(StageStatus, HashSet<String>)> {
    let Some(content) = load_source(config, "trips")? else {
        return Ok((StageStatus::SkippedEmptySource, HashSet::new()));
    };

    let lines = table::split_lines(&content);
    let (output, kept_trips) = filter::filter_trips(&lines, &config.allowed_route_ids);
    table::write_table(&filtered_path(config, "trips"), &output.lines)?;

    info!(
        kept = output.kept,
        trip_ids = kept_trips.len(),
        "Filtered trips.txt"
    );
    Ok((StageStatus::Filtered { kept: output.kept }, kept_trips))
}

fn filter_stop_times_stage(
    config: &FilterConfig,
    kept_trips: &HashSet<String>,
) -> Result<StageStatus> {
    let Some(content) = load_source(config, "stop_times")? else {
        return Ok(StageStatus::SkippedEmptySource);
    };

    let lines = table::split_lines(&content);
    let output = filter::filter_stop_times(&lines, kept_trips);
    table::write_table(&filtered_path(config, "stop_times"), &output.lines)?;

    info!(kept = output.kept, "Filtered stop_times.txt");
    Ok(StageStatus::Filtered { kept: output.kept })
}

/// Reads one source table; a missing or empty table gets a diagnostic and
/// the stage is skipped.
fn load_source(config: &FilterConfig, name: &str) -> Result<Option<String>> {
    let path = config.source_directory.join(format!("{name}.txt"));
    match table::load_table(&path)? {
        Some(content) => Ok(Some(content)),
        None => {
            error!(path = %path.display(), "Source table is missing or empty, skipping stage");
            Ok(None)
        }
    }
}

fn filtered_path(config: &FilterConfig, name: &str) -> PathBuf {
    config.destination_directory.join(format!("{name}_filtered.txt"))
}
