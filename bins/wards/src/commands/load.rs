//! `wards load`: build a database from GeoJSON.

use super::read_input;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use wards_cli::output::{format_count, format_duration, Status};
use wards_cli::progress;
use wards_core::config::QueryConfig;
use wards_query::{SpatialQueries, SqliteExecutor};

pub fn run(
    config: &QueryConfig,
    db: &Path,
    wards: &str,
    country: Option<&str>,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let queries = SpatialQueries::new(config.clone())?;
    let wards_text = read_input(wards)?;
    let country_text = country.map(read_input).transpose()?;

    let executor = SqliteExecutor::open(db)?;
    executor.create_schema(&queries)?;

    let pb = if quiet {
        progress::hidden()
    } else {
        progress::spinner(&format!("Loading wards into {}", db.display()))
    };
    let start = Instant::now();

    let report = match executor.load_wards_geojson(&queries, &wards_text) {
        Ok(report) => report,
        Err(err) => {
            progress::finish_error(&pb, "Ward load failed");
            return Err(err.into());
        }
    };
    progress::finish_success(
        &pb,
        &format!(
            "Loaded {} in {}",
            format_count(report.loaded, "ward", "wards"),
            format_duration(start.elapsed())
        ),
    );
    if report.skipped > 0 {
        Status::warning(&format!(
            "Skipped {}",
            format_count(report.skipped, "feature", "features")
        ));
    }

    if let Some(text) = country_text {
        executor.load_country_geojson(&queries, &text)?;
        Status::success("Country boundary loaded");
    }

    Ok(ExitCode::SUCCESS)
}
