//! `wards sql`: print statement text without running it.

use super::Lookup;
use std::process::ExitCode;
use wards_core::config::QueryConfig;
use wards_query::SpatialQueries;

pub fn run(config: &QueryConfig, lookup: &Lookup) -> anyhow::Result<ExitCode> {
    let queries = SpatialQueries::new(config.clone())?;
    println!("{}", statement(&queries, lookup)?);
    Ok(ExitCode::SUCCESS)
}

/// Render the statement for a lookup.
pub fn statement(queries: &SpatialQueries, lookup: &Lookup) -> wards_query::Result<String> {
    match lookup {
        Lookup::InCountry(p) => queries.point_in_country(p.lat, p.lng),
        Lookup::WardAt(p) => queries.ward_by_point(p.lat, p.lng),
        Lookup::Nearby {
            point,
            radius,
            limit,
        } => {
            let config = queries.config();
            queries.nearest_to_point_within(
                point.lat,
                point.lng,
                radius.unwrap_or(config.nearby_radius_m),
                limit.unwrap_or(config.nearby_limit),
            )
        }
        Lookup::Neighbors { id } => queries.nearest_to_ward(*id),
        Lookup::ById { id } => queries.ward_by_id(*id),
        Lookup::Search { term } => queries.search_wards(term),
    }
}
