//! `wards query`: run a lookup against a database.

use super::Lookup;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use wards_cli::output::{format_viewport, format_ward, Status};
use wards_core::config::ConfigSchema;
use wards_core::{exit_codes, Error, ErrorCode};
use wards_query::{
    frame_features, QueryOutcome, SqliteExecutor, Ward, WardFeature, WardLocator,
    NOTHING_UPDATED, NO_NEARBY_WARDS, OUTSIDE_COUNTRY, WARD_NOT_FOUND,
};

pub fn run(
    config: &ConfigSchema,
    db: Option<PathBuf>,
    text: bool,
    lookup: &Lookup,
) -> anyhow::Result<ExitCode> {
    let db = db
        .or_else(|| config.general.database_path.as_ref().map(PathBuf::from))
        .ok_or_else(Error::database_not_configured)?;
    if !db.exists() {
        return Err(Error::new(
            ErrorCode::FileNotFound,
            format!("Database not found: {}", db.display()),
        )
        .with_suggestion("Create it with `wards load --db <path> --wards <file>`")
        .into());
    }

    let locator = WardLocator::from_config(SqliteExecutor::open(&db)?, config.query.clone())?;

    match lookup {
        Lookup::InCountry(p) => emit(&locator.is_point_in_country(p.lat, p.lng), text, |_| {
            vec!["Inside the country".to_string()]
        }),
        Lookup::WardAt(p) => emit(&locator.ward_at(p.lat, p.lng), text, describe_one),
        Lookup::Nearby {
            point,
            radius,
            limit,
        } => {
            let outcome = match (radius, limit) {
                (None, None) => locator.nearby_wards(point.lat, point.lng),
                _ => {
                    let defaults = &config.query;
                    locator.nearby_wards_within(
                        point.lat,
                        point.lng,
                        radius.unwrap_or(defaults.nearby_radius_m),
                        limit.unwrap_or(defaults.nearby_limit),
                    )
                }
            };
            emit(&outcome, text, |features: &Vec<WardFeature>| {
                describe_many(features)
            })
        }
        Lookup::Neighbors { id } => {
            emit(&locator.neighbors_of(*id), text, |features: &Vec<WardFeature>| {
                describe_many(features)
            })
        }
        Lookup::ById { id } => emit(&locator.ward_by_id(*id), text, describe_one),
        Lookup::Search { term } => {
            emit(&locator.search_wards(term), text, |wards: &Vec<Ward>| {
                describe_wards(wards)
            })
        }
    }
}

fn emit<T: Serialize>(
    outcome: &QueryOutcome<T>,
    text: bool,
    describe: impl Fn(&T) -> Vec<String>,
) -> anyhow::Result<ExitCode> {
    if text {
        match outcome.result() {
            Some(result) => describe(result).iter().for_each(|line| println!("{line}")),
            None => Status::warning(outcome.error().unwrap_or_default()),
        }
    } else {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    }
    Ok(outcome_exit_code(outcome))
}

fn outcome_exit_code<T>(outcome: &QueryOutcome<T>) -> ExitCode {
    let code = match outcome.error() {
        None => exit_codes::SUCCESS,
        Some(WARD_NOT_FOUND | NO_NEARBY_WARDS | OUTSIDE_COUNTRY | NOTHING_UPDATED) => {
            exit_codes::NOT_FOUND
        }
        Some(_) => exit_codes::QUERY_ERROR,
    };
    ExitCode::from(code as u8)
}

fn describe_one(feature: &WardFeature) -> Vec<String> {
    describe_many(std::slice::from_ref(feature))
}

fn describe_many(features: &[WardFeature]) -> Vec<String> {
    let mut lines: Vec<String> = features.iter().map(format_ward).collect();
    if let Some(viewport) = frame_features(features) {
        lines.push(format_viewport(&viewport));
    }
    lines
}

fn describe_wards(wards: &[Ward]) -> Vec<String> {
    wards
        .iter()
        .map(|w| format!("#{} {} ({}, {})", w.id, w.ward, w.constituency, w.county))
        .collect()
}
