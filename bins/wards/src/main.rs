//! wards: locate Kenyan wards by coordinate, proximity and name.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use wards_cli::output::Status;
use wards_core::config::Config;
use wards_query::QueryError;
use wards_telemetry::TelemetryConfig;

mod commands;

use commands::{frame, load, query, sql, Lookup};

/// Ward lookups over a spatial database
#[derive(Parser)]
#[command(name = "wards")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to .wards.toml, wards.toml or .config/wards.toml)
    #[arg(short, long, global = true, env = "WARDS_CONFIG")]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to stderr as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statement a lookup would run
    Sql {
        #[command(subcommand)]
        lookup: Lookup,
    },

    /// Run a lookup and print its outcome
    Query {
        /// Database file (defaults to general.database_path)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print a short summary instead of JSON
        #[arg(long)]
        text: bool,

        /// Print query timings to stderr afterwards
        #[arg(long)]
        metrics: bool,

        #[command(subcommand)]
        lookup: Lookup,
    },

    /// Create a database from GeoJSON files
    Load {
        /// Database file to create or extend
        #[arg(long)]
        db: PathBuf,

        /// FeatureCollection of ward outlines with attributes
        #[arg(long)]
        wards: String,

        /// Country boundary (geometry, Feature or FeatureCollection)
        #[arg(long)]
        country: Option<String>,
    },

    /// Print bounds and map framing for a geometry payload
    Frame {
        /// GeoJSON file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return report_core(&err, cli.json_logs),
    };

    let logging = &config.schema.logging;
    let json_logs = cli.json_logs || logging.json;
    let telemetry = TelemetryConfig {
        log_level: if cli.verbose {
            "debug".to_string()
        } else {
            logging.level.clone()
        },
        json: json_logs,
        show_target: logging.show_target,
    };
    if let Err(err) = wards_telemetry::init_with_config(telemetry) {
        Status::warning(&err.to_string());
    }

    tracing::debug!(
        session_id = wards_telemetry::session_id(),
        config = ?config.path,
        "Starting"
    );

    let result = match cli.command {
        Commands::Sql { lookup } => sql::run(&config.schema.query, &lookup),
        Commands::Query {
            db,
            text,
            metrics,
            lookup,
        } => {
            let result = query::run(&config.schema, db, text, &lookup);
            if metrics {
                eprintln!("{}", wards_telemetry::metrics().export_json());
            }
            result
        }
        Commands::Load { db, wards, country } => load::run(
            &config.schema.query,
            &db,
            &wards,
            country.as_deref(),
            cli.json_logs,
        ),
        Commands::Frame { input, json } => frame::run(&input, json),
    };

    match result {
        Ok(code) => code,
        Err(err) => report(&err, json_logs),
    }
}

fn report(err: &anyhow::Error, json: bool) -> ExitCode {
    let core = err.downcast_ref::<wards_core::Error>().or_else(|| {
        match err.downcast_ref::<QueryError>() {
            Some(QueryError::InvalidInput(core)) => Some(core),
            _ => None,
        }
    });

    match core {
        Some(core) => report_core(core, json),
        None => {
            Status::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Print a structured error, as one JSON line when logs are JSON.
fn report_core(err: &wards_core::Error, json: bool) -> ExitCode {
    let line = json.then(|| serde_json::to_string(&err.to_report()).ok()).flatten();
    match line {
        Some(line) => eprintln!("{line}"),
        None => Status::report(err),
    }
    exit_code(err.code.exit_code())
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
