//! Subcommand implementations.

pub mod frame;
pub mod load;
pub mod query;
pub mod sql;

use clap::{Args, Subcommand};
use wards_core::{Error, ErrorCode};

/// A WGS84 coordinate given as `--lat`/`--lng`.
#[derive(Args, Debug, Clone, Copy)]
pub struct PointArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

/// The lookups shared by `sql` and `query`.
#[derive(Subcommand, Debug, Clone)]
pub enum Lookup {
    /// Whether a point lies inside the country boundary
    InCountry(PointArgs),

    /// The ward containing a point
    WardAt(PointArgs),

    /// Wards near a point, nearest first
    Nearby {
        #[command(flatten)]
        point: PointArgs,

        /// Search radius in meters (defaults to query.nearby_radius_m)
        #[arg(long)]
        radius: Option<f64>,

        /// Maximum rows (defaults to query.nearby_limit)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Wards nearest to a reference ward
    Neighbors {
        /// Reference ward id
        #[arg(long)]
        id: Option<i64>,
    },

    /// One ward by id
    ById {
        /// Ward id
        id: i64,
    },

    /// Wards whose name, county or constituency contains a term
    Search {
        /// Case-insensitive search term
        term: String,
    },
}

/// Read a file, or stdin for `-`.
pub fn read_input(input: &str) -> wards_core::Result<String> {
    let text = if input == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(input)
    };

    text.map_err(|err| {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            _ => ErrorCode::IoError,
        };
        Error::new(code, format!("Failed to read {}: {}", input, err)).with_source(err)
    })
}
