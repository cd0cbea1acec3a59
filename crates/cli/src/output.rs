//! Terminal output utilities
//!
//! Status lines go to stdout, problems to stderr. Formatting helpers
//! return plain strings so they can be tested without a terminal.

use owo_colors::OwoColorize;
use wards_geo::{BoundingBox, Coordinate, Viewport};
use wards_query::WardFeature;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a structured error with its code and suggestion
    pub fn report(error: &wards_core::Error) {
        eprintln!(
            "{} {} {}",
            "✗".red(),
            format!("[{}]", error.code).dimmed(),
            error.message
        );
        if let Some(context) = &error.context {
            eprintln!("  {} {}", "context:".dimmed(), context);
        }
        if let Some(suggestion) = &error.suggestion {
            eprintln!("  {} {}", "hint:".cyan(), suggestion);
        }
    }
}

/// Format a distance in meters: whole meters below 1 km, else kilometres
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

/// Format a coordinate as `lat, lng` with six decimals
pub fn format_coordinate(coord: &Coordinate) -> String {
    format!("{:.6}, {:.6}", coord.latitude, coord.longitude)
}

/// Format a bounding box as `[minLng, minLat, maxLng, maxLat]`
pub fn format_bbox(bbox: &BoundingBox) -> String {
    let [min_lng, min_lat, max_lng, max_lat] = bbox.as_array();
    format!("[{min_lng:.6}, {min_lat:.6}, {max_lng:.6}, {max_lat:.6}]")
}

/// Format a viewport as its centre and zoom
pub fn format_viewport(viewport: &Viewport) -> String {
    format!(
        "center {} zoom {}",
        format_coordinate(&viewport.center),
        viewport.zoom
    )
}

/// One-line summary of a ward: name, constituency, county and distance
pub fn format_ward(feature: &WardFeature) -> String {
    let ward = &feature.ward;
    let mut line = format!(
        "#{} {} ({}, {})",
        ward.id, ward.ward, ward.constituency, ward.county
    );
    if let Some(distance) = feature.distance {
        line.push_str(&format!(" {}", format_distance(distance)));
    }
    if feature.geometry.is_none() {
        line.push_str(" [no outline]");
    }
    line
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
