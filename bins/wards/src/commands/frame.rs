//! `wards frame`: bounds and map framing for one geometry.

use super::read_input;
use std::process::ExitCode;
use wards_cli::output::{format_bbox, format_coordinate, format_viewport, Status};
use wards_core::{Error, ErrorCode};
use wards_geo::{centroid, compute_bounding_box, Geometry, Viewport};

pub fn run(input: &str, json: bool) -> anyhow::Result<ExitCode> {
    let text = read_input(input)?;
    let geometry = Geometry::from_geojson_str(&text)
        .map_err(|err| Error::new(ErrorCode::MalformedGeometry, err.to_string()))?;

    let bbox = compute_bounding_box(&geometry);
    let viewport = bbox.as_ref().map(Viewport::frame);
    let center = centroid(&geometry);

    if json {
        let summary = serde_json::json!({
            "type": geometry.kind(),
            "positions": geometry.position_count(),
            "bbox": bbox.map(|b| b.as_array()),
            "centroid": center,
            "viewport": viewport,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        Status::header(geometry.kind());
        println!("positions: {}", geometry.position_count());
        if let Some(bbox) = &bbox {
            println!("bbox:      {}", format_bbox(bbox));
        }
        if let Some(center) = &center {
            println!("centroid:  {}", format_coordinate(center));
        }
        if let Some(viewport) = &viewport {
            println!("viewport:  {}", format_viewport(viewport));
        }
    }

    Ok(ExitCode::SUCCESS)
}
