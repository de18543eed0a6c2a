//! GeoJSON preview of a generated transit scheme.
//!
//! A pure read of the finalized graph: shape polylines become LineString
//! features, stops and interchange nodes become Point features with a `role`
//! property for styling. Coordinates are the scheme plane's (x = longitude,
//! y = Mercator latitude), so the file is meant for quick visual inspection
//! rather than precise geographic overlay.

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use std::path::Path;
use transit_graph::{Shape, Stop, TransferNode, TransitGraph};

fn shape_to_feature(shape: &Shape) -> Feature {
    let line: Vec<Vec<f64>> = shape.polyline.iter().map(|p| vec![p.x, p.y]).collect();

    let mut properties = serde_json::Map::new();
    properties.insert("role".to_string(), serde_json::json!("shape"));
    properties.insert("shape_id".to_string(), serde_json::json!(shape.id));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(line))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Stops serving more than two lines are marked as hubs, matching the
/// emphasis the interactive preview gives them.
fn stop_to_feature(stop: &Stop) -> Feature {
    let role = if stop.line_ids.len() > 2 { "hub" } else { "stop" };

    let mut properties = serde_json::Map::new();
    properties.insert("role".to_string(), serde_json::json!(role));
    properties.insert("stop_id".to_string(), serde_json::json!(stop.id));
    properties.insert(
        "line_count".to_string(),
        serde_json::json!(stop.line_ids.len()),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            stop.point.x,
            stop.point.y,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn transfer_to_feature(node: &TransferNode) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("role".to_string(), serde_json::json!("transfer"));
    properties.insert("transfer_id".to_string(), serde_json::json!(node.id));
    properties.insert(
        "stop_count".to_string(),
        serde_json::json!(node.stop_ids.len()),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            node.point.x,
            node.point.y,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Write the preview document. Stops merged into an interchange node are
/// represented once by the node's feature, not per member stop.
pub fn write_preview_geojson(graph: &TransitGraph, output_path: &Path) -> Result<()> {
    let mut features: Vec<Feature> = graph.shapes.iter().map(shape_to_feature).collect();
    features.extend(
        graph
            .stops
            .values()
            .filter(|stop| stop.transfer_id.is_none())
            .map(stop_to_feature),
    );
    features.extend(graph.transfers.iter().map(transfer_to_feature));

    log::info!(
        "Writing preview ({} features) to {}",
        features.len(),
        output_path.display()
    );

    let feature_collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let geojson = GeoJson::from(feature_collection);
    let json_string =
        serde_json::to_string_pretty(&geojson).context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}
