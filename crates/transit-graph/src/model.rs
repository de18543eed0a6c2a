//! Entities of the generated transit graph.
//!
//! These are value-like records addressed by id; once the builder finishes,
//! the whole graph is immutable. Field names follow the output document
//! format consumed by the downstream map compiler, so serde attributes here
//! are part of the contract: optional fields are omitted entirely when
//! absent, and stops serialize as an object keyed by stop id.

use std::collections::BTreeMap;

use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Text placement hint for a stop or interchange label.
///
/// Anchor computation is not implemented yet; the collections are emitted
/// empty, but the downstream reader expects the field to exist.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct TitleAnchor {
    pub min_zoom: u8,
    pub anchor: u8,
}

/// A transit stop with its encoded source id and projected position.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Stop {
    pub id: u64,
    pub osm_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<u64>,
    pub point: Coord<f64>,
    /// Populated during network ingestion; a stop served by several lines
    /// lists each of them.
    pub line_ids: Vec<u64>,
    pub title_anchors: Vec<TitleAnchor>,
    /// Set only if the stop was merged into an interchange node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<u64>,
}

/// A physical entrance/exit point shared by every stop reachable from it at
/// the same access cost.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Gate {
    pub osm_id: u64,
    pub point: Coord<f64>,
    pub weight: f64,
    pub stop_ids: Vec<u64>,
    pub entrance: bool,
    pub exit: bool,
}

/// An operator network.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Network {
    pub id: u32,
    pub title: String,
}

/// One itinerary of a route, rendered as a single line.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Line {
    pub id: u64,
    #[serde(rename = "type")]
    pub line_type: String,
    pub network_id: u32,
    pub title: String,
    pub number: String,
    /// Packed RGBA; 0 when the route supplied no colour.
    pub color: u32,
    pub stop_ids: Vec<u64>,
}

/// A connection between two stops: either a transfer or one hop of a line.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Edge {
    pub start_stop_id: u64,
    pub finish_stop_id: u64,
    pub transfer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<u64>,
    /// A line edge maps to exactly one shape today; the list form tolerates
    /// future multi-shape edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_ids: Option<Vec<u64>>,
}

impl Edge {
    pub fn transfer_between(start_stop_id: u64, finish_stop_id: u64, weight: f64) -> Self {
        Self {
            start_stop_id,
            finish_stop_id,
            transfer: true,
            weight: Some(weight),
            line_id: None,
            shape_ids: None,
        }
    }

    pub fn on_line(start_stop_id: u64, finish_stop_id: u64, line_id: u64) -> Self {
        Self {
            start_stop_id,
            finish_stop_id,
            transfer: false,
            weight: None,
            line_id: Some(line_id),
            shape_ids: Some(Vec::new()),
        }
    }
}

/// A synthetic node standing in for one or more stops merged by transfers.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TransferNode {
    pub id: u64,
    /// Sorted, immutable member set.
    pub stop_ids: Vec<u64>,
    /// Arithmetic mean of the member stops' points.
    pub point: Coord<f64>,
    pub title_anchors: Vec<TitleAnchor>,
}

/// The generated polyline geometry for one segment.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Shape {
    pub id: u64,
    pub stop1_id: u64,
    pub stop2_id: u64,
    pub polyline: Vec<Coord<f64>>,
}

/// The fully assembled output document. Every id reference inside one
/// collection resolves to an entity in another.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TransitGraph {
    pub networks: Vec<Network>,
    pub lines: Vec<Line>,
    pub gates: Vec<Gate>,
    pub stops: BTreeMap<u64, Stop>,
    pub transfers: Vec<TransferNode>,
    pub shapes: Vec<Shape>,
    pub edges: Vec<Edge>,
}
