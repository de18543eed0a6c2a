//! Serde types for the raw transit schema document.
//!
//! The document is produced by the upstream schema extractor:
//! `{stops: [...], transfers: [...], networks: [...]}`. Unknown fields are
//! ignored so documents that grow shape or trip data keep parsing; missing
//! required fields fail the parse before a build starts.

use serde::Deserialize;

/// The whole input document.
#[derive(Clone, Debug, Deserialize)]
pub struct TransitInput {
    pub stops: Vec<StopRecord>,
    pub transfers: Vec<TransferRecord>,
    pub networks: Vec<NetworkRecord>,
}

/// One stop with its entrances and exits.
#[derive(Clone, Debug, Deserialize)]
pub struct StopRecord {
    pub id: u64,
    pub osm_id: u64,
    pub osm_type: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub zone_id: Option<u64>,
    pub entrances: Vec<AccessPointRecord>,
    pub exits: Vec<AccessPointRecord>,
}

/// A physical entrance or exit serving a stop. `distance` is the access
/// cost from the gate to the stop platform.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessPointRecord {
    pub node_id: u64,
    pub lat: f64,
    pub lon: f64,
    pub distance: f64,
}

/// A transfer between two stops: `[start_stop_id, finish_stop_id, weight]`.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct TransferRecord(pub u64, pub u64, pub f64);

impl TransferRecord {
    pub fn start_stop_id(&self) -> u64 {
        self.0
    }

    pub fn finish_stop_id(&self) -> u64 {
        self.1
    }

    pub fn weight(&self) -> f64 {
        self.2
    }
}

/// An operator network and its routes.
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkRecord {
    pub agency_id: u32,
    /// The network's display title.
    pub network: String,
    pub routes: Vec<RouteRecord>,
}

/// A route groups the itineraries sharing one number and colour.
#[derive(Clone, Debug, Deserialize)]
pub struct RouteRecord {
    pub route_id: u64,
    pub name: String,
    /// The route's display number ("M4", "Circle", ...).
    #[serde(rename = "ref")]
    pub number: String,
    #[serde(rename = "type")]
    pub route_type: String,
    #[serde(default)]
    pub colour: Option<String>,
    pub itineraries: Vec<ItineraryRecord>,
}

/// One directional stop sequence of a route.
#[derive(Clone, Debug, Deserialize)]
pub struct ItineraryRecord {
    #[serde(default)]
    pub name: Option<String>,
    pub stops: Vec<u64>,
}
