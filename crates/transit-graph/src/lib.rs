//! # transit-graph
//!
//! Converts raw public-transit schema data (stops, routes/itineraries,
//! transfers) into a renderable transit graph: stops, clustered interchange
//! nodes, connectivity edges, and smooth curved line geometry, suitable for
//! downstream map-rendering compilation.
//!
//! The transformation is a one-shot batch job: parse an input document into
//! [`input::TransitInput`], run [`builder::TransitGraphBuilder::build`], and
//! serialize the resulting [`model::TransitGraph`]. The builder is
//! single-threaded and memoizes its result; there is no incremental or
//! interactive mode.
//!
//! ## Example
//!
//! ```
//! use transit_graph::prelude::*;
//!
//! let input = TransitInput {
//!     stops: vec![
//!         StopRecord {
//!             id: 1,
//!             osm_id: 101,
//!             osm_type: "n".into(),
//!             lat: 55.77,
//!             lon: 37.58,
//!             zone_id: None,
//!             entrances: vec![],
//!             exits: vec![],
//!         },
//!         StopRecord {
//!             id: 2,
//!             osm_id: 102,
//!             osm_type: "n".into(),
//!             lat: 55.78,
//!             lon: 37.60,
//!             zone_id: None,
//!             entrances: vec![],
//!             exits: vec![],
//!         },
//!     ],
//!     transfers: vec![],
//!     networks: vec![NetworkRecord {
//!         agency_id: 1,
//!         network: "Metro".into(),
//!         routes: vec![RouteRecord {
//!             route_id: 7000,
//!             name: "Line One".into(),
//!             number: "1".into(),
//!             route_type: "subway".into(),
//!             colour: None,
//!             itineraries: vec![ItineraryRecord {
//!                 name: None,
//!                 stops: vec![1, 2],
//!             }],
//!         }],
//!     }],
//! };
//!
//! let mut builder = TransitGraphBuilder::new(input);
//! let graph = builder.build().unwrap();
//! assert_eq!(graph.lines.len(), 1);
//! assert_eq!(graph.shapes.len(), 1);
//! ```

pub mod builder;
pub mod cluster;
pub mod curve;
pub mod identifiers;
pub mod input;
pub mod mercator;
pub mod model;
pub mod palette;

// Re-exports for convenience
pub mod prelude {
    pub use crate::builder::{BuildError, TransitGraphBuilder};
    pub use crate::input::{
        AccessPointRecord, ItineraryRecord, NetworkRecord, RouteRecord, StopRecord,
        TransferRecord, TransitInput,
    };
    pub use crate::model::{
        Edge, Gate, Line, Network, Shape, Stop, TitleAnchor, TransferNode, TransitGraph,
    };
}

pub use prelude::*;
