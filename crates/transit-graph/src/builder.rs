//! One-shot assembly of the renderable transit graph.
//!
//! `TransitGraphBuilder` turns a parsed input document into a
//! [`TransitGraph`](crate::model::TransitGraph) in a fixed sequence of
//! passes: stop/gate ingestion, transfer ingestion, network/line ingestion,
//! transfer clustering, then segment and shape generation. Each pass only
//! reads state the previous passes fully populated, and the assembled graph
//! is memoized: repeat `build` calls return the cached document.

use std::collections::{BTreeMap, BTreeSet};

use geo_types::Coord;
use thiserror::Error;

use crate::cluster::DisjointStopSets;
use crate::curve::catmull_rom_segment;
use crate::identifiers::{encode_osm_id, interchange_node_id, line_id};
use crate::input::{AccessPointRecord, NetworkRecord, StopRecord, TransferRecord, TransitInput};
use crate::mercator::project;
use crate::model::{Edge, Gate, Line, Network, Shape, Stop, TransferNode, TransitGraph};
use crate::palette::{Palette, ParseColorError};

/// Default number of points generated per curve.
pub const DEFAULT_POINTS_PER_CURVE: usize = 100;
/// Default Catmull-Rom parameterization exponent (centripetal).
pub const DEFAULT_ALPHA: f64 = 0.5;

/// A fatal defect in the input document. The build aborts without producing
/// partial output; unknown OSM kind strings are merely logged and are not
/// represented here.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A line's stop sequence references a stop missing from the stop table.
    #[error("line {line_id} references unknown stop {stop_id}")]
    UnknownLineStop { line_id: u64, stop_id: u64 },
    /// An id that is neither a stop nor an interchange node was referenced
    /// by a transfer or a guide-point set.
    #[error("unknown stop or interchange id {id}")]
    UnknownStop { id: u64 },
    /// A route's colour value could not be parsed.
    #[error("route {route_id}: {source}")]
    BadColour {
        route_id: u64,
        #[source]
        source: ParseColorError,
    },
}

enum BuildState {
    Unbuilt,
    Built(TransitGraph),
}

/// Builds the transit graph for one input document.
pub struct TransitGraphBuilder {
    input: TransitInput,
    points_per_curve: usize,
    alpha: f64,
    palette: Palette,
    state: BuildState,
}

impl TransitGraphBuilder {
    pub fn new(input: TransitInput) -> Self {
        Self::with_curve_params(input, DEFAULT_POINTS_PER_CURVE, DEFAULT_ALPHA)
    }

    pub fn with_curve_params(input: TransitInput, points_per_curve: usize, alpha: f64) -> Self {
        Self {
            input,
            points_per_curve,
            alpha,
            palette: Palette::new(),
            state: BuildState::Unbuilt,
        }
    }

    /// Run the whole transformation, or return the already-built graph.
    ///
    /// The first successful call transitions the builder to its built state;
    /// later calls return the cached graph without recomputation or side
    /// effects. A failed build leaves the builder unbuilt.
    pub fn build(&mut self) -> Result<&TransitGraph, BuildError> {
        if let BuildState::Unbuilt = self.state {
            let mut assembly = Assembly::default();
            assembly.ingest_stops(&self.input.stops);
            assembly.ingest_transfers(&self.input.transfers);
            assembly.ingest_networks(&self.input.networks, &self.palette)?;
            assembly.cluster_transfers()?;
            assembly.generate_shapes(self.points_per_curve, self.alpha)?;
            self.state = BuildState::Built(assembly.into_graph());
        }
        match &self.state {
            BuildState::Built(graph) => Ok(graph),
            BuildState::Unbuilt => unreachable!("state transitioned above"),
        }
    }
}

/// Sorted endpoint pair identifying one deduplicated segment.
type SegmentKey = (u64, u64);

fn segment_key(id1: u64, id2: u64) -> SegmentKey {
    if id1 <= id2 {
        (id1, id2)
    } else {
        (id2, id1)
    }
}

/// A deduplicated connection between two effective endpoints, accumulating
/// guide points from every line that traverses it.
#[derive(Debug)]
struct Segment {
    /// Per-endpoint sets of adjacent stop/interchange ids along the lines
    /// sharing this segment.
    guide_points: BTreeMap<u64, BTreeSet<u64>>,
    shape_id: Option<u64>,
}

impl Segment {
    fn between(id1: u64, id2: u64) -> Self {
        let mut guide_points = BTreeMap::new();
        guide_points.insert(id1, BTreeSet::new());
        guide_points.insert(id2, BTreeSet::new());
        Self {
            guide_points,
            shape_id: None,
        }
    }
}

/// Working state of one build. Owns every keyed collection; the passes below
/// are its only mutators, in the order `build` calls them.
#[derive(Default)]
struct Assembly {
    networks: Vec<Network>,
    lines: Vec<Line>,
    stops: BTreeMap<u64, Stop>,
    /// Keyed by (encoded osm id, weight bit pattern). Non-negative weights
    /// order the same as their bit patterns, so the float key is exact.
    gates: BTreeMap<(u64, u64), Gate>,
    transfers: BTreeMap<u64, TransferNode>,
    edges: Vec<Edge>,
    segments: BTreeMap<SegmentKey, Segment>,
    shapes: Vec<Shape>,
}

impl Assembly {
    /// Builds the stop table and merges entrance/exit records into gates.
    fn ingest_stops(&mut self, records: &[StopRecord]) {
        for record in records {
            let stop = Stop {
                id: record.id,
                osm_id: encode_osm_id(record.osm_id, &record.osm_type),
                zone_id: record.zone_id,
                point: project(record.lat, record.lon),
                line_ids: Vec::new(),
                title_anchors: Vec::new(),
                transfer_id: None,
            };
            self.stops.insert(stop.id, stop);

            for entrance in &record.entrances {
                self.add_gate(record.id, entrance, true, false);
            }
            for exit in &record.exits {
                self.add_gate(record.id, exit, false, true);
            }
        }
        log::debug!(
            "ingested {} stops, {} gates",
            self.stops.len(),
            self.gates.len()
        );
    }

    /// Two records with the same (encoded id, weight) are the same physical
    /// gate: their stop sets union and their flags OR together.
    fn add_gate(
        &mut self,
        stop_id: u64,
        access: &AccessPointRecord,
        is_entrance: bool,
        is_exit: bool,
    ) {
        let osm_id = encode_osm_id(access.node_id, "n");
        let point = project(access.lat, access.lon);
        let gate = self
            .gates
            .entry((osm_id, access.distance.to_bits()))
            .or_insert_with(|| Gate {
                osm_id,
                point,
                weight: access.distance,
                stop_ids: Vec::new(),
                entrance: false,
                exit: false,
            });
        if !gate.stop_ids.contains(&stop_id) {
            gate.stop_ids.push(stop_id);
        }
        gate.entrance |= is_entrance;
        gate.exit |= is_exit;
    }

    /// Transfer records become transfer edges verbatim.
    fn ingest_transfers(&mut self, records: &[TransferRecord]) {
        for record in records {
            self.edges.push(Edge::transfer_between(
                record.start_stop_id(),
                record.finish_stop_id(),
                record.weight(),
            ));
        }
    }

    /// Builds networks and one line per itinerary, attaches line ids to
    /// member stops, and materializes a line edge per consecutive stop pair.
    fn ingest_networks(
        &mut self,
        records: &[NetworkRecord],
        palette: &Palette,
    ) -> Result<(), BuildError> {
        for network_record in records {
            self.networks.push(Network {
                id: network_record.agency_id,
                title: network_record.network.clone(),
            });

            for route in &network_record.routes {
                // The itinerary index restarts at 0 for each route.
                for (index, itinerary) in route.itineraries.iter().enumerate() {
                    let id = line_id(route.route_id, index as u32);
                    let title = match &itinerary.name {
                        Some(name) => format!("{} ({})", route.name, name),
                        None => route.name.clone(),
                    };
                    let color = match &route.colour {
                        Some(spec) => palette
                            .nearest_color(spec)
                            .map_err(|source| BuildError::BadColour {
                                route_id: route.route_id,
                                source,
                            })?
                            .rgba(),
                        None => 0,
                    };

                    for (i, &stop_id) in itinerary.stops.iter().enumerate() {
                        let stop = self.stops.get_mut(&stop_id).ok_or(
                            BuildError::UnknownLineStop {
                                line_id: id,
                                stop_id,
                            },
                        )?;
                        stop.line_ids.push(id);
                        if i + 1 < itinerary.stops.len() {
                            self.edges
                                .push(Edge::on_line(stop_id, itinerary.stops[i + 1], id));
                        }
                    }

                    self.lines.push(Line {
                        id,
                        line_type: route.route_type.clone(),
                        network_id: network_record.agency_id,
                        title,
                        number: route.number.clone(),
                        color,
                        stop_ids: itinerary.stops.clone(),
                    });
                }
            }
        }
        log::debug!(
            "ingested {} networks, {} lines",
            self.networks.len(),
            self.lines.len()
        );
        Ok(())
    }

    /// Merges stops connected by transfer edges, directly or transitively,
    /// into interchange nodes and back-links every member stop.
    fn cluster_transfers(&mut self) -> Result<(), BuildError> {
        let mut sets = DisjointStopSets::new();
        for edge in self.edges.iter().filter(|edge| edge.transfer) {
            sets.union(edge.start_stop_id, edge.finish_stop_id);
        }

        for members in sets.clusters() {
            let point = self.average_point(&members)?;
            let id = interchange_node_id(members[0]);
            for &stop_id in &members {
                let stop = self
                    .stops
                    .get_mut(&stop_id)
                    .ok_or(BuildError::UnknownStop { id: stop_id })?;
                stop.transfer_id = Some(id);
            }
            self.transfers.insert(
                id,
                TransferNode {
                    id,
                    stop_ids: members,
                    point,
                    title_anchors: Vec::new(),
                },
            );
        }
        log::debug!("clustered {} interchange nodes", self.transfers.len());
        Ok(())
    }

    fn generate_shapes(&mut self, points_per_curve: usize, alpha: f64) -> Result<(), BuildError> {
        self.collect_segments()?;
        self.generate_segment_curves(points_per_curve, alpha)?;
        self.backfill_edge_shapes();
        Ok(())
    }

    /// Pass 1: walk every line, deduplicate the effective endpoint pairs it
    /// induces, and record adjacent stops as guide points so each segment's
    /// tangents can follow the neighboring segments of the same line.
    fn collect_segments(&mut self) -> Result<(), BuildError> {
        let sequences: Vec<Vec<u64>> = self
            .lines
            .iter()
            .map(|line| line.stop_ids.clone())
            .collect();

        for stop_ids in sequences {
            let mut prev: Option<(SegmentKey, u64)> = None;
            for pair in stop_ids.windows(2) {
                let id1 = self.effective_id(pair[0])?;
                let id2 = self.effective_id(pair[1])?;
                let key = segment_key(id1, id2);
                self.segments
                    .entry(key)
                    .or_insert_with(|| Segment::between(id1, id2));

                if let Some((prev_key, prev_id1)) = prev {
                    // id1 is the endpoint shared with the previous segment:
                    // this segment learns the stop before it, and the
                    // previous segment learns the stop after it.
                    if let Some(segment) = self.segments.get_mut(&key) {
                        segment.guide_points.entry(id1).or_default().insert(prev_id1);
                    }
                    if let Some(segment) = self.segments.get_mut(&prev_key) {
                        segment.guide_points.entry(id1).or_default().insert(id2);
                    }
                }
                prev = Some((key, id1));
            }
        }
        log::debug!("collected {} distinct segments", self.segments.len());
        Ok(())
    }

    /// Pass 2: assign shape ids in ascending segment-key order and evaluate
    /// one curve per segment.
    fn generate_segment_curves(
        &mut self,
        points_per_curve: usize,
        alpha: f64,
    ) -> Result<(), BuildError> {
        let keys: Vec<SegmentKey> = self.segments.keys().copied().collect();
        for (shape_id, key) in keys.into_iter().enumerate() {
            let shape_id = shape_id as u64;
            let (id1, id2) = key;
            let point1 = self.node_point(id1)?;
            let point2 = self.node_point(id2)?;

            let (guides1, guides2) = {
                let segment = &self.segments[&key];
                (
                    segment.guide_points.get(&id1).cloned().unwrap_or_default(),
                    segment.guide_points.get(&id2).cloned().unwrap_or_default(),
                )
            };
            let guide1 = self.guide_position(&guides1, point1, point2)?;
            let guide2 = self.guide_position(&guides2, point2, point1)?;

            let polyline =
                catmull_rom_segment(guide1, point1, point2, guide2, points_per_curve, alpha);

            if let Some(segment) = self.segments.get_mut(&key) {
                segment.shape_id = Some(shape_id);
            }
            self.shapes.push(Shape {
                id: shape_id,
                stop1_id: id1,
                stop2_id: id2,
                polyline,
            });
        }
        log::debug!("generated {} shapes", self.shapes.len());
        Ok(())
    }

    /// Pass 3: point every line edge at its segment's shape.
    fn backfill_edge_shapes(&mut self) {
        let stops = &self.stops;
        let segments = &self.segments;
        let effective = |id: u64| stops.get(&id).map(|stop| stop.transfer_id.unwrap_or(stop.id));

        for edge in &mut self.edges {
            if edge.transfer {
                continue;
            }
            let (Some(id1), Some(id2)) = (
                effective(edge.start_stop_id),
                effective(edge.finish_stop_id),
            ) else {
                continue;
            };
            if let Some(shape_id) = segments
                .get(&segment_key(id1, id2))
                .and_then(|segment| segment.shape_id)
            {
                if let Some(shape_ids) = edge.shape_ids.as_mut() {
                    shape_ids.push(shape_id);
                }
            }
        }
    }

    /// A stop's interchange node id if it was merged, else its own id.
    fn effective_id(&self, stop_id: u64) -> Result<u64, BuildError> {
        let stop = self
            .stops
            .get(&stop_id)
            .ok_or(BuildError::UnknownStop { id: stop_id })?;
        Ok(stop.transfer_id.unwrap_or(stop.id))
    }

    /// The projected point of a stop or interchange node.
    fn node_point(&self, id: u64) -> Result<Coord<f64>, BuildError> {
        if let Some(stop) = self.stops.get(&id) {
            return Ok(stop.point);
        }
        if let Some(node) = self.transfers.get(&id) {
            return Ok(node.point);
        }
        Err(BuildError::UnknownStop { id })
    }

    /// Arithmetic mean of the resolved points of `ids`. Must not be empty.
    fn average_point<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a u64>,
    ) -> Result<Coord<f64>, BuildError> {
        let mut sum = Coord { x: 0.0, y: 0.0 };
        let mut count = 0usize;
        for &id in ids {
            let point = self.node_point(id)?;
            sum.x += point.x;
            sum.y += point.y;
            count += 1;
        }
        debug_assert!(count > 0, "average of an empty id set");
        Ok(Coord {
            x: sum.x / count as f64,
            y: sum.y / count as f64,
        })
    }

    /// Mean of the guide set's points, or, for a true line terminus, the
    /// reflection of the opposite endpoint through this one.
    fn guide_position(
        &self,
        guide_ids: &BTreeSet<u64>,
        endpoint: Coord<f64>,
        opposite: Coord<f64>,
    ) -> Result<Coord<f64>, BuildError> {
        if guide_ids.is_empty() {
            return Ok(Coord {
                x: 2.0 * endpoint.x - opposite.x,
                y: 2.0 * endpoint.y - opposite.y,
            });
        }
        self.average_point(guide_ids)
    }

    /// Flatten the keyed gate and transfer collections into the output
    /// sequences; both stay in ascending key order.
    fn into_graph(self) -> TransitGraph {
        TransitGraph {
            networks: self.networks,
            lines: self.lines,
            gates: self.gates.into_values().collect(),
            stops: self.stops,
            transfers: self.transfers.into_values().collect(),
            shapes: self.shapes,
            edges: self.edges,
        }
    }
}
