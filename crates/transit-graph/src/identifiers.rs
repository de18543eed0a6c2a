//! Stable identifier encoding for transit entities.
//!
//! Stops and gates carry ids derived from their source OSM entities, with the
//! entity kind marked in the two high bits. Line ids pack the route id with
//! the itinerary index, and interchange node ids reuse the smallest member
//! stop id with bit 62 set so they can never collide with plain stop ids.

/// High-bit marker for an OSM node id.
pub const OSM_NODE: u64 = 0x4000_0000_0000_0000;
/// High-bit marker for an OSM way id.
pub const OSM_WAY: u64 = 0x8000_0000_0000_0000;
/// High-bit marker for an OSM relation id.
pub const OSM_RELATION: u64 = OSM_NODE | OSM_WAY;

/// Bit set on interchange node ids to keep them disjoint from stop ids.
pub const INTERCHANGE_FLAG: u64 = 1 << 62;

/// Encode a raw OSM id by marking its entity kind in the high bits.
///
/// The kind is matched by prefix, so both `"n"` and `"node"` select the node
/// marker. An unrecognized kind string is not fatal: it is logged and the raw
/// id is passed through unchanged.
pub fn encode_osm_id(raw_id: u64, kind: &str) -> u64 {
    match kind.bytes().next() {
        Some(b'n') => raw_id | OSM_NODE,
        Some(b'w') => raw_id | OSM_WAY,
        Some(b'r') => raw_id | OSM_RELATION,
        _ => {
            log::warn!("Unknown OSM type '{}' for id {}", kind, raw_id);
            raw_id
        }
    }
}

/// Pack a route id and itinerary index into a line id.
///
/// The itinerary index must fit in 8 bits; routes with more than 255
/// itineraries silently corrupt the id. Indexes restart at 0 per route, so
/// the id is unique per (route, itinerary) pair.
pub fn line_id(route_id: u64, itinerary_index: u32) -> u64 {
    route_id << 8 | itinerary_index as u64
}

/// Derive the id of an interchange node from its smallest member stop id.
///
/// Same cluster membership always yields the same id, regardless of the
/// order the cluster was merged in.
pub fn interchange_node_id(min_stop_id: u64) -> u64 {
    INTERCHANGE_FLAG | min_stop_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_osm_id_kinds() {
        assert_eq!(encode_osm_id(7, "n"), 7 | OSM_NODE);
        assert_eq!(encode_osm_id(7, "w"), 7 | OSM_WAY);
        assert_eq!(encode_osm_id(7, "r"), 7 | OSM_RELATION);
    }

    #[test]
    fn test_encode_osm_id_full_words() {
        assert_eq!(encode_osm_id(42, "node"), 42 | OSM_NODE);
        assert_eq!(encode_osm_id(42, "way"), 42 | OSM_WAY);
        assert_eq!(encode_osm_id(42, "relation"), 42 | OSM_RELATION);
    }

    #[test]
    fn test_encode_osm_id_unknown_kind_passes_through() {
        assert_eq!(encode_osm_id(42, "x"), 42);
        assert_eq!(encode_osm_id(42, ""), 42);
    }

    #[test]
    fn test_kind_markers_are_disjoint() {
        assert_ne!(OSM_NODE, OSM_WAY);
        assert_ne!(OSM_NODE, OSM_RELATION);
        assert_ne!(OSM_WAY, OSM_RELATION);
    }

    #[test]
    fn test_line_id_packing() {
        assert_eq!(line_id(0x1234, 0), 0x1234 << 8);
        assert_eq!(line_id(0x1234, 3), 0x1234 << 8 | 3);
        assert_eq!(line_id(1, 255), 0x1FF);
    }

    #[test]
    fn test_interchange_node_id_sets_bit_62() {
        assert_eq!(interchange_node_id(5), (1 << 62) | 5);
        // Encoded ids never collide with plain stop ids.
        assert_ne!(interchange_node_id(5), 5);
    }
}
