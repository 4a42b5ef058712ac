//! Field names of the stored document schema.

/// Vertex identity.
pub const ID: &str = "id";
/// Vertex or edge label.
pub const LABEL: &str = "label";
/// Forward (outgoing) adjacency marker on a vertex document.
pub const FORWARD_ADJACENCY: &str = "_edge";
/// Backward (incoming) adjacency marker on a vertex document.
pub const BACKWARD_ADJACENCY: &str = "_reverse_edge";
/// Looking up this name on a vertex or edge yields the entity itself.
pub const SELF_REFERENCE: &str = "*";

pub const PARTITION: &str = "_partition";
pub const NEXT_EDGE_OFFSET: &str = "_nextEdgeOffset";

// Edge object fields
pub const OFFSET: &str = "_offset";
pub const SOURCE_ID: &str = "_srcV";
pub const SOURCE_LABEL: &str = "_srcVLabel";
pub const SINK_ID: &str = "_sinkV";
pub const SINK_LABEL: &str = "_sinkVLabel";
pub const EDGE_ID: &str = "_edgeId";

// Spilled layout
pub const SPILL_DOCUMENTS: &str = "_edges";
pub const SPILL_IS_REVERSE: &str = "_is_reverse";
pub const SPILL_VERTEX_ID: &str = "_vertex_id";

/// Fields the document store adds to every document.
pub const STORAGE_METADATA: [&str; 5] = ["_rid", "_self", "_etag", "_attachments", "_ts"];

/// Vertex fields hidden from property enumeration and wire output.
pub const RESERVED_VERTEX_PROPERTIES: [&str; 6] = [
    ID,
    LABEL,
    PARTITION,
    FORWARD_ADJACENCY,
    BACKWARD_ADJACENCY,
    NEXT_EDGE_OFFSET,
];

/// Edge fields hidden from property enumeration and wire output.
pub const RESERVED_EDGE_PROPERTIES: [&str; 7] = [
    LABEL,
    OFFSET,
    SOURCE_ID,
    SOURCE_LABEL,
    SINK_ID,
    SINK_LABEL,
    EDGE_ID,
];

pub fn is_storage_metadata(name: &str) -> bool {
    STORAGE_METADATA.contains(&name)
}

pub fn is_reserved_vertex_property(name: &str) -> bool {
    RESERVED_VERTEX_PROPERTIES.contains(&name)
}

pub fn is_reserved_edge_property(name: &str) -> bool {
    RESERVED_EDGE_PROPERTIES.contains(&name)
}
