//! Vertex materializer: stored JSON document → [`Vertex`].
//!
//! All-or-nothing. Any inconsistency in the document or in a referenced
//! spill document aborts construction with an integrity fault that names
//! the vertex (and spill document) involved.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use super::SpillTable;
use crate::model::value::json_text;
use crate::model::{keys, AdjacencyList, Edge, Property, PropertyKind, PropertyMap, Vertex};
use crate::{Error, Result};

/// Which adjacency marker is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Forward,
    Backward,
}

impl Side {
    fn field(self) -> &'static str {
        match self {
            Side::Forward => keys::FORWARD_ADJACENCY,
            Side::Backward => keys::BACKWARD_ADJACENCY,
        }
    }

    fn is_reverse(self) -> bool {
        self == Side::Backward
    }
}

/// Build a vertex from its stored document.
///
/// `spill` is only consulted for markers in the spilled layout; passing
/// `None` for a vertex that needs it is an integrity fault.
pub fn materialize_vertex(document: &JsonValue, spill: Option<&SpillTable>) -> Result<Vertex> {
    let object = document
        .as_object()
        .ok_or_else(|| malformed("<unknown>", "vertex document is not a JSON object"))?;
    let id = object
        .get(keys::ID)
        .map(json_text)
        .ok_or_else(|| malformed("<unknown>", "vertex document has no id"))?;

    let mut label = None;
    let mut properties = PropertyMap::new();
    let mut forward_marker = None;
    let mut backward_marker = None;

    for (name, value) in object {
        if keys::is_storage_metadata(name) {
            continue;
        }
        match name.as_str() {
            keys::FORWARD_ADJACENCY => forward_marker = Some(value),
            keys::BACKWARD_ADJACENCY => backward_marker = Some(value),
            _ => {
                if name == keys::LABEL {
                    label = Some(json_text(value));
                }
                properties.insert(name.clone(), Property::from_json(PropertyKind::Vertex, name, value));
            }
        }
    }

    let forward_marker = forward_marker
        .ok_or_else(|| malformed(&id, "missing forward adjacency marker '_edge'"))?;
    let backward_marker = backward_marker
        .ok_or_else(|| malformed(&id, "missing backward adjacency marker '_reverse_edge'"))?;

    let forward = build_adjacency(&id, label.as_deref(), Side::Forward, forward_marker, spill)?;
    let backward = build_adjacency(&id, label.as_deref(), Side::Backward, backward_marker, spill)?;

    tracing::debug!(
        vertex_id = %id,
        forward = forward.len(),
        backward = backward.len(),
        "materialized vertex"
    );

    Ok(Vertex {
        id,
        label,
        properties,
        forward: Arc::new(forward),
        backward: Arc::new(backward),
        document: document.clone(),
    })
}

fn build_adjacency(
    vertex_id: &str,
    vertex_label: Option<&str>,
    side: Side,
    marker: &JsonValue,
    spill: Option<&SpillTable>,
) -> Result<AdjacencyList> {
    match marker {
        JsonValue::Array(edges) => {
            let mut list = AdjacencyList::new();
            for edge_object in edges {
                insert_edge(&mut list, vertex_id, vertex_label, side, None, edge_object)?;
            }
            Ok(list)
        }
        JsonValue::Object(container) => {
            build_spilled(vertex_id, vertex_label, side, container, spill)
        }
        _ => {
            tracing::warn!(vertex_id, field = side.field(), "unknown adjacency layout");
            Err(Error::UnknownAdjacencyLayout {
                vertex_id: vertex_id.to_owned(),
                field: side.field().to_owned(),
            })
        }
    }
}

fn build_spilled(
    vertex_id: &str,
    vertex_label: Option<&str>,
    side: Side,
    container: &Map<String, JsonValue>,
    spill: Option<&SpillTable>,
) -> Result<AdjacencyList> {
    let references = container
        .get(keys::SPILL_DOCUMENTS)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| {
            malformed(vertex_id, format!("'{}' spill container has no '_edges' array", side.field()))
        })?;

    let mut list = AdjacencyList::new();
    for reference in references {
        let document_id = reference
            .get(keys::ID)
            .and_then(JsonValue::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed(vertex_id, "spill reference without an id"))?;

        let document = spill.and_then(|table| table.get(document_id)).ok_or_else(|| {
            tracing::warn!(vertex_id, document_id, "spill document missing");
            Error::MissingSpillDocument {
                vertex_id: vertex_id.to_owned(),
                document_id: document_id.to_owned(),
            }
        })?;

        let edges = validate_spill_document(vertex_id, side, document_id, document)?;
        tracing::debug!(vertex_id, document_id, edges = edges.len(), "resolved spill document");

        for edge_object in edges {
            insert_edge(&mut list, vertex_id, vertex_label, side, Some(document_id), edge_object)?;
        }
    }
    Ok(list)
}

/// Check direction, owner and non-emptiness; return the edge array.
fn validate_spill_document<'a>(
    vertex_id: &str,
    side: Side,
    document_id: &str,
    document: &'a JsonValue,
) -> Result<&'a Vec<JsonValue>> {
    let mismatch = |reason: String| {
        tracing::warn!(vertex_id, document_id, %reason, "inconsistent spill document");
        Error::SpillMismatch {
            vertex_id: vertex_id.to_owned(),
            document_id: document_id.to_owned(),
            reason,
        }
    };

    match document.get(keys::SPILL_IS_REVERSE).and_then(JsonValue::as_bool) {
        Some(flag) if flag == side.is_reverse() => {}
        Some(flag) => {
            return Err(mismatch(format!(
                "_is_reverse is {flag} but '{}' is being built",
                side.field()
            )))
        }
        None => return Err(mismatch("_is_reverse flag is missing".into())),
    }

    match document.get(keys::SPILL_VERTEX_ID).and_then(JsonValue::as_str) {
        Some(owner) if owner == vertex_id => {}
        Some(owner) => return Err(mismatch(format!("owned by vertex {owner}"))),
        None => return Err(mismatch("_vertex_id is missing".into())),
    }

    match document.get(keys::FORWARD_ADJACENCY).and_then(JsonValue::as_array) {
        Some(edges) if !edges.is_empty() => Ok(edges),
        _ => Err(mismatch("edge list is missing or empty".into())),
    }
}

/// Convert one stored edge object and insert it under its adjacency key.
///
/// Forward edges key by the owning vertex; backward edges key by `_srcV`.
fn insert_edge(
    list: &mut AdjacencyList,
    vertex_id: &str,
    vertex_label: Option<&str>,
    side: Side,
    spill_document_id: Option<&str>,
    edge_object: &JsonValue,
) -> Result<()> {
    let object = edge_object
        .as_object()
        .ok_or_else(|| malformed(vertex_id, "edge entry is not a JSON object"))?;
    let offset = object
        .get(keys::OFFSET)
        .and_then(JsonValue::as_i64)
        .ok_or_else(|| malformed(vertex_id, "edge entry without an integer _offset"))?;

    let mut edge = Edge::new(offset);
    edge.spill_document_id = spill_document_id.map(str::to_owned);
    for (name, value) in object {
        if name == keys::LABEL {
            edge.label = Some(json_text(value));
        }
        edge.properties
            .insert(name.clone(), Property::from_json(PropertyKind::Edge, name, value));
    }

    let key_vertex = match side {
        Side::Forward => {
            edge.out_vertex_id = Some(vertex_id.to_owned());
            edge.out_vertex_label = vertex_label.map(str::to_owned);
            edge.in_vertex_id = object.get(keys::SINK_ID).map(json_text);
            edge.in_vertex_label = object.get(keys::SINK_LABEL).map(json_text);
            vertex_id.to_owned()
        }
        Side::Backward => {
            edge.in_vertex_id = Some(vertex_id.to_owned());
            edge.in_vertex_label = vertex_label.map(str::to_owned);
            edge.out_vertex_id = object.get(keys::SOURCE_ID).map(json_text);
            edge.out_vertex_label = object.get(keys::SOURCE_LABEL).map(json_text);
            edge.out_vertex_id.clone().ok_or_else(|| {
                malformed(vertex_id, format!("backward edge {offset} without _srcV"))
            })?
        }
    };

    list.insert(&key_vertex, offset, edge)
}

fn malformed(document_id: &str, message: impl Into<String>) -> Error {
    let message = message.into();
    tracing::warn!(document_id, %message, "malformed vertex document");
    Error::MalformedDocument { document_id: document_id.to_owned(), message }
}
