//! Edge in the property graph.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::property::upsert;
use super::{keys, JsonType, Property, PropertyKind, PropertyMap};

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// A directed edge, as seen from one of its endpoints' adjacency lists.
///
/// Endpoint fields are optional: the stored edge object may omit the
/// counterpart's label (or, for corrupt data, its id).
#[derive(Debug, Clone)]
pub struct Edge {
    pub label: Option<String>,
    pub out_vertex_id: Option<String>,
    pub out_vertex_label: Option<String>,
    pub in_vertex_id: Option<String>,
    pub in_vertex_label: Option<String>,
    /// Sequence offset within the owning vertex's adjacency.
    pub offset: i64,
    /// Spill document the edge was read from, if the adjacency was spilled.
    pub spill_document_id: Option<String>,
    /// Every field of the stored edge object, reserved ones included.
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(offset: i64) -> Self {
        Self {
            label: None,
            out_vertex_id: None,
            out_vertex_label: None,
            in_vertex_id: None,
            in_vertex_label: None,
            offset,
            spill_document_id: None,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_out_vertex(mut self, id: impl Into<String>, label: Option<&str>) -> Self {
        self.out_vertex_id = Some(id.into());
        self.out_vertex_label = label.map(str::to_owned);
        self
    }

    pub fn with_in_vertex(mut self, id: impl Into<String>, label: Option<&str>) -> Self {
        self.in_vertex_id = Some(id.into());
        self.in_vertex_label = label.map(str::to_owned);
        self
    }

    pub fn with_property(mut self, name: &str, value: &serde_json::Value) -> Self {
        self.properties.insert(name.to_owned(), Property::from_json(PropertyKind::Edge, name, value));
        self
    }

    /// Direct lookup, reserved names included.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// User-visible properties: reserved names filtered out.
    pub fn user_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties
            .values()
            .filter(|p| !keys::is_reserved_edge_property(p.name()))
    }

    /// Overwrite in place, or insert when absent.
    ///
    /// Writing `label`, `_offset` or an endpoint field also updates the
    /// matching struct field. An `_offset` that is not an integer leaves
    /// `offset` unchanged. The key of an edge already held in an
    /// [`AdjacencyList`](super::AdjacencyList) does not follow an offset change.
    pub fn update_property(&mut self, name: &str, text: impl Into<String>, json_type: JsonType) {
        let text = text.into();
        match name {
            keys::LABEL => self.label = Some(text.clone()),
            keys::OFFSET => {
                if let Ok(offset) = text.parse() {
                    self.offset = offset;
                }
            }
            keys::SOURCE_ID => self.out_vertex_id = Some(text.clone()),
            keys::SOURCE_LABEL => self.out_vertex_label = Some(text.clone()),
            keys::SINK_ID => self.in_vertex_id = Some(text.clone()),
            keys::SINK_LABEL => self.in_vertex_label = Some(text.clone()),
            _ => {}
        }
        upsert(&mut self.properties, PropertyKind::Edge, name, text, json_type);
    }

    /// Id of the vertex the edge leaves.
    pub fn source_id(&self) -> Option<&str> {
        self.out_vertex_id.as_deref()
    }

    /// Id of the vertex the edge enters.
    pub fn sink_id(&self) -> Option<&str> {
        self.in_vertex_id.as_deref()
    }

    /// The endpoint opposite `from`.
    pub fn other_vertex_id(&self, from: &str) -> Option<&str> {
        let out_id = self.out_vertex_id.as_deref();
        let in_id = self.in_vertex_id.as_deref();
        if out_id == Some(from) { in_id }
        else if in_id == Some(from) { out_id }
        else { None }
    }

    /// Lower-cased canonical form; identity for equality and hashing.
    fn identity(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |s: &Option<String>| s.clone().unwrap_or_default();
        write!(
            f,
            "e[{}]{}({})-{}->{}({})",
            self.offset,
            part(&self.out_vertex_id),
            part(&self.out_vertex_label),
            part(&self.label),
            part(&self.in_vertex_id),
            part(&self.in_vertex_label),
        )
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}
