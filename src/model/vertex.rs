//! Vertex in the property graph.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::property::upsert;
use super::{keys, AdjacencyList, JsonType, Property, PropertyKind, PropertyMap};

/// A vertex materialized from one stored document.
///
/// Owns exactly two adjacency lists. `id` and `label` are also present in
/// `properties` so that direct lookup of either works like any other field.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: String,
    pub label: Option<String>,
    pub properties: PropertyMap,
    pub forward: Arc<AdjacencyList>,
    pub backward: Arc<AdjacencyList>,
    /// The document the vertex was built from.
    pub document: serde_json::Value,
}

impl Vertex {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut properties = PropertyMap::new();
        properties.insert(
            keys::ID.to_owned(),
            Property::vertex(keys::ID, id.clone(), JsonType::String),
        );
        Self {
            id,
            label: None,
            properties,
            forward: Arc::new(AdjacencyList::new()),
            backward: Arc::new(AdjacencyList::new()),
            document: serde_json::Value::Null,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.update_property(keys::LABEL, label, JsonType::String);
        self
    }

    pub fn with_property(mut self, name: &str, value: &serde_json::Value) -> Self {
        self.properties
            .insert(name.to_owned(), Property::from_json(PropertyKind::Vertex, name, value));
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }

    /// Direct lookup, reserved names included.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// User-visible properties: reserved names filtered out.
    pub fn user_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties
            .values()
            .filter(|p| !keys::is_reserved_vertex_property(p.name()))
    }

    /// Overwrite in place, or insert when absent.
    ///
    /// Writing `id` or `label` also updates the matching field, so
    /// rendering, equality and label checks see the new value.
    pub fn update_property(&mut self, name: &str, text: impl Into<String>, json_type: JsonType) {
        let text = text.into();
        match name {
            keys::ID => self.id = text.clone(),
            keys::LABEL => self.label = Some(text.clone()),
            _ => {}
        }
        upsert(&mut self.properties, PropertyKind::Vertex, name, text, json_type);
    }

    fn identity(&self) -> String {
        self.id.to_lowercase()
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.id)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}
