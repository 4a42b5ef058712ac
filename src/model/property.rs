//! Property: a named attribute on a vertex or an edge.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use super::value::json_text;
use super::{JsonType, Scalar};

/// Which kind of entity owns the property. Only affects rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Vertex,
    Edge,
}

/// A named attribute. The value is kept as untyped text plus its JSON type.
#[derive(Debug, Clone)]
pub struct Property {
    kind: PropertyKind,
    name: String,
    text: String,
    json_type: JsonType,
}

/// Property name → property, in document order.
pub type PropertyMap = IndexMap<String, Property>;

impl Property {
    pub fn new(
        kind: PropertyKind,
        name: impl Into<String>,
        text: impl Into<String>,
        json_type: JsonType,
    ) -> Self {
        Self { kind, name: name.into(), text: text.into(), json_type }
    }

    pub fn vertex(name: impl Into<String>, text: impl Into<String>, json_type: JsonType) -> Self {
        Self::new(PropertyKind::Vertex, name, text, json_type)
    }

    pub fn edge(name: impl Into<String>, text: impl Into<String>, json_type: JsonType) -> Self {
        Self::new(PropertyKind::Edge, name, text, json_type)
    }

    pub fn from_json(kind: PropertyKind, name: &str, value: &serde_json::Value) -> Self {
        Self::new(kind, name, json_text(value), JsonType::of(value))
    }

    pub fn kind(&self) -> PropertyKind { self.kind }
    pub fn name(&self) -> &str { &self.name }
    pub fn text(&self) -> &str { &self.text }
    pub fn json_type(&self) -> JsonType { self.json_type }

    /// Overwrite the value in place.
    pub fn set(&mut self, text: impl Into<String>, json_type: JsonType) {
        self.text = text.into();
        self.json_type = json_type;
    }

    pub fn scalar(&self) -> Scalar {
        Scalar::new(self.text.clone(), self.json_type)
    }
}

/// Overwrite-in-place when `name` exists, insert otherwise.
pub(crate) fn upsert(
    properties: &mut PropertyMap,
    kind: PropertyKind,
    name: &str,
    text: impl Into<String>,
    json_type: JsonType,
) {
    match properties.get_mut(name) {
        Some(existing) => existing.set(text, json_type),
        None => {
            properties.insert(name.to_owned(), Property::new(kind, name, text, json_type));
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name && self.text == other.text
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.name.hash(state);
        self.text.hash(state);
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            PropertyKind::Vertex => "vp",
            PropertyKind::Edge => "p",
        };
        write!(f, "{prefix}[{}->{}]", self.name, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_prefix() {
        let vp = Property::vertex("name", "marko", JsonType::String);
        let ep = Property::edge("weight", "0.5", JsonType::Number);
        assert_eq!(vp.to_string(), "vp[name->marko]");
        assert_eq!(ep.to_string(), "p[weight->0.5]");
    }

    #[test]
    fn test_from_json_keeps_type() {
        let p = Property::from_json(PropertyKind::Vertex, "alive", &json!(true));
        assert_eq!(p.text(), "true");
        assert_eq!(p.json_type(), JsonType::Boolean);

        let s = Property::from_json(PropertyKind::Vertex, "name", &json!("josh"));
        assert_eq!(s.text(), "josh");
        assert!(s.json_type().is_quoted());
    }

    #[test]
    fn test_upsert_overwrites_then_inserts() {
        let mut props = PropertyMap::new();
        upsert(&mut props, PropertyKind::Edge, "weight", "0.5", JsonType::Number);
        upsert(&mut props, PropertyKind::Edge, "weight", "heavy", JsonType::String);
        upsert(&mut props, PropertyKind::Edge, "since", "2010", JsonType::Number);

        assert_eq!(props.len(), 2);
        assert_eq!(props["weight"].text(), "heavy");
        assert_eq!(props["weight"].json_type(), JsonType::String);
    }
}
