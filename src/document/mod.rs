//! # Stored documents
//!
//! A vertex document carries its identity, user properties and two
//! adjacency markers (`_edge`, `_reverse_edge`). Each marker is stored in
//! one of two layouts:
//!
//! | Layout | Marker value | Edges live in |
//! |--------|--------------|---------------|
//! | Inline | `[edge, ...]` | the vertex document itself |
//! | Spilled | `{"_edges": [{"id": ..}, ..]}` | auxiliary spill documents |
//!
//! Spill documents look like
//! `{"id", "_is_reverse": bool, "_vertex_id": owner, "_edge": [edge, ...]}`
//! and are supplied to the materializer through a [`SpillTable`].

pub mod materialize;

use hashbrown::HashMap;

use crate::model::keys;
use crate::{Error, Result};

pub use materialize::materialize_vertex;

/// Spill documents by id, fetched ahead of materialization.
#[derive(Debug, Clone, Default)]
pub struct SpillTable {
    documents: HashMap<String, serde_json::Value>,
}

impl SpillTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from documents, keying each by its `id`.
    pub fn from_documents<I>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        let mut table = Self::new();
        for doc in documents {
            table.insert(doc)?;
        }
        Ok(table)
    }

    /// Add a spill document. Documents without a string `id` are rejected.
    pub fn insert(&mut self, document: serde_json::Value) -> Result<()> {
        let id = document
            .get(keys::ID)
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| Error::MalformedDocument {
                document_id: "<unknown>".into(),
                message: "spill document without a string id".into(),
            })?;
        self.documents.insert(id, document);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&serde_json::Value> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spill_table_keys_by_id() {
        let table = SpillTable::from_documents(vec![
            json!({"id": "s1", "_is_reverse": false, "_vertex_id": "1", "_edge": []}),
            json!({"id": "s2", "_is_reverse": true, "_vertex_id": "1", "_edge": []}),
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get("s2").is_some());
        assert!(table.get("s3").is_none());
    }

    #[test]
    fn test_spill_table_rejects_missing_id() {
        let err = SpillTable::from_documents(vec![json!({"_edge": []})]).unwrap_err();
        assert!(err.is_integrity_fault());
    }
}
