//! In-memory document store.
//!
//! The reference implementation of [`Connection`]. Vertex and spill
//! documents are kept as raw JSON and materialized on every fetch.
//!
//! ## Limitations
//!
//! - **Full scans**: backward adjacency is recomputed by scanning every
//!   vertex's forward edges. Fine for tests and small embedded graphs.
//! - **No cross-document atomicity**: a vertex and its spill documents are
//!   inserted separately.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::{Connection, ConnectionConfig};
use crate::document::{materialize_vertex, SpillTable};
use crate::model::value::json_text;
use crate::model::{keys, AdjacencyList, Vertex};
use crate::{Error, Result};

// ============================================================================
// MemoryStore
// ============================================================================

/// Vertex and spill documents held in memory.
///
/// Clones share the same documents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
    config: ConnectionConfig,
}

#[derive(Default)]
struct MemoryInner {
    /// vertex id → document, in insertion order
    vertices: RwLock<IndexMap<String, serde_json::Value>>,
    spill: RwLock<SpillTable>,
    backward_fetches: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConnectionConfig) -> Self {
        Self { inner: Arc::default(), config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Store a vertex document, replacing any previous one with the same id.
    ///
    /// Non-string ids are keyed by their JSON text, the same way the
    /// materializer reads them.
    pub fn insert_vertex(&self, document: serde_json::Value) -> Result<String> {
        let id = document
            .get(keys::ID)
            .map(json_text)
            .ok_or_else(|| Error::StorageError("vertex document without an id".into()))?;
        self.inner.vertices.write().insert(id.clone(), document);
        Ok(id)
    }

    pub fn insert_spill(&self, document: serde_json::Value) -> Result<()> {
        self.inner.spill.write().insert(document)
    }

    pub fn remove_vertex(&self, id: &str) -> bool {
        self.inner.vertices.write().shift_remove(id).is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.vertices.read().len()
    }

    /// Every stored vertex document, in insertion order.
    pub fn vertex_documents(&self) -> Vec<serde_json::Value> {
        self.inner.vertices.read().values().cloned().collect()
    }

    /// Snapshot of the spill documents.
    pub fn spill_table(&self) -> SpillTable {
        self.inner.spill.read().clone()
    }

    /// How many times backward adjacency was fetched on demand.
    pub fn backward_fetches(&self) -> u64 {
        self.inner.backward_fetches.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Connection impl
// ============================================================================

impl Connection for MemoryStore {
    fn mirrors_backward_edges(&self) -> bool {
        self.config.mirrors_backward_edges
    }

    fn fetch_backward_adjacency(&self, vertex_id: &str) -> Result<AdjacencyList> {
        self.inner.backward_fetches.fetch_add(1, Ordering::Relaxed);

        let vertices = self.inner.vertices.read();
        let spill = self.inner.spill.read();
        let mut list = AdjacencyList::new();
        for document in vertices.values() {
            let source = materialize_vertex(document, Some(&*spill))?;
            for edge in source.forward.edges() {
                if edge.in_vertex_id.as_deref() == Some(vertex_id) {
                    list.insert(&source.id, edge.offset, (**edge).clone())?;
                }
            }
        }
        tracing::debug!(vertex_id, edges = list.len(), "fetched backward adjacency");
        Ok(list)
    }

    fn fetch_vertex(&self, vertex_id: &str) -> Result<Option<Vertex>> {
        let vertices = self.inner.vertices.read();
        let Some(document) = vertices.get(vertex_id) else {
            return Ok(None);
        };
        let spill = self.inner.spill.read();
        materialize_vertex(document, Some(&*spill)).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryStore {
        let store = MemoryStore::with_config(ConnectionConfig {
            mirrors_backward_edges: false,
            ..ConnectionConfig::default()
        });
        store
            .insert_vertex(json!({
                "id": "1", "label": "person",
                "_edge": [{"_offset": 0, "label": "knows", "_sinkV": "2", "_sinkVLabel": "person"}],
                "_reverse_edge": []
            }))
            .unwrap();
        store
            .insert_vertex(json!({
                "id": "4", "label": "person",
                "_edge": [
                    {"_offset": 0, "label": "knows", "_sinkV": "2", "_sinkVLabel": "person"},
                    {"_offset": 1, "label": "created", "_sinkV": "3", "_sinkVLabel": "software"}
                ],
                "_reverse_edge": []
            }))
            .unwrap();
        store
            .insert_vertex(json!({"id": "2", "label": "person", "_edge": [], "_reverse_edge": []}))
            .unwrap();
        store
    }

    #[test]
    fn test_fetch_vertex() {
        let store = store();
        let v = store.fetch_vertex("4").unwrap().unwrap();
        assert_eq!(v.forward.len(), 2);
        assert!(store.fetch_vertex("99").unwrap().is_none());
    }

    #[test]
    fn test_backward_adjacency_scans_forward_edges() {
        let store = store();
        assert!(!store.mirrors_backward_edges());
        let backward = store.fetch_backward_adjacency("2").unwrap();
        assert_eq!(backward.len(), 2);
        assert!(backward.get("1", 0).is_some());
        assert!(backward.get("4", 0).is_some());
        assert_eq!(store.backward_fetches(), 1);
    }

    #[test]
    fn test_insert_requires_id() {
        let err = MemoryStore::new().insert_vertex(json!({"label": "x"})).unwrap_err();
        assert!(matches!(err, Error::StorageError(_)));
    }

    #[test]
    fn test_numeric_id_is_stored_and_fetched() {
        let store = MemoryStore::new();
        let id = store.insert_vertex(json!({"id": 7, "_edge": [], "_reverse_edge": []})).unwrap();
        assert_eq!(id, "7");
        let v = store.fetch_vertex("7").unwrap().unwrap();
        assert_eq!(v.id, "7");
    }

    #[test]
    fn test_clones_share_documents() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.insert_vertex(json!({"id": "1", "_edge": [], "_reverse_edge": []})).unwrap();
        assert_eq!(b.vertex_count(), 1);
        assert!(b.remove_vertex("1"));
        assert_eq!(a.vertex_count(), 0);
    }
}
