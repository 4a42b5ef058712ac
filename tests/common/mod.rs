//! Shared fixtures for the end-to-end tests.

#![allow(dead_code)]

use std::sync::Arc;

use docgraph::execution::collect;
use docgraph::storage::Connection;
use docgraph::{ConnectionConfig, MemoryStore, Operator, Record};
use serde_json::{json, Value as Json};

/// The six-vertex "modern" graph. Backward edges are mirrored into
/// `_reverse_edge` so the documents work with either store setting.
pub fn modern_documents() -> Vec<Json> {
    vec![
        json!({
            "id": "1", "label": "person", "name": "marko", "age": 29,
            "_edge": [
                {"_offset": 0, "label": "knows", "_sinkV": "2", "_sinkVLabel": "person", "weight": 0.5},
                {"_offset": 1, "label": "knows", "_sinkV": "4", "_sinkVLabel": "person", "weight": 1.0},
                {"_offset": 2, "label": "created", "_sinkV": "3", "_sinkVLabel": "software", "weight": 0.4}
            ],
            "_reverse_edge": []
        }),
        json!({
            "id": "2", "label": "person", "name": "vadas", "age": 27,
            "_edge": [],
            "_reverse_edge": [
                {"_offset": 0, "label": "knows", "_srcV": "1", "_srcVLabel": "person", "weight": 0.5}
            ]
        }),
        json!({
            "id": "3", "label": "software", "name": "lop", "lang": "java",
            "_edge": [],
            "_reverse_edge": [
                {"_offset": 2, "label": "created", "_srcV": "1", "_srcVLabel": "person", "weight": 0.4},
                {"_offset": 1, "label": "created", "_srcV": "4", "_srcVLabel": "person", "weight": 0.4},
                {"_offset": 0, "label": "created", "_srcV": "6", "_srcVLabel": "person", "weight": 0.2}
            ]
        }),
        json!({
            "id": "4", "label": "person", "name": "josh", "age": 32,
            "_edge": [
                {"_offset": 0, "label": "created", "_sinkV": "5", "_sinkVLabel": "software", "weight": 1.0},
                {"_offset": 1, "label": "created", "_sinkV": "3", "_sinkVLabel": "software", "weight": 0.4}
            ],
            "_reverse_edge": [
                {"_offset": 1, "label": "knows", "_srcV": "1", "_srcVLabel": "person", "weight": 1.0}
            ]
        }),
        json!({
            "id": "5", "label": "software", "name": "ripple", "lang": "java",
            "_edge": [],
            "_reverse_edge": [
                {"_offset": 0, "label": "created", "_srcV": "4", "_srcVLabel": "person", "weight": 1.0}
            ]
        }),
        json!({
            "id": "6", "label": "person", "name": "peter", "age": 35,
            "_edge": [
                {"_offset": 0, "label": "created", "_sinkV": "3", "_sinkVLabel": "software", "weight": 0.2}
            ],
            "_reverse_edge": []
        }),
    ]
}

/// A store holding the modern graph with mirrored backward edges.
pub fn modern_store() -> MemoryStore {
    let store = MemoryStore::new();
    for doc in modern_documents() {
        store.insert_vertex(doc).unwrap();
    }
    store
}

/// The modern graph in a store that does not mirror backward edges:
/// every `_reverse_edge` is stored empty.
pub fn unmirrored_store() -> MemoryStore {
    let store = MemoryStore::with_config(ConnectionConfig {
        mirrors_backward_edges: false,
        ..ConnectionConfig::default()
    });
    for mut doc in modern_documents() {
        doc["_reverse_edge"] = json!([]);
        store.insert_vertex(doc).unwrap();
    }
    store
}

pub fn connection(store: &MemoryStore) -> Arc<dyn Connection> {
    Arc::new(store.clone())
}

pub fn run(op: &mut dyn Operator) -> Vec<Record> {
    collect(op).unwrap()
}

/// Column `index` of every record, rendered.
pub fn column(records: &[Record], index: usize) -> Vec<String> {
    records
        .iter()
        .map(|r| r.get(index).map(ToString::to_string).unwrap_or_default())
        .collect()
}
