//! End-to-end tests for GraphSON rendering.
//!
//! Exact wire text for vertices and edges of the modern graph, backward
//! adjacency fetched through a non-mirroring store, and whole result sets
//! rendered in both output formats.

mod common;

use std::sync::Arc;

use common::*;
use docgraph::execution::operators::{FoldOp, TraversalOp, TreeOp, ValuesOp, VertexScanOp};
use docgraph::graphson::{render_results, to_graphson};
use docgraph::storage::Connection;
use docgraph::{ConnectionConfig, Direction, MemoryStore, OutputFormat, Value, Vertex};
use pretty_assertions::assert_eq;

// ============================================================================
// Helpers
// ============================================================================

fn vertex(store: &MemoryStore, id: &str) -> Vertex {
    store.fetch_vertex(id).unwrap().unwrap()
}

fn render(value: impl Into<Value>, conn: Option<&dyn Connection>) -> String {
    to_graphson(&value.into(), conn).unwrap()
}

const MARKO: &str = concat!(
    r#"{"id": "1", "label": "person", "type": "vertex", "#,
    r#""outE": {"knows": [{"id": 0, "inV": "2", "properties": {"weight": 0.5}}, "#,
    r#"{"id": 1, "inV": "4", "properties": {"weight": 1.0}}], "#,
    r#""created": [{"id": 2, "inV": "3", "properties": {"weight": 0.4}}]}, "#,
    r#""properties": {"name": [{"value": "marko"}], "age": [{"value": 29}]}}"#,
);

const LOP: &str = concat!(
    r#"{"id": "3", "label": "software", "type": "vertex", "#,
    r#""inE": {"created": [{"id": 0, "outV": "6", "properties": {"weight": 0.2}}, "#,
    r#"{"id": 1, "outV": "4", "properties": {"weight": 0.4}}, "#,
    r#"{"id": 2, "outV": "1", "properties": {"weight": 0.4}}]}, "#,
    r#""properties": {"name": [{"value": "lop"}], "lang": [{"value": "java"}]}}"#,
);

// ============================================================================
// 1. Vertices
// ============================================================================

#[test]
fn test_marko_wire_format() {
    let store = modern_store();
    assert_eq!(render(vertex(&store, "1"), None), MARKO);
}

#[test]
fn test_incoming_edges_wire_format() {
    let store = modern_store();
    assert_eq!(render(vertex(&store, "3"), None), LOP);
}

#[test]
fn test_both_directions_grouped_by_label() {
    let store = modern_store();
    let josh = render(vertex(&store, "4"), None);
    assert!(josh.starts_with(
        r#"{"id": "4", "label": "person", "type": "vertex", "inE": {"knows": [{"id": 1, "outV": "1""#
    ));
    assert!(josh.contains(r#""outE": {"created": [{"id": 0, "inV": "5""#));
}

#[test]
fn test_output_is_valid_json() {
    let store = modern_store();
    for id in ["1", "2", "3", "4", "5", "6"] {
        let text = render(vertex(&store, id), None);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["id"], id);
        assert_eq!(parsed["type"], "vertex");
    }
}

#[test]
fn test_unmirrored_fetches_incoming_edges() {
    let store = unmirrored_store();
    let conn = connection(&store);
    let lop = Arc::new(vertex(&store, "3"));
    assert!(lop.backward.is_empty());

    let text = render(Arc::clone(&lop), Some(conn.as_ref()));
    assert_eq!(text, LOP);
    assert_eq!(store.backward_fetches(), 1);
    // the vertex itself is not modified
    assert!(lop.backward.is_empty());

    // without the connection nothing is fetched
    let bare = render(lop, None);
    assert!(!bare.contains("inE"));
    assert_eq!(store.backward_fetches(), 1);
}

#[test]
fn test_mirrored_store_does_not_fetch() {
    let store = modern_store();
    let conn = connection(&store);
    assert_eq!(render(vertex(&store, "3"), Some(conn.as_ref())), LOP);
    assert_eq!(store.backward_fetches(), 0);
}

#[test]
fn test_reserved_edge_fields_are_hidden() {
    let store = MemoryStore::new();
    store
        .insert_vertex(serde_json::json!({
            "id": "a", "label": "node",
            "_edge": [{"_offset": 0, "label": "to", "_sinkV": "b", "_sinkVLabel": "node", "_edgeId": "e-1", "note": "x"}],
            "_reverse_edge": [],
            "_rid": "abc", "_ts": 1
        }))
        .unwrap();
    let text = render(vertex(&store, "a"), None);
    assert_eq!(
        text,
        r#"{"id": "a", "label": "node", "type": "vertex", "outE": {"to": [{"id": 0, "inV": "b", "properties": {"note": "x"}}]}}"#
    );
}

// ============================================================================
// 2. Edges and values
// ============================================================================

#[test]
fn test_standalone_edge() {
    let store = modern_store();
    let marko = vertex(&store, "1");
    let knows = Arc::clone(marko.forward.get("1", 0).unwrap());
    assert_eq!(
        render(knows, None),
        concat!(
            r#"{"id": 0, "label": "knows", "type": "edge", "inVLabel": "person", "outVLabel": "person", "#,
            r#""inV": "2", "outV": "1", "properties": {"weight": 0.5}}"#
        )
    );
}

#[test]
fn test_property_values() {
    let store = modern_store();
    let marko = vertex(&store, "1");
    let age = marko.property("age").cloned().unwrap();
    assert_eq!(render(age, None), r#"{"age": 29}"#);
}

// ============================================================================
// 3. Result sets
// ============================================================================

#[test]
fn test_render_regular() {
    let store = modern_store();
    let mut op = ValuesOp::new(Box::new(VertexScanOp::from_store(&store)), 0, "name");
    let records = run(&mut op);

    let vertices = render_results(&records, 0, OutputFormat::Regular, None).unwrap();
    assert_eq!(vertices, vec!["v[1]", "v[2]", "v[3]", "v[4]", "v[5]", "v[6]"]);

    let names = render_results(&records, 3, OutputFormat::Regular, None).unwrap();
    assert_eq!(names[0], "vp[name->marko]");
}

#[test]
fn test_render_graphson_array() {
    let store = modern_store();
    let conn = connection(&store);
    let mut op = TraversalOp::new(Box::new(VertexScanOp::from_store(&store)), 0, Direction::Outgoing)
        .with_label("knows");
    let records = run(&mut op);

    let out = render_results(&records, 4, OutputFormat::GraphSon, Some(conn.as_ref())).unwrap();
    assert_eq!(out, vec![r#"["2", "4"]"#]);

    let empty = render_results(&[], 0, OutputFormat::GraphSon, None).unwrap();
    assert_eq!(empty, vec!["[]"]);
}

#[test]
fn test_render_fold_and_tree() {
    let store = modern_store();
    let out = TraversalOp::new(Box::new(VertexScanOp::from_store(&store)), 0, Direction::Outgoing)
        .with_label("knows");
    let mut fold = FoldOp::new(Box::new(out), 4);
    let folded = render_results(&run(&mut fold), 0, OutputFormat::GraphSon, None).unwrap();
    assert_eq!(folded, vec![r#"[["2", "4"]]"#]);

    let out = TraversalOp::new(Box::new(VertexScanOp::from_store(&store)), 0, Direction::Outgoing)
        .with_label("knows");
    let mut tree = TreeOp::new(Box::new(out), vec![4]);
    let rendered = render_results(&run(&mut tree), 0, OutputFormat::GraphSon, None).unwrap();
    assert_eq!(
        rendered,
        vec![r#"[{"2":{"key":"2", "value": {}}, "4":{"key":"4", "value": {}}}]"#]
    );
}

#[test]
fn test_output_format_from_config() {
    let config = ConnectionConfig::from_json(r#"{"output_format": "graphson"}"#).unwrap();
    assert_eq!(config.output_format, OutputFormat::GraphSon);
    assert!(config.mirrors_backward_edges);

    let store = MemoryStore::with_config(config);
    for doc in modern_documents() {
        store.insert_vertex(doc).unwrap();
    }
    let mut scan = VertexScanOp::from_store(&store);
    let records = run(&mut scan);
    let rendered =
        render_results(&records[..1], 0, store.config().output_format, None).unwrap();
    assert_eq!(rendered, vec![format!("[{MARKO}]")]);
}
