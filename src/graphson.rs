//! GraphSON rendering of query results.
//!
//! ```text
//! Value ─→ to_graphson() ─→ {"id": "1", "label": "person", "type": "vertex", "outE": {...}, ...}
//! Records ─→ render_results(Regular)  ─→ ["v[1]", "v[2]", ...]
//! Records ─→ render_results(GraphSon) ─→ ["[{...}, {...}]"]
//! ```
//!
//! Strings are quoted and JSON-escaped. Other scalars are written as their
//! lower-cased text, so `True` stored as a boolean comes out as `true`.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::execution::operators::field;
use crate::execution::{OutputFormat, Record};
use crate::model::{AdjacencyList, Edge, JsonType, PathTree, Value, Vertex};
use crate::storage::Connection;
use crate::Result;

/// Render one value as GraphSON text.
///
/// With a connection that does not mirror backward edges, a vertex's
/// `inE` is fetched through it; the vertex itself is left untouched.
pub fn to_graphson(value: &Value, conn: Option<&dyn Connection>) -> Result<String> {
    let mut out = String::new();
    write_value(&mut out, value, conn)?;
    Ok(out)
}

/// Render `column` of every record.
///
/// `Regular` yields one canonical string per record; `GraphSon` yields a
/// single JSON array holding every record's value.
pub fn render_results(
    records: &[Record],
    column: usize,
    format: OutputFormat,
    conn: Option<&dyn Connection>,
) -> Result<Vec<String>> {
    match format {
        OutputFormat::Regular => records
            .iter()
            .map(|r| -> Result<String> { Ok(field(r, column, "render")?.to_string()) })
            .collect(),
        OutputFormat::GraphSon => {
            let mut out = String::from("[");
            for (i, record) in records.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(&mut out, field(record, column, "render")?, conn)?;
            }
            out.push(']');
            Ok(vec![out])
        }
    }
}

// ============================================================================
// Values
// ============================================================================

fn write_value(out: &mut String, value: &Value, conn: Option<&dyn Connection>) -> Result<()> {
    match value {
        Value::Scalar(s) => write_scalar(out, &s.text, s.json_type)?,
        Value::Collection(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, conn)?;
            }
            out.push(']');
        }
        Value::Mapping(m) => {
            out.push('{');
            for (i, (k, v)) in m.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, k, conn)?;
                out.push_str(": ");
                write_value(out, v, conn)?;
            }
            out.push('}');
        }
        Value::Composite(c) => write_value(out, c.current(), conn)?,
        Value::Property(p) => {
            out.push('{');
            write_string(out, p.name())?;
            out.push_str(": ");
            write_scalar(out, p.text(), p.json_type())?;
            out.push('}');
        }
        Value::Edge(e) => write_edge(out, e)?,
        Value::AdjacencyList(list) => {
            out.push('[');
            for (i, edge) in list.edges().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_edge(out, edge)?;
            }
            out.push(']');
        }
        Value::Vertex(v) => write_vertex(out, v, conn)?,
        Value::PathTree(t) => write_tree(out, t, conn)?,
    }
    Ok(())
}

fn write_string(out: &mut String, s: &str) -> Result<()> {
    out.push_str(&serde_json::to_string(s)?);
    Ok(())
}

fn write_scalar(out: &mut String, text: &str, json_type: JsonType) -> Result<()> {
    match json_type {
        JsonType::String => write_string(out, text)?,
        // Nested JSON is already valid text.
        JsonType::Object | JsonType::Array => out.push_str(text),
        JsonType::Number | JsonType::Boolean | JsonType::Null => out.push_str(&text.to_lowercase()),
    }
    Ok(())
}

// ============================================================================
// Edges
// ============================================================================

fn write_edge(out: &mut String, edge: &Edge) -> Result<()> {
    out.push_str("{\"id\": ");
    out.push_str(&edge.offset.to_string());
    if let Some(label) = &edge.label {
        out.push_str(", \"label\": ");
        write_string(out, label)?;
    }
    out.push_str(", \"type\": \"edge\"");

    let endpoints = [
        ("inVLabel", &edge.in_vertex_label),
        ("outVLabel", &edge.out_vertex_label),
        ("inV", &edge.in_vertex_id),
        ("outV", &edge.out_vertex_id),
    ];
    for (name, value) in endpoints {
        if let Some(value) = value {
            out.push_str(", \"");
            out.push_str(name);
            out.push_str("\": ");
            write_string(out, value)?;
        }
    }

    write_edge_properties(out, edge)?;
    out.push('}');
    Ok(())
}

/// `, "properties": {...}`, or nothing when the edge has no user properties.
fn write_edge_properties(out: &mut String, edge: &Edge) -> Result<()> {
    let mut any = false;
    for property in edge.user_properties() {
        out.push_str(if any { ", " } else { ", \"properties\": {" });
        any = true;
        write_string(out, property.name())?;
        out.push_str(": ");
        write_scalar(out, property.text(), property.json_type())?;
    }
    if any {
        out.push('}');
    }
    Ok(())
}

// ============================================================================
// Vertices
// ============================================================================

fn write_vertex(out: &mut String, vertex: &Vertex, conn: Option<&dyn Connection>) -> Result<()> {
    out.push_str("{\"id\": ");
    write_string(out, &vertex.id)?;
    if let Some(label) = &vertex.label {
        out.push_str(", \"label\": ");
        write_string(out, label)?;
    }
    out.push_str(", \"type\": \"vertex\"");

    let backward = match conn {
        Some(conn) if !conn.mirrors_backward_edges() => {
            Arc::new(conn.fetch_backward_adjacency(&vertex.id)?)
        }
        _ => Arc::clone(&vertex.backward),
    };
    write_edge_groups(out, "inE", &backward, "outV", Edge::source_id)?;
    write_edge_groups(out, "outE", &vertex.forward, "inV", Edge::sink_id)?;

    let mut any = false;
    for property in vertex.user_properties() {
        out.push_str(if any { ", " } else { ", \"properties\": {" });
        any = true;
        write_string(out, property.name())?;
        out.push_str(": [{\"value\": ");
        write_scalar(out, property.text(), property.json_type())?;
        out.push_str("}]");
    }
    if any {
        out.push('}');
    }

    out.push('}');
    Ok(())
}

/// Edges grouped by label in order of first appearance, each group in
/// ascending offset order. Nothing is written for an empty list.
fn write_edge_groups(
    out: &mut String,
    key: &str,
    list: &AdjacencyList,
    endpoint: &str,
    counterpart: fn(&Edge) -> Option<&str>,
) -> Result<()> {
    if list.is_empty() {
        return Ok(());
    }

    let mut groups: IndexMap<&str, Vec<&Edge>> = IndexMap::new();
    for edge in list.edges() {
        groups.entry(edge.label.as_deref().unwrap_or_default()).or_default().push(edge);
    }

    out.push_str(", \"");
    out.push_str(key);
    out.push_str("\": {");
    for (gi, (label, edges)) in groups.iter().enumerate() {
        if gi > 0 {
            out.push_str(", ");
        }
        write_string(out, label)?;
        out.push_str(": [");
        for (ei, edge) in edges.iter().enumerate() {
            if ei > 0 {
                out.push_str(", ");
            }
            out.push_str("{\"id\": ");
            out.push_str(&edge.offset.to_string());
            out.push_str(", \"");
            out.push_str(endpoint);
            out.push_str("\": ");
            write_string(out, counterpart(edge).unwrap_or_default())?;
            write_edge_properties(out, edge)?;
            out.push('}');
        }
        out.push(']');
    }
    out.push('}');
    Ok(())
}

// ============================================================================
// Path trees
// ============================================================================

/// `{"<node>":{"key":<node>, "value": {...}}, ...}`; the root itself is not printed.
fn write_tree(out: &mut String, tree: &PathTree, conn: Option<&dyn Connection>) -> Result<()> {
    out.push('{');
    for (i, (node, child)) in tree.children().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_string(out, &node.projected_scalar())?;
        out.push_str(":{\"key\":");
        write_value(out, node, conn)?;
        out.push_str(", \"value\": ");
        write_tree(out, child, conn)?;
        out.push('}');
    }
    out.push('}');
    Ok(())
}
