//! # docgraph: graph execution core over a JSON document store
//!
//! Reconstructs vertices, edges and adjacency lists from raw JSON documents,
//! streams them through pull-based operators as positional records, and
//! renders results as GraphSON text.
//!
//! ## Design Principles
//!
//! 1. **One value type**: every datum in a pipeline is a [`Value`]
//! 2. **All-or-nothing materialization**: a corrupt document never yields a partial vertex
//! 3. **Explicit capability**: the [`Connection`] is passed in, never stored on entities
//! 4. **End-of-stream is a value**: [`Operator::next`] returns `Ok(None)`, not an error
//!
//! ## Quick Start
//!
//! ```rust
//! use docgraph::document::materialize_vertex;
//! use docgraph::graphson::to_graphson;
//! use serde_json::json;
//!
//! # fn example() -> docgraph::Result<()> {
//! let doc = json!({
//!     "id": "1", "label": "person", "name": "marko",
//!     "_edge": [{"_offset": 0, "label": "knows", "_sinkV": "2", "_sinkVLabel": "person", "weight": 0.5}],
//!     "_reverse_edge": [],
//! });
//! let vertex = materialize_vertex(&doc, None)?;
//! println!("{}", to_graphson(&vertex.into(), None)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | `model` | Value model: scalars, collections, mappings, vertices, edges, path trees |
//! | `document` | Materializer: stored JSON → `Vertex` (inline and spilled adjacency) |
//! | `execution` | `Record`, `Operator` protocol, concrete operators |
//! | `graphson` | Wire rendering |
//! | `storage` | `Connection` capability, configuration, in-memory store |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod document;
pub mod execution;
pub mod graphson;
pub mod storage;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    AdjacencyList, Composite, Direction, Edge, EdgeKey, JsonType, Mapping, PathTree,
    Property, PropertyKind, PropertyMap, Scalar, Value, Vertex,
};

// ============================================================================
// Re-exports: Materializer
// ============================================================================

pub use document::{materialize_vertex, SpillTable};

// ============================================================================
// Re-exports: Execution
// ============================================================================

pub use execution::{
    BoxedOperator, Operator, OperatorBase, OperatorState, OutputFormat, Record,
};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{Connection, ConnectionConfig, MemoryStore};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stored document does not have the expected shape.
    #[error("Malformed document {document_id}: {message}")]
    MalformedDocument { document_id: String, message: String },

    /// An adjacency marker is neither an inline array nor a spill reference.
    #[error("Vertex {vertex_id}: adjacency field '{field}' is neither inline nor spilled")]
    UnknownAdjacencyLayout { vertex_id: String, field: String },

    /// A referenced spill document is not in the side-table.
    #[error("Vertex {vertex_id}: spill document {document_id} is missing")]
    MissingSpillDocument { vertex_id: String, document_id: String },

    /// A spill document's metadata disagrees with the vertex being built.
    #[error("Vertex {vertex_id}: spill document {document_id} is inconsistent: {reason}")]
    SpillMismatch { vertex_id: String, document_id: String, reason: String },

    /// Two edges share one `(vertex id, offset)` key within an adjacency list.
    #[error("Duplicate edge ({vertex_id}, {offset}) in adjacency list")]
    DuplicateEdge { vertex_id: String, offset: i64 },

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for faults that signal storage corruption or a writer bug.
    ///
    /// These abort the query; they are never retried.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            Error::MalformedDocument { .. }
                | Error::UnknownAdjacencyLayout { .. }
                | Error::MissingSpillDocument { .. }
                | Error::SpillMismatch { .. }
                | Error::DuplicateEdge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
