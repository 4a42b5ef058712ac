//! # Store capability
//!
//! The execution core never talks to the document store directly. Anything
//! that needs the store (on-demand backward adjacency, vertex lookup by id)
//! is handed a [`Connection`] explicitly.
//!
//! ## Implementations
//!
//! | Connection | Module | Description |
//! |------------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory documents for testing/embedding |

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::execution::OutputFormat;
use crate::model::{AdjacencyList, Vertex};
use crate::{Error, Result};

pub use memory::MemoryStore;

// ============================================================================
// Connection Configuration
// ============================================================================

/// Settings of one store connection.
///
/// ```json
/// {"mirrors_backward_edges": false, "output_format": "graphson"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Whether every edge is also written into its sink's `_reverse_edge`.
    /// When false, backward adjacency has to be fetched on demand.
    pub mirrors_backward_edges: bool,
    pub output_format: OutputFormat,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { mirrors_backward_edges: true, output_format: OutputFormat::Regular }
    }
}

impl ConnectionConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::ConfigError(e.to_string()))
    }
}

// ============================================================================
// Connection Trait
// ============================================================================

/// What the execution core may ask of the store.
///
/// Calls are synchronous. Failures come back unchanged as
/// [`Error::StorageError`] or an integrity fault; nothing is retried.
pub trait Connection: Send + Sync {
    /// True when the stored `_reverse_edge` markers are complete.
    fn mirrors_backward_edges(&self) -> bool;

    /// Backward adjacency of `vertex_id`, computed by the store.
    fn fetch_backward_adjacency(&self, vertex_id: &str) -> Result<AdjacencyList>;

    /// Materialize one vertex by id. `Ok(None)` if no such vertex is stored.
    fn fetch_vertex(&self, vertex_id: &str) -> Result<Option<Vertex>>;
}
