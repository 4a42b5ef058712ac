//! AdjacencyList: the edges incident to one vertex in one direction.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::Edge;
use crate::{Error, Result};

/// Identity of an edge within one adjacency list.
///
/// For a forward list `vertex_id` is the owning vertex; for a backward list
/// it is the source vertex of each edge. Ordered by offset first so that
/// iteration is ascending by sequence offset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    pub offset: i64,
    pub vertex_id: String,
}

impl EdgeKey {
    pub fn new(vertex_id: impl Into<String>, offset: i64) -> Self {
        Self { offset, vertex_id: vertex_id.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdjacencyList {
    edges: BTreeMap<EdgeKey, Arc<Edge>>,
}

impl AdjacencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge under `(vertex_id, offset)`.
    ///
    /// A key that is already present means the stored adjacency is corrupt;
    /// the insert is rejected with [`Error::DuplicateEdge`].
    pub fn insert(&mut self, vertex_id: &str, offset: i64, edge: Edge) -> Result<()> {
        let key = EdgeKey::new(vertex_id, offset);
        if self.edges.contains_key(&key) {
            tracing::warn!(vertex_id, offset, "duplicate edge in adjacency list");
            return Err(Error::DuplicateEdge { vertex_id: vertex_id.to_owned(), offset });
        }
        self.edges.insert(key, Arc::new(edge));
        Ok(())
    }

    pub fn get(&self, vertex_id: &str, offset: i64) -> Option<&Arc<Edge>> {
        self.edges.get(&EdgeKey::new(vertex_id, offset))
    }

    pub fn remove(&mut self, vertex_id: &str, offset: i64) -> Option<Arc<Edge>> {
        self.edges.remove(&EdgeKey::new(vertex_id, offset))
    }

    /// Edges in ascending offset order.
    pub fn edges(&self) -> impl Iterator<Item = &Arc<Edge>> {
        self.edges.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &Arc<Edge>)> {
        self.edges.iter()
    }

    /// Edges carrying `label`, in ascending offset order.
    pub fn with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Arc<Edge>> + 'a {
        self.edges().filter(move |e| e.label.as_deref() == Some(label))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl PartialEq for AdjacencyList {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.edges.iter().all(|(k, e)| other.edges.get(k) == Some(e))
    }
}

impl Eq for AdjacencyList {}

impl Hash for AdjacencyList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // BTreeMap iteration order is a function of the keys alone.
        self.len().hash(state);
        for (k, e) in &self.edges {
            k.hash(state);
            e.hash(state);
        }
    }
}

impl fmt::Display for AdjacencyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.edges().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{e}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn edge(offset: i64) -> Edge {
        Edge::new(offset).with_label("knows").with_out_vertex("1", None).with_in_vertex("2", None)
    }

    #[test]
    fn test_iteration_is_offset_ascending() {
        let mut list = AdjacencyList::new();
        for offset in [5, 1, 3] {
            list.insert("1", offset, edge(offset)).unwrap();
        }
        let offsets: Vec<i64> = list.edges().map(|e| e.offset).collect();
        assert_eq!(offsets, vec![1, 3, 5]);
        assert_eq!(list.to_string(), "[e[1]1()-knows->2(), e[3]1()-knows->2(), e[5]1()-knows->2()]");
    }

    #[test]
    fn test_duplicate_key_is_integrity_fault() {
        let mut list = AdjacencyList::new();
        list.insert("1", 0, edge(0)).unwrap();
        let err = list.insert("1", 0, edge(0)).unwrap_err();
        assert!(err.is_integrity_fault());
        assert!(matches!(err, Error::DuplicateEdge { offset: 0, .. }));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_same_offset_different_source_is_allowed() {
        // Backward lists key by source vertex: two sources may reuse an offset.
        let mut list = AdjacencyList::new();
        list.insert("a", 0, edge(0)).unwrap();
        list.insert("b", 0, edge(0)).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_get_and_remove() {
        let mut list = AdjacencyList::new();
        list.insert("1", 7, edge(7)).unwrap();
        assert_eq!(list.get("1", 7).map(|e| e.offset), Some(7));
        assert!(list.get("1", 8).is_none());
        assert!(list.remove("1", 7).is_some());
        assert!(list.is_empty());
    }

    proptest! {
        #[test]
        fn distinct_offsets_always_insert(offsets in proptest::collection::hash_set(any::<i64>(), 0..64)) {
            let mut list = AdjacencyList::new();
            for &offset in &offsets {
                prop_assert!(list.insert("v", offset, edge(offset)).is_ok());
            }
            prop_assert_eq!(list.len(), offsets.len());
            let seen: Vec<i64> = list.edges().map(|e| e.offset).collect();
            let mut sorted = seen.clone();
            sorted.sort_unstable();
            prop_assert_eq!(seen, sorted);
        }

        #[test]
        fn repeated_offset_always_fails(offset in any::<i64>()) {
            let mut list = AdjacencyList::new();
            list.insert("v", offset, edge(offset)).unwrap();
            prop_assert!(list.insert("v", offset, edge(offset)).is_err());
        }
    }
}
