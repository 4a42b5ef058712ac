//! PathTree: traversal paths with shared prefixes merged into one tree.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use super::mapping::entry_hash;
use super::Value;

/// A tree node. The root is synthetic and carries no value.
#[derive(Debug, Clone, Default)]
pub struct PathTree {
    node: Option<Box<Value>>,
    children: IndexMap<Value, PathTree>,
}

impl PathTree {
    /// An empty tree with a synthetic root.
    pub fn root() -> Self {
        Self::default()
    }

    fn leaf(value: Value) -> Self {
        Self { node: Some(Box::new(value)), children: IndexMap::new() }
    }

    /// The value at this node; `None` for the root.
    pub fn node(&self) -> Option<&Value> {
        self.node.as_deref()
    }

    pub fn children(&self) -> impl Iterator<Item = (&Value, &PathTree)> {
        self.children.iter()
    }

    pub fn child(&self, value: &Value) -> Option<&PathTree> {
        self.children.get(value)
    }

    /// Merge one path into the tree, reusing every node of the longest
    /// existing prefix.
    pub fn insert_path<I: IntoIterator<Item = Value>>(&mut self, path: I) {
        let mut cursor = self;
        for step in path {
            cursor = cursor
                .children
                .entry(step.clone())
                .or_insert_with(|| PathTree::leaf(step));
        }
    }

    /// Number of nodes below this one.
    pub fn len(&self) -> usize {
        self.children.values().map(|c| 1 + c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(node) = &self.node {
            write!(f, "{node}:")?;
        }
        write!(f, "[")?;
        for (i, child) in self.children.values().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            child.fmt_node(f)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for PathTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f)
    }
}

impl PartialEq for PathTree {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
            && self.children.len() == other.children.len()
            && self.children.iter().all(|(k, c)| other.children.get(k) == Some(c))
    }
}

impl Eq for PathTree {}

impl Hash for PathTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
        let combined = self
            .children
            .iter()
            .fold(0u64, |acc, (k, c)| acc.wrapping_add(entry_hash(k, c)));
        self.children.len().hash(state);
        combined.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(steps: &[&str]) -> Vec<Value> {
        steps.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_shared_prefixes_share_nodes() {
        let mut tree = PathTree::root();
        tree.insert_path(path(&["1", "2", "3"]));
        tree.insert_path(path(&["1", "2", "4"]));
        tree.insert_path(path(&["1", "5"]));

        assert!(tree.node().is_none());
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.to_string(), "[1:[2:[3:[], 4:[]], 5:[]]]");
    }

    #[test]
    fn test_duplicate_path_is_idempotent() {
        let mut a = PathTree::root();
        a.insert_path(path(&["1", "2"]));
        let mut b = a.clone();
        b.insert_path(path(&["1", "2"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_ignores_child_order() {
        let mut a = PathTree::root();
        a.insert_path(path(&["1", "2"]));
        a.insert_path(path(&["1", "3"]));
        let mut b = PathTree::root();
        b.insert_path(path(&["1", "3"]));
        b.insert_path(path(&["1", "2"]));
        assert_eq!(a, b);
        assert_eq!(entry_hash(&a, &()), entry_hash(&b, &()));
    }
}
