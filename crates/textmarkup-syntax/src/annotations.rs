//! Consumer data attached to syntax tree nodes.
//!
//! Trees are immutable and shared with the memo table, so formatting passes
//! never write into nodes. They keep their results here instead, keyed by
//! [`NodeId`]. Nothing in this table is consulted when re-parsing.

use std::collections::{HashMap, HashSet};

use crate::tree::{NodeId, SyntaxTreeNode};

/// Typed side-table from node identity to a value.
#[derive(Debug, Clone)]
pub struct AnnotationTable<V> {
    entries: HashMap<NodeId, V>,
}

impl<V> Default for AnnotationTable<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> AnnotationTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `node`, returning the previous value if any.
    pub fn insert(&mut self, node: &SyntaxTreeNode, value: V) -> Option<V> {
        self.entries.insert(node.id(), value)
    }

    pub fn get(&self, node: &SyntaxTreeNode) -> Option<&V> {
        self.entries.get(&node.id())
    }

    pub fn get_mut(&mut self, node: &SyntaxTreeNode) -> Option<&mut V> {
        self.entries.get_mut(&node.id())
    }

    pub fn get_or_insert_with(&mut self, node: &SyntaxTreeNode, f: impl FnOnce() -> V) -> &mut V {
        self.entries.entry(node.id()).or_insert_with(f)
    }

    pub fn remove(&mut self, node: &SyntaxTreeNode) -> Option<V> {
        self.entries.remove(&node.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops annotations for nodes no longer part of the tree under `root`.
    ///
    /// Call after a re-parse. Subtrees reused from the memo table keep their
    /// ids and therefore keep their annotations.
    pub fn retain_reachable(&mut self, root: &SyntaxTreeNode) {
        let mut live = HashSet::new();
        root.collect_ids(&mut live);
        self.entries.retain(|id, _| live.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;
    use std::sync::Arc;

    fn tree() -> Arc<SyntaxTreeNode> {
        SyntaxTreeNode::with_children(
            NodeType::new("document"),
            vec![
                SyntaxTreeNode::leaf(NodeType::new("word"), 3),
                SyntaxTreeNode::leaf(NodeType::new("word"), 4),
            ],
        )
    }

    #[test]
    fn insert_and_get_by_node() {
        let root = tree();
        let mut table = AnnotationTable::new();
        assert_eq!(table.insert(&root.children()[0], "bold"), None);
        assert_eq!(table.get(&root.children()[0]), Some(&"bold"));
        assert_eq!(table.get(&root.children()[1]), None);
        assert_eq!(table.insert(&root.children()[0], "italic"), Some("bold"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_or_insert_with_only_builds_once() {
        let root = tree();
        let mut table = AnnotationTable::new();
        *table.get_or_insert_with(&root, || 0) += 1;
        *table.get_or_insert_with(&root, || 100) += 1;
        assert_eq!(table.get(&root), Some(&2));
    }

    #[test]
    fn retain_reachable_drops_stale_nodes() {
        let old = tree();
        let new = SyntaxTreeNode::with_children(
            NodeType::new("document"),
            vec![
                Arc::clone(&old.children()[0]),
                SyntaxTreeNode::leaf(NodeType::new("word"), 5),
            ],
        );

        let mut table = AnnotationTable::new();
        table.insert(&old.children()[0], 'a');
        table.insert(&old.children()[1], 'b');
        table.retain_reachable(&new);

        assert_eq!(table.get(&new.children()[0]), Some(&'a'));
        assert_eq!(table.remove(&old.children()[1]), None);
        assert_eq!(table.len(), 1);
    }
}
