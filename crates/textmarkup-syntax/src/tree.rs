//! # Syntax Tree
//!
//! The output of a parse. Nodes carry a [`NodeType`], a length in UTF-16 code
//! units and an ordered list of children, and nothing else: no absolute
//! positions, no text. That makes a subtree valid wherever its text ends up,
//! which is what lets memoized results survive edits that shift them.
//!
//! Absolute offsets are recovered while walking from the root; see
//! [`AnchoredNode`] and [`SyntaxTreeNode::path_to_location`].
//!
//! ## Invariants
//!
//! - An interior node's length equals the sum of its children's lengths.
//! - Children tile their parent: leaf spans cover the root span exactly once.
//! - Nodes are immutable once built and shared through `Arc`.

use std::collections::HashSet;
use std::fmt::Write;
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::SafeUnicodeBuffer;
use crate::node_type::NodeType;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a constructed node.
///
/// Unique for the lifetime of the process. A subtree reused from the memo
/// table keeps its ids, so annotations keyed by id survive re-parses of
/// unrelated regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
pub struct SyntaxTreeNode {
    id: NodeId,
    node_type: NodeType,
    length: usize,
    children: Vec<Arc<SyntaxTreeNode>>,
}

/// A node paired with the absolute offset at which it starts.
#[derive(Debug, Clone)]
pub struct AnchoredNode {
    pub node: Arc<SyntaxTreeNode>,
    pub start: usize,
}

impl AnchoredNode {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.node.length
    }

    pub fn node_type(&self) -> NodeType {
        self.node.node_type
    }
}

impl SyntaxTreeNode {
    /// A node without children covering `length` code units.
    pub fn leaf(node_type: NodeType, length: usize) -> Arc<Self> {
        Arc::new(Self {
            id: NodeId::next(),
            node_type,
            length,
            children: Vec::new(),
        })
    }

    /// An interior node; its length is the sum of `children`.
    pub fn with_children(node_type: NodeType, children: Vec<Arc<SyntaxTreeNode>>) -> Arc<Self> {
        let length = children.iter().map(|c| c.length).sum();
        Arc::new(Self {
            id: NodeId::next(),
            node_type,
            length,
            children,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn children(&self) -> &[Arc<SyntaxTreeNode>] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Nodes from this one down to the leaf containing `offset`, each with its
    /// absolute start.
    ///
    /// An offset equal to this node's length resolves along the last children,
    /// so a caret at the very end of a document is "inside" the final
    /// construct. Offsets past the end yield an empty path.
    pub fn path_to_location(self: &Arc<Self>, offset: usize) -> Vec<AnchoredNode> {
        if offset > self.length {
            return Vec::new();
        }
        let mut path = vec![AnchoredNode {
            node: Arc::clone(self),
            start: 0,
        }];
        let mut current = Arc::clone(self);
        let mut start = 0;
        while let Some((child_start, child)) = current.child_containing(start, offset) {
            path.push(AnchoredNode {
                node: Arc::clone(&child),
                start: child_start,
            });
            current = child;
            start = child_start;
        }
        path
    }

    /// The deepest node containing `offset`.
    pub fn leaf_at(self: &Arc<Self>, offset: usize) -> Option<AnchoredNode> {
        self.path_to_location(offset).pop()
    }

    fn child_containing(&self, start: usize, offset: usize) -> Option<(usize, Arc<SyntaxTreeNode>)> {
        let mut child_start = start;
        let mut last = None;
        for child in &self.children {
            let child_end = child_start + child.length;
            if offset < child_end {
                return Some((child_start, Arc::clone(child)));
            }
            last = Some((child_start, child));
            child_start = child_end;
        }
        last.filter(|(s, c)| s + c.length == offset)
            .map(|(s, c)| (s, Arc::clone(c)))
    }

    /// All leaves in document order with their absolute starts.
    pub fn leaves(self: &Arc<Self>) -> Vec<AnchoredNode> {
        let mut out = Vec::new();
        let mut stack = vec![(Arc::clone(self), 0usize)];
        while let Some((node, start)) = stack.pop() {
            if node.is_leaf() {
                out.push(AnchoredNode { node, start });
                continue;
            }
            let mut child_start = start + node.length;
            for child in node.children.iter().rev() {
                child_start -= child.length;
                stack.push((Arc::clone(child), child_start));
            }
        }
        out
    }

    /// The first node of `node_type` in pre-order, including this one.
    pub fn find_first(self: &Arc<Self>, node_type: NodeType) -> Option<AnchoredNode> {
        if self.node_type == node_type {
            return Some(AnchoredNode {
                node: Arc::clone(self),
                start: 0,
            });
        }
        let mut start = 0;
        for child in &self.children {
            if let Some(found) = child.find_first(node_type) {
                return Some(AnchoredNode {
                    node: found.node,
                    start: start + found.start,
                });
            }
            start += child.length;
        }
        None
    }

    /// Pre-order walk calling `f(node, start, depth)`.
    pub fn visit(&self, f: &mut impl FnMut(&SyntaxTreeNode, usize, usize)) {
        self.visit_from(0, 0, f);
    }

    fn visit_from(&self, start: usize, depth: usize, f: &mut impl FnMut(&SyntaxTreeNode, usize, usize)) {
        f(self, start, depth);
        let mut child_start = start;
        for child in &self.children {
            child.visit_from(child_start, depth + 1, f);
            child_start += child.length;
        }
    }

    /// A type-only signature of the tree, e.g. `(document (header text) paragraph)`.
    ///
    /// Anonymous leaves are left out. Intended for asserting parse shape
    /// without spelling out text or offsets.
    pub fn compact_structure(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    fn write_compact(&self, out: &mut String) {
        let mut named = self
            .children
            .iter()
            .filter(|c| !c.node_type.is_anonymous())
            .peekable();
        if named.peek().is_none() {
            out.push_str(self.node_type.name());
            return;
        }
        out.push('(');
        out.push_str(self.node_type.name());
        for child in named {
            out.push(' ');
            child.write_compact(out);
        }
        out.push(')');
    }

    /// One line per node with its span; leaves also show their text.
    pub fn debug_tree<B: SafeUnicodeBuffer + ?Sized>(&self, buffer: &B) -> String {
        let mut out = String::new();
        self.visit(&mut |node, start, depth| {
            let end = start + node.length;
            let _ = write!(out, "{}{}@{}..{}", "  ".repeat(depth), node.node_type, start, end);
            if node.is_leaf() {
                let _ = write!(out, " {:?}", buffer.string(start..end));
            }
            out.push('\n');
        });
        out
    }

    /// Same types, lengths and shape; node ids are ignored.
    pub fn same_structure(&self, other: &SyntaxTreeNode) -> bool {
        self.node_type == other.node_type
            && self.length == other.length
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_structure(b))
    }

    pub(crate) fn collect_ids(&self, into: &mut HashSet<NodeId>) {
        into.insert(self.id);
        for child in &self.children {
            child.collect_ids(into);
        }
    }
}
