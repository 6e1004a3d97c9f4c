use std::sync::Arc;

use crate::node_type::NodeType;
use crate::tree::SyntaxTreeNode;

#[derive(Debug, Clone)]
enum FragmentItem {
    Node(Arc<SyntaxTreeNode>),
    /// Consumed text no `Wrap` claimed, by length.
    Text(usize),
}

/// The ordered output of a rule, tiling exactly the span it consumed.
///
/// Unclaimed text is kept as a length until a `Wrap` decides what it
/// becomes, so matching characters does not allocate nodes.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    items: Vec<FragmentItem>,
}

impl Fragment {
    pub(crate) fn text(length: usize) -> Self {
        let mut fragment = Self::default();
        fragment.push_text(length);
        fragment
    }

    pub(crate) fn node(node: Arc<SyntaxTreeNode>) -> Self {
        Self {
            items: vec![FragmentItem::Node(node)],
        }
    }

    fn push_text(&mut self, length: usize) {
        if length == 0 {
            return;
        }
        if let Some(FragmentItem::Text(n)) = self.items.last_mut() {
            *n += length;
        } else {
            self.items.push(FragmentItem::Text(length));
        }
    }

    pub(crate) fn append(&mut self, other: Fragment) {
        for item in other.items {
            match item {
                FragmentItem::Text(n) => self.push_text(n),
                node => self.items.push(node),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Nodes the fragment holds, without anonymous text.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<SyntaxTreeNode>> {
        self.items.iter().filter_map(|item| match item {
            FragmentItem::Node(node) => Some(node),
            FragmentItem::Text(_) => None,
        })
    }

    /// The single node when the fragment is exactly one node.
    pub(crate) fn single_node(&self) -> Option<&Arc<SyntaxTreeNode>> {
        match self.items.as_slice() {
            [FragmentItem::Node(node)] => Some(node),
            _ => None,
        }
    }

    /// Builds the node a `Wrap` rule produces over this fragment.
    ///
    /// Text-only (or empty) fragments become a leaf; otherwise text runs are
    /// materialised as anonymous leaves between the child nodes.
    pub(crate) fn wrap(self, node_type: NodeType, length: usize) -> Arc<SyntaxTreeNode> {
        if self.nodes().next().is_none() {
            return SyntaxTreeNode::leaf(node_type, length);
        }
        SyntaxTreeNode::with_children(node_type, self.into_nodes())
    }

    pub(crate) fn into_nodes(self) -> Vec<Arc<SyntaxTreeNode>> {
        self.items
            .into_iter()
            .map(|item| match item {
                FragmentItem::Node(node) => node,
                FragmentItem::Text(n) => SyntaxTreeNode::leaf(NodeType::ANONYMOUS, n),
            })
            .collect()
    }
}

/// What a rule decided at one position.
///
/// Lengths are relative to the position the rule was invoked at.
/// `examined_length` is how far the rule looked to decide, counting a probe
/// of the end of the buffer as one unit; it may exceed `length`.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub succeeded: bool,
    pub length: usize,
    pub examined_length: usize,
    pub fragment: Fragment,
}

impl ParseResult {
    pub(crate) fn success(length: usize, examined_length: usize, fragment: Fragment) -> Self {
        Self {
            succeeded: true,
            length,
            examined_length,
            fragment,
        }
    }

    pub(crate) fn failure(examined_length: usize) -> Self {
        Self {
            succeeded: false,
            length: 0,
            examined_length,
            fragment: Fragment::default(),
        }
    }

    /// The span this result depends on: an edit inside
    /// `[start, start + extent)` may change it.
    pub fn extent(&self) -> usize {
        self.length.max(self.examined_length)
    }
}
