//! Node type tags for syntax tree nodes.
//!
//! Grammars define their own node types as constants; the engine only
//! reserves two of them ([`NodeType::ANONYMOUS`] and [`NodeType::ROOT`]).

use std::fmt;

/// The type tag carried by every [`SyntaxTreeNode`](crate::SyntaxTreeNode).
///
/// A thin wrapper around a static name. Two node types are equal when their
/// names are equal.
///
/// ```
/// use textmarkup_syntax::NodeType;
///
/// const HEADER: NodeType = NodeType::new("header");
/// assert_eq!(HEADER.name(), "header");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeType(&'static str);

impl NodeType {
    /// Consumed text that no `Wrap` rule claimed.
    pub const ANONYMOUS: NodeType = NodeType("anonymous");

    /// Synthesized root when the start rule does not produce exactly one node
    /// covering everything it consumed.
    pub const ROOT: NodeType = NodeType("root");

    pub const fn new(name: &'static str) -> Self {
        NodeType(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }

    pub fn is_anonymous(self) -> bool {
        self == NodeType::ANONYMOUS
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
