use std::sync::Arc;

use textmarkup_syntax::{SafeUnicodeBuffer, SyntaxTreeNode};

/// Panics with a description of the first structural problem in `root`.
///
/// `root` may be a partial tree; it must still start at offset 0 and fit in
/// the buffer.
pub fn check<B: SafeUnicodeBuffer + ?Sized>(buffer: &B, root: &Arc<SyntaxTreeNode>) {
    let n = buffer.count();
    assert!(
        root.length() <= n,
        "root length {} exceeds buffer length {}",
        root.length(),
        n
    );
    root.visit(&mut |node, start, depth| {
        if node.is_leaf() {
            return;
        }
        let total: usize = node.children().iter().map(|c| c.length()).sum();
        assert!(
            total == node.length(),
            "children of {}@{}..{} (depth {depth}) cover {total} units, expected {}",
            node.node_type(),
            start,
            start + node.length(),
            node.length()
        );
    });

    let mut expected = 0;
    for leaf in root.leaves() {
        assert!(
            leaf.start == expected,
            "leaf {}@{:?} leaves a gap or overlap at {expected}",
            leaf.node_type(),
            leaf.range()
        );
        expected = leaf.range().end;
    }
    assert!(
        expected == root.length(),
        "leaves end at {expected}, root length is {}",
        root.length()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use textmarkup_syntax::{NodeType, StringBuffer};

    const BLOCK: NodeType = NodeType::new("block");

    #[test]
    fn well_formed_tree_passes() {
        let buffer = StringBuffer::from("abcd");
        let root = SyntaxTreeNode::with_children(
            NodeType::ROOT,
            vec![SyntaxTreeNode::leaf(BLOCK, 1), SyntaxTreeNode::leaf(BLOCK, 3)],
        );
        check(&buffer, &root);
    }

    #[test]
    #[should_panic(expected = "exceeds buffer length")]
    fn tree_longer_than_buffer_fails() {
        let buffer = StringBuffer::from("ab");
        check(&buffer, &SyntaxTreeNode::leaf(BLOCK, 3));
    }
}
