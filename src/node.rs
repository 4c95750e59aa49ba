use std::fmt;

/// Symbol stored in internal nodes. Never read back.
pub const INTERNAL_SYMBOL: u8 = b'$';

/// A Huffman tree node. Children are exclusively owned by their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub symbol: u8,
    pub frequency: u64,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
}

impl Node {
    pub fn leaf(symbol: u8, frequency: u64) -> Box<Node> {
        Box::new(Node {
            symbol,
            frequency,
            left: None,
            right: None,
        })
    }

    /// Joins two subtrees under a new internal node whose frequency is the
    /// sum of both.
    pub fn join(left: Box<Node>, right: Box<Node>) -> Box<Node> {
        Box::new(Node {
            symbol: INTERNAL_SYMBOL,
            frequency: left.frequency + right.frequency,
            left: Some(left),
            right: Some(right),
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Follows one branch: `false` goes left, `true` goes right.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        if bit {
            self.right.as_deref()
        } else {
            self.left.as_deref()
        }
    }

    /// Number of leaves under (and including) this node.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            return 1;
        }
        self.left.as_ref().map_or(0, |n| n.leaf_count())
            + self.right.as_ref().map_or(0, |n| n.leaf_count())
    }

    /// True when both trees have the same shape and the same symbols at
    /// the same leaves. Frequencies are ignored.
    #[cfg(test)]
    pub(crate) fn same_shape(&self, other: &Node) -> bool {
        fn same(a: &Option<Box<Node>>, b: &Option<Box<Node>>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_shape(b),
                _ => false,
            }
        }
        match (self.is_leaf(), other.is_leaf()) {
            (true, true) => self.symbol == other.symbol,
            (false, false) => same(&self.left, &other.left) && same(&self.right, &other.right),
            _ => false,
        }
    }
}

// One line per node: the node followed by its immediate children.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn short(n: &Option<Box<Node>>) -> String {
            match n {
                Some(n) => format!("(0x{:02x}, {})", n.symbol, n.frequency),
                None => "None".to_string(),
            }
        }
        write!(
            f,
            "(0x{:02x}, {}) --> L: {} R: {}",
            self.symbol,
            self.frequency,
            short(&self.left),
            short(&self.right)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_sums_frequencies() {
        let n = Node::join(Node::leaf(b'a', 3), Node::leaf(b'b', 4));
        assert_eq!(n.frequency, 7);
        assert_eq!(n.symbol, INTERNAL_SYMBOL);
        assert!(!n.is_leaf());
        assert_eq!(n.child(false).map(|c| c.symbol), Some(b'a'));
        assert_eq!(n.child(true).map(|c| c.symbol), Some(b'b'));
        assert_eq!(n.leaf_count(), 2);
    }

    #[test]
    fn same_shape_ignores_frequency() {
        let a = Node::join(Node::leaf(1, 10), Node::leaf(2, 20));
        let b = Node::join(Node::leaf(1, 1), Node::leaf(2, 1));
        let c = Node::join(Node::leaf(2, 1), Node::leaf(1, 1));
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }

    #[test]
    fn display_shows_children() {
        let n = Node::join(Node::leaf(0x61, 1), Node::leaf(0x62, 2));
        assert_eq!(
            n.to_string(),
            "(0x24, 3) --> L: (0x61, 1) R: (0x62, 2)"
        );
    }
}
