//! Huffman tree construction, code derivation and the postorder tree dump.
//!
//! The dump is a small stack-machine program: a leaf is written as `'L'`
//! followed by its symbol, an internal node as a single `'I'` after both of
//! its subtrees. A tree with `u` leaves dumps to exactly `3u - 1` bytes.

use std::fmt;

use tracing::trace;

use crate::code::Code;
use crate::error::{HuffError, Result};
use crate::node::Node;
use crate::pq::PriorityQueue;
use crate::stack::NodeStack;
use crate::ALPHABET;

pub const LEAF_MARKER: u8 = b'L';
pub const INTERNAL_MARKER: u8 = b'I';

/// Longest valid dump: every byte value present once.
pub const MAX_DUMP_SIZE: usize = 3 * ALPHABET - 1;

/// Occurrence count for every byte value.
pub type Histogram = [u64; ALPHABET];

/// Code for every byte value. Symbols absent from the tree have an empty code.
pub type CodeTable = [Code; ALPHABET];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: Box<Node>,
}

impl HuffmanTree {
    /// Builds the tree for every symbol with a nonzero count.
    ///
    /// Leaves are queued in symbol order; the two lowest-frequency nodes are
    /// repeatedly joined (first dequeued on the left) until one node is left.
    /// Returns `None` for an all-zero histogram. A histogram with a single
    /// symbol yields a bare leaf, which cannot encode anything; callers
    /// seed at least two symbols first.
    pub fn from_histogram(hist: &Histogram) -> Option<Self> {
        let mut pq = PriorityQueue::new(ALPHABET);
        for (symbol, &count) in hist.iter().enumerate() {
            if count > 0 {
                let queued = pq.enqueue(Node::leaf(symbol as u8, count));
                assert!(queued.is_ok(), "alphabet-sized queue overflowed");
            }
        }

        while pq.len() > 1 {
            let (Some(left), Some(right)) = (pq.dequeue(), pq.dequeue()) else {
                unreachable!("queue holds at least two nodes");
            };
            let queued = pq.enqueue(Node::join(left, right));
            assert!(queued.is_ok(), "queue overflowed after removing two nodes");
        }

        pq.dequeue().map(|root| HuffmanTree { root })
    }

    pub fn unique_symbols(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the dump this tree produces.
    pub fn dump_size(&self) -> usize {
        3 * self.unique_symbols() - 1
    }

    /// Walks the tree depth-first, pushing `0` before going left and `1`
    /// before going right, and records the path at every leaf.
    pub fn code_table(&self) -> CodeTable {
        let mut table = [Code::new(); ALPHABET];
        let mut code = Code::new();
        build_codes(&self.root, &mut code, &mut table);
        table
    }

    /// Serializes the tree in postorder.
    pub fn dump(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.dump_size());
        dump_node(&self.root, &mut out);
        out
    }

    /// Rebuilds a tree from its dump. Any dump that does not reduce to
    /// exactly one node is rejected, as is one longer than a full alphabet
    /// or naming a symbol twice; together these keep the depth below 256.
    pub fn rebuild(dump: &[u8]) -> Result<Self> {
        if dump.len() > MAX_DUMP_SIZE {
            return Err(HuffError::MalformedTree(format!(
                "dump is {} bytes, longest valid is {MAX_DUMP_SIZE}",
                dump.len()
            )));
        }

        let mut stack = NodeStack::new(dump.len());
        let mut seen = [false; ALPHABET];
        let mut i = 0;

        while i < dump.len() {
            match dump[i] {
                LEAF_MARKER => {
                    let symbol = *dump.get(i + 1).ok_or_else(|| {
                        HuffError::MalformedTree(format!("leaf marker at offset {i} has no symbol"))
                    })?;
                    if std::mem::replace(&mut seen[symbol as usize], true) {
                        return Err(HuffError::MalformedTree(format!(
                            "symbol 0x{symbol:02x} appears twice (offset {i})"
                        )));
                    }
                    // frequency is not stored in the dump
                    stack.push(Node::leaf(symbol, 1)).map_err(|_| {
                        HuffError::MalformedTree(format!("node stack overflow at offset {i}"))
                    })?;
                    i += 2;
                }
                INTERNAL_MARKER => {
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return Err(HuffError::MalformedTree(format!(
                            "internal node at offset {i} has fewer than two children"
                        )));
                    };
                    stack.push(Node::join(left, right)).map_err(|_| {
                        HuffError::MalformedTree(format!("node stack overflow at offset {i}"))
                    })?;
                    i += 1;
                }
                other => {
                    return Err(HuffError::MalformedTree(format!(
                        "unknown marker 0x{other:02x} at offset {i}"
                    )));
                }
            }
        }

        match (stack.pop(), stack.len()) {
            (Some(root), 0) => Ok(HuffmanTree { root }),
            (None, _) => Err(HuffError::MalformedTree("empty tree dump".to_string())),
            (Some(_), rest) => Err(HuffError::MalformedTree(format!(
                "{} nodes left unjoined",
                rest + 1
            ))),
        }
    }

    /// Follows `code` from the root. Returns the node it ends on, or `None`
    /// if it runs off the tree.
    #[cfg(test)]
    pub(crate) fn walk(&self, code: &Code) -> Option<&Node> {
        code.iter().try_fold(&*self.root, |node, bit| node.child(bit))
    }
}

// Every node in preorder, one per line, indented by depth.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
            writeln!(f, "{}{}", "  ".repeat(depth), node)?;
            for child in [&node.left, &node.right].into_iter().flatten() {
                write_node(f, child, depth + 1)?;
            }
            Ok(())
        }
        write_node(f, &self.root, 0)
    }
}

fn build_codes(node: &Node, code: &mut Code, table: &mut CodeTable) {
    if node.is_leaf() {
        trace!(symbol = node.symbol, code = %code, "assigned code");
        table[node.symbol as usize] = *code;
        return;
    }

    for (bit, child) in [(false, &node.left), (true, &node.right)] {
        if let Some(child) = child {
            assert!(code.push_bit(bit), "code deeper than the alphabet");
            build_codes(child, code, table);
            assert!(code.pop_bit().is_some(), "popped an empty code");
        }
    }
}

fn dump_node(node: &Node, out: &mut Vec<u8>) {
    if node.is_leaf() {
        out.push(LEAF_MARKER);
        out.push(node.symbol);
        return;
    }
    if let Some(left) = &node.left {
        dump_node(left, out);
    }
    if let Some(right) = &node.right {
        dump_node(right, out);
    }
    out.push(INTERNAL_MARKER);
}
