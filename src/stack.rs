use crate::node::Node;

/// Bounded LIFO of nodes used while rebuilding a tree from its dump.
#[derive(Debug)]
pub struct NodeStack {
    capacity: usize,
    nodes: Vec<Box<Node>>,
}

impl NodeStack {
    pub fn new(capacity: usize) -> Self {
        NodeStack {
            capacity,
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.nodes.len() == self.capacity
    }

    /// Pushes a node, handing it back if the stack is full.
    pub fn push(&mut self, node: Box<Node>) -> Result<(), Box<Node>> {
        if self.is_full() {
            return Err(node);
        }
        self.nodes.push(node);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Box<Node>> {
        self.nodes.pop()
    }
}
