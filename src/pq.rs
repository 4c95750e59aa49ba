use crate::node::Node;

/// Bounded priority queue of nodes, ordered by ascending frequency.
///
/// Backed by a circular buffer with one spare slot to tell full from empty.
/// Insertion is an insertion sort from the tail that only shifts entries
/// with a strictly greater frequency, so nodes of equal frequency leave the
/// queue in the order they entered it.
#[derive(Debug)]
pub struct PriorityQueue {
    head: usize,
    tail: usize,
    size: usize,
    slots: Vec<Option<Box<Node>>>,
}

impl PriorityQueue {
    pub fn new(capacity: usize) -> Self {
        PriorityQueue {
            head: 0,
            tail: 0,
            size: 0,
            slots: (0..capacity + 1).map(|_| None).collect(),
        }
    }

    fn succ(&self, pos: usize) -> usize {
        (pos + 1) % self.slots.len()
    }

    fn prev(&self, pos: usize) -> usize {
        (pos + self.slots.len() - 1) % self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.succ(self.tail) == self.head
    }

    /// Inserts `node` after every queued node of lower or equal frequency.
    /// Hands the node back if the queue is full.
    pub fn enqueue(&mut self, node: Box<Node>) -> Result<(), Box<Node>> {
        if self.is_full() {
            return Err(node);
        }

        let mut slot = self.tail;
        while slot != self.head {
            let prev = self.prev(slot);
            let heavier = self.slots[prev]
                .as_ref()
                .is_some_and(|n| n.frequency > node.frequency);
            if !heavier {
                break;
            }
            self.slots[slot] = self.slots[prev].take();
            slot = prev;
        }

        self.slots[slot] = Some(node);
        self.tail = self.succ(self.tail);
        self.size += 1;
        Ok(())
    }

    /// Removes the lowest-frequency node, earliest first among ties.
    pub fn dequeue(&mut self) -> Option<Box<Node>> {
        if self.is_empty() {
            return None;
        }
        let node = self.slots[self.head].take();
        self.head = self.succ(self.head);
        self.size -= 1;
        node
    }

    /// Iterates the queued nodes in dequeue order.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        (0..self.size).filter_map(move |i| {
            let pos = (self.head + i) % self.slots.len();
            self.slots[pos].as_deref()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut PriorityQueue) -> Vec<(u8, u64)> {
        let mut out = Vec::new();
        while let Some(n) = q.dequeue() {
            out.push((n.symbol, n.frequency));
        }
        out
    }

    #[test]
    fn dequeues_in_ascending_frequency() {
        let mut q = PriorityQueue::new(8);
        for (s, f) in [(b'a', 5), (b'b', 1), (b'c', 9), (b'd', 3)] {
            q.enqueue(Node::leaf(s, f)).unwrap();
        }
        assert_eq!(q.len(), 4);
        assert_eq!(
            drain(&mut q),
            vec![(b'b', 1), (b'd', 3), (b'a', 5), (b'c', 9)]
        );
    }

    #[test]
    fn equal_frequencies_are_fifo() {
        let mut q = PriorityQueue::new(8);
        q.enqueue(Node::leaf(b'x', 2)).unwrap();
        q.enqueue(Node::leaf(b'a', 1)).unwrap();
        q.enqueue(Node::leaf(b'y', 2)).unwrap();
        q.enqueue(Node::leaf(b'b', 1)).unwrap();
        q.enqueue(Node::leaf(b'z', 2)).unwrap();
        let order: Vec<u8> = drain(&mut q).into_iter().map(|(s, _)| s).collect();
        assert_eq!(order, b"abxyz");
    }

    #[test]
    fn ordering_survives_wraparound() {
        let mut q = PriorityQueue::new(4);
        // push head and tail around the ring a few times
        for round in 0..5u64 {
            q.enqueue(Node::leaf(1, 10 + round)).unwrap();
            q.enqueue(Node::leaf(2, 10 + round)).unwrap();
            q.enqueue(Node::leaf(3, round)).unwrap();
            assert_eq!(q.dequeue().map(|n| n.symbol), Some(3));
            assert_eq!(q.dequeue().map(|n| n.symbol), Some(1));
            assert_eq!(q.dequeue().map(|n| n.symbol), Some(2));
        }
        assert!(q.is_empty());
    }

    #[test]
    fn interleaved_operations_keep_order() {
        let mut q = PriorityQueue::new(16);
        let mut seq = 0u8;
        let mut last = 0u64;
        for f in [7u64, 3, 3, 9, 1, 3, 7] {
            q.enqueue(Node::leaf(seq, f)).unwrap();
            seq += 1;
        }
        let first = q.dequeue().unwrap();
        assert_eq!(first.frequency, 1);
        q.enqueue(Node::leaf(seq, 3)).unwrap();

        let drained = drain(&mut q);
        for (_, f) in &drained {
            assert!(*f >= last);
            last = *f;
        }
        // the three earlier 3s come before the late one
        let threes: Vec<u8> = drained
            .iter()
            .filter(|(_, f)| *f == 3)
            .map(|(s, _)| *s)
            .collect();
        assert_eq!(threes, vec![1, 2, 5, 7]);
    }

    #[test]
    fn full_and_empty_boundaries() {
        let mut q = PriorityQueue::new(2);
        assert!(q.dequeue().is_none());
        q.enqueue(Node::leaf(1, 1)).unwrap();
        q.enqueue(Node::leaf(2, 2)).unwrap();
        assert!(q.is_full());

        let rejected = q.enqueue(Node::leaf(3, 0)).unwrap_err();
        assert_eq!(rejected.symbol, 3);
        assert_eq!(q.len(), 2);

        assert_eq!(q.dequeue().map(|n| n.symbol), Some(1));
        q.enqueue(Node::leaf(3, 0)).unwrap();
        assert_eq!(drain(&mut q), vec![(3, 0), (2, 2)]);
        assert!(q.dequeue().is_none());
    }

    #[test]
    fn iter_matches_dequeue_order() {
        let mut q = PriorityQueue::new(4);
        q.enqueue(Node::leaf(b'b', 2)).unwrap();
        q.enqueue(Node::leaf(b'a', 1)).unwrap();
        let seen: Vec<u8> = q.iter().map(|n| n.symbol).collect();
        assert_eq!(seen, b"ab");
    }
}
