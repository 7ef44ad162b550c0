//! A stack of node indices with O(1) membership and batched removal.

use fixedbitset::FixedBitSet;

use crate::graph::NodeIndex;

/// A stack of node indices in which elements are pushed in batches, with an
/// O(1) membership test.
///
/// [`MarkedQueue::start_batch`] opens a new batch; every push lands in the
/// most recently opened batch, and [`MarkedQueue::pop_batch`] removes the
/// whole topmost batch in one step. The driver of the cut enumeration uses
/// this to undo one recursion level's worth of insertions at once.
///
/// Pushing an element that is already present is a caller error and is
/// checked in debug builds only.
#[derive(Clone, Debug)]
pub struct MarkedQueue {
    stack: Vec<NodeIndex>,
    present: FixedBitSet,
    /// Start offset of each open batch in `stack`.
    batches: Vec<usize>,
}

impl MarkedQueue {
    /// Create an empty queue for node indices below `bound`.
    pub fn new(bound: usize) -> Self {
        MarkedQueue {
            stack: Vec::new(),
            present: FixedBitSet::with_capacity(bound),
            batches: Vec::new(),
        }
    }

    /// Number of elements currently in the queue, over all batches.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the queue holds no elements.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether `elem` is currently in the queue.
    #[inline]
    pub fn contains(&self, elem: NodeIndex) -> bool {
        self.present.contains(elem.index())
    }

    /// Open a new batch; subsequent pushes belong to it.
    pub fn start_batch(&mut self) {
        self.batches.push(self.stack.len());
    }

    /// Push `elem` into the current batch. `elem` must not already be in the
    /// queue.
    pub fn push(&mut self, elem: NodeIndex) {
        debug_assert!(!self.present.contains(elem.index()));
        self.present.insert(elem.index());
        self.stack.push(elem);
    }

    /// Remove the whole most recent batch, clearing membership for its
    /// elements.
    pub fn pop_batch(&mut self) {
        let start = self.batches.pop().unwrap_or(0);
        for &elem in &self.stack[start..] {
            self.present.set(elem.index(), false);
        }
        self.stack.truncate(start);
    }

    /// The queue's elements in push order.
    pub fn as_slice(&self) -> &[NodeIndex] {
        &self.stack
    }
}
