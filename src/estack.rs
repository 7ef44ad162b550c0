//! A stack of node indices with an O(1) membership test.

use fixedbitset::FixedBitSet;

use crate::graph::NodeIndex;

/// A stack of node indices with an O(1) membership test.
///
/// Every element may be present at most once at any time; pushing an element
/// that is already on the stack is a caller error, checked in debug builds.
#[derive(Clone, Debug)]
pub struct ElemStack {
    stack: Vec<NodeIndex>,
    present: FixedBitSet,
}

impl ElemStack {
    /// Create an empty stack for node indices below `bound`.
    pub fn new(bound: usize) -> Self {
        ElemStack {
            stack: Vec::new(),
            present: FixedBitSet::with_capacity(bound),
        }
    }

    /// Number of elements on the stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether `elem` is on the stack.
    #[inline]
    pub fn contains(&self, elem: NodeIndex) -> bool {
        self.present.contains(elem.index())
    }

    /// Push `elem`. It must not already be on the stack.
    pub fn push(&mut self, elem: NodeIndex) {
        debug_assert!(!self.present.contains(elem.index()));
        self.present.insert(elem.index());
        self.stack.push(elem);
    }

    /// Pop and return the topmost element.
    pub fn pop(&mut self) -> Option<NodeIndex> {
        let elem = self.stack.pop()?;
        self.present.set(elem.index(), false);
        Some(elem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node_index;

    #[test]
    fn membership_tracks_stack() {
        let mut t = ElemStack::new(4);
        t.push(node_index(3));
        t.push(node_index(1));
        assert!(t.contains(node_index(3)));
        assert!(t.contains(node_index(1)));
        assert!(!t.contains(node_index(0)));

        assert_eq!(t.pop(), Some(node_index(1)));
        assert!(!t.contains(node_index(1)));
        assert_eq!(t.len(), 1);

        assert_eq!(t.pop(), Some(node_index(3)));
        assert_eq!(t.pop(), None);
        assert!(t.is_empty());
    }
}
