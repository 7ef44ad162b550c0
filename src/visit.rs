//! Graph traversals.
//!
//! The traversal types do not borrow the graph: each `next` call takes the
//! graph as an argument, so the caller keeps full access to it between
//! steps. All traversals are direction-aware; `Incoming` walks every edge
//! against its direction.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::graph::{DiGraph, NodeIndex};
use crate::Direction;

/// Visit nodes of a graph in a depth-first-search (DFS) emitting nodes in
/// preorder, following edges in a fixed direction.
///
/// The traversal starts at a given node and only traverses nodes reachable
/// from it. `Dfs` is not recursive.
#[derive(Clone, Debug)]
pub struct Dfs {
    /// The stack of nodes to visit.
    pub stack: Vec<NodeIndex>,
    /// The map of discovered nodes.
    pub discovered: FixedBitSet,
    dir: Direction,
}

impl Dfs {
    /// Create a new `Dfs`, putting `start` in the stack of nodes to visit.
    pub fn new(graph: &DiGraph, start: NodeIndex, dir: Direction) -> Self {
        Dfs {
            stack: vec![start],
            discovered: FixedBitSet::with_capacity(graph.node_count()),
            dir,
        }
    }

    /// Keep the discovered map but restart the traversal from `start`.
    pub fn move_to(&mut self, start: NodeIndex) {
        self.stack.clear();
        self.stack.push(start);
    }

    /// Return the next node in the DFS, or `None` if the traversal is done.
    pub fn next(&mut self, graph: &DiGraph) -> Option<NodeIndex> {
        while let Some(node) = self.stack.pop() {
            if !self.discovered.put(node.index()) {
                for succ in graph.neighbors_directed(node, self.dir) {
                    if !self.discovered.contains(succ.index()) {
                        self.stack.push(succ);
                    }
                }
                return Some(node);
            }
        }
        None
    }
}

/// Visit nodes in a depth-first-search (DFS) emitting nodes in postorder.
///
/// Each node is emitted after all nodes reachable from it (in the chosen
/// direction) have been emitted.
#[derive(Clone, Debug)]
pub struct DfsPostOrder {
    /// The stack of nodes to visit.
    pub stack: Vec<NodeIndex>,
    /// The map of discovered nodes.
    pub discovered: FixedBitSet,
    /// The map of finished nodes.
    pub finished: FixedBitSet,
    dir: Direction,
}

impl DfsPostOrder {
    /// Create a new `DfsPostOrder`, putting `start` in the stack of nodes to
    /// visit.
    pub fn new(graph: &DiGraph, start: NodeIndex, dir: Direction) -> Self {
        DfsPostOrder {
            stack: vec![start],
            discovered: FixedBitSet::with_capacity(graph.node_count()),
            finished: FixedBitSet::with_capacity(graph.node_count()),
            dir,
        }
    }

    /// Keep the visited maps but restart the traversal from `start`. Nodes
    /// already emitted are not emitted again.
    pub fn move_to(&mut self, start: NodeIndex) {
        self.stack.clear();
        self.stack.push(start);
    }

    /// Return the next node in the postorder, or `None` when the traversal
    /// is done.
    pub fn next(&mut self, graph: &DiGraph) -> Option<NodeIndex> {
        while let Some(&nx) = self.stack.last() {
            if !self.discovered.put(nx.index()) {
                // First time visiting `nx`: keep it on the stack and push
                // its undiscovered neighbors.
                for succ in graph.neighbors_directed(nx, self.dir) {
                    if !self.discovered.contains(succ.index()) {
                        self.stack.push(succ);
                    }
                }
            } else {
                self.stack.pop();
                if !self.finished.put(nx.index()) {
                    // Second time: everything reachable from `nx` is done.
                    return Some(nx);
                }
            }
        }
        None
    }
}

/// A breadth-first search (BFS) over the nodes reachable from a set of
/// roots, optionally restricted to a subset of the graph's nodes.
///
/// Nodes outside the restriction are never visited and never expanded; roots
/// outside the restriction are ignored.
#[derive(Clone, Debug)]
pub struct Bfs {
    /// The queue of nodes to visit.
    pub queue: VecDeque<NodeIndex>,
    /// The map of discovered nodes.
    pub discovered: FixedBitSet,
    restricted: Option<FixedBitSet>,
    dir: Direction,
}

impl Bfs {
    /// Create a new `Bfs` from one or more roots, visited in the given
    /// order, with an optional restriction set.
    pub fn with_roots<I>(
        graph: &DiGraph,
        roots: I,
        dir: Direction,
        restricted: Option<FixedBitSet>,
    ) -> Self
    where
        I: IntoIterator<Item = NodeIndex>,
    {
        let mut discovered = FixedBitSet::with_capacity(graph.node_count());
        let mut queue = VecDeque::new();
        for root in roots {
            let allowed = restricted
                .as_ref()
                .map_or(true, |r| r.contains(root.index()));
            if allowed && !discovered.put(root.index()) {
                queue.push_back(root);
            }
        }
        Bfs {
            queue,
            discovered,
            restricted,
            dir,
        }
    }

    /// Return the next node in the BFS, or `None` if the traversal is done.
    pub fn next(&mut self, graph: &DiGraph) -> Option<NodeIndex> {
        let node = self.queue.pop_front()?;
        for succ in graph.neighbors_directed(node, self.dir) {
            let allowed = self
                .restricted
                .as_ref()
                .map_or(true, |r| r.contains(succ.index()));
            if allowed && !self.discovered.put(succ.index()) {
                self.queue.push_back(succ);
            }
        }
        Some(node)
    }

    /// Drain the traversal into a vector, in visit order.
    pub fn collect(mut self, graph: &DiGraph) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        while let Some(node) = self.next(graph) {
            order.push(node);
        }
        order
    }
}

/// A depth-first-search event emitted by [`depth_first_search`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DfsEvent {
    /// The node is visited for the first time.
    Discover(NodeIndex),
    /// All of the node's neighbors have been fully explored.
    Finish(NodeIndex),
}

/// A recursive depth-first traversal from `start`, reporting a
/// [`DfsEvent::Discover`] on entry to each reachable node and a
/// [`DfsEvent::Finish`] on exit, in proper nesting order.
///
/// The recursion is converted to an explicit stack of neighbor walkers, so
/// the traversal uses heap space proportional to the depth.
pub fn depth_first_search<F>(graph: &DiGraph, start: NodeIndex, dir: Direction, mut visitor: F)
where
    F: FnMut(DfsEvent),
{
    let mut discovered = FixedBitSet::with_capacity(graph.node_count());
    discovered.insert(start.index());
    visitor(DfsEvent::Discover(start));
    let mut stack = vec![(start, graph.neighbors_directed(start, dir))];
    loop {
        let next = match stack.last_mut() {
            None => break,
            Some((_, neighbors)) => neighbors.next(),
        };
        match next {
            Some(succ) => {
                if !discovered.put(succ.index()) {
                    visitor(DfsEvent::Discover(succ));
                    stack.push((succ, graph.neighbors_directed(succ, dir)));
                }
            }
            None => {
                if let Some((node, _)) = stack.pop() {
                    visitor(DfsEvent::Finish(node));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node_index;
    use crate::{Incoming, Outgoing};

    fn ix(i: usize) -> NodeIndex {
        node_index(i)
    }

    #[test]
    fn dfs_visits_reachable_only() {
        // 0 -> 1 -> 2, 3 isolated
        let g = DiGraph::from_edges(4, [(0, 1), (1, 2)]);
        let mut dfs = Dfs::new(&g, ix(0), Outgoing);
        let mut seen = Vec::new();
        while let Some(n) = dfs.next(&g) {
            seen.push(n.index());
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn dfs_incoming_walks_reversed() {
        let g = DiGraph::from_edges(3, [(0, 1), (1, 2)]);
        let mut dfs = Dfs::new(&g, ix(2), Incoming);
        let mut seen = Vec::new();
        while let Some(n) = dfs.next(&g) {
            seen.push(n.index());
        }
        assert_eq!(seen, vec![2, 1, 0]);
    }

    #[test]
    fn post_order_children_first() {
        let g = DiGraph::from_edges(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
        let mut dfs = DfsPostOrder::new(&g, ix(0), Outgoing);
        let mut order = Vec::new();
        while let Some(n) = dfs.next(&g) {
            order.push(n.index());
        }
        assert_eq!(order.len(), 4);
        assert_eq!(order[3], 0);
        assert_eq!(order[0], 3);
    }

    #[test]
    fn restricted_bfs_skips_outside_roots() {
        // 0 -> 1 -> 2 -> 3 with restriction {1, 2}
        let g = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3)]);
        let mut restricted = FixedBitSet::with_capacity(4);
        restricted.insert(1);
        restricted.insert(2);
        let bfs = Bfs::with_roots(&g, [ix(0), ix(1)], Outgoing, Some(restricted));
        let order: Vec<usize> = bfs.collect(&g).into_iter().map(NodeIndex::index).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn dfs_events_nest() {
        let g = DiGraph::from_edges(3, [(0, 1), (1, 2)]);
        let mut events = Vec::new();
        depth_first_search(&g, ix(0), Outgoing, |e| events.push(e));
        assert_eq!(
            events,
            vec![
                DfsEvent::Discover(ix(0)),
                DfsEvent::Discover(ix(1)),
                DfsEvent::Discover(ix(2)),
                DfsEvent::Finish(ix(2)),
                DfsEvent::Finish(ix(1)),
                DfsEvent::Finish(ix(0)),
            ]
        );
    }
}
