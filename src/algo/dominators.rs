//! Compute dominators of a flowgraph.
//!
//! In a directed graph with a root node **R**, a node **A** is said to
//! *dominate* a node **B** iff every path from **R** to **B** contains
//! **A**. The *immediate dominator* of **B** is the closest strict dominator
//! of **B**; the edges from each node's immediate dominator to the node form
//! a tree rooted at **R**, the dominator tree.
//!
//! This module implements the simple variant of the Lengauer–Tarjan
//! algorithm (Thomas Lengauer, Robert Endre Tarjan: A fast algorithm for
//! finding dominators in a flowgraph, TOPLAS 1:1, 1979), which runs in
//! **O(|E| log |V|)** time using path compression on the semidominator
//! forest.

use fixedbitset::FixedBitSet;

use crate::algo::AlgoError;
use crate::graph::{node_index, DiGraph, NodeIndex};
use crate::{Direction, Incoming, Outgoing};

/// The undefined sentinel, for vertices whose immediate dominator has not
/// been discovered (yet).
const UNDEFINED: usize = usize::MAX;

/// The dominance relation of a graph with respect to a root, as built by
/// [`dominator_tree`].
#[derive(Debug, Clone)]
pub struct Dominators {
    root: NodeIndex,
    /// `idom[v]` is `None` for vertices unreachable from the root, and the
    /// root's own slot holds the root itself.
    idom: Vec<Option<NodeIndex>>,
    mode: Direction,
}

impl Dominators {
    /// Get the root node used to construct these dominance relations.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get the immediate dominator of the given node.
    ///
    /// Returns `None` for any node that is not reachable from the root, and
    /// for the root itself.
    pub fn immediate_dominator(&self, node: NodeIndex) -> Option<NodeIndex> {
        if node == self.root {
            None
        } else {
            self.idom[node.index()]
        }
    }

    /// Whether the given node is reachable from the root.
    pub fn is_reachable(&self, node: NodeIndex) -> bool {
        self.idom[node.index()].is_some()
    }

    /// The vertices that are unreachable from the root and therefore not
    /// part of the dominator tree, in ascending index order.
    pub fn unreachable(&self) -> Vec<NodeIndex> {
        self.idom
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_none())
            .map(|(v, _)| node_index(v))
            .collect()
    }

    /// Iterate over the given node's strict dominators, starting with its
    /// immediate dominator.
    ///
    /// If the given node is not reachable from the root, `None` is returned.
    pub fn strict_dominators(&self, node: NodeIndex) -> Option<DominatorsIter<'_>> {
        if self.idom[node.index()].is_some() {
            Some(DominatorsIter {
                dominators: self,
                node: self.immediate_dominator(node),
            })
        } else {
            None
        }
    }

    /// Iterate over all of the given node's dominators, including the node
    /// itself.
    ///
    /// If the given node is not reachable from the root, `None` is returned.
    pub fn dominators(&self, node: NodeIndex) -> Option<DominatorsIter<'_>> {
        if self.idom[node.index()].is_some() {
            Some(DominatorsIter {
                dominators: self,
                node: Some(node),
            })
        } else {
            None
        }
    }

    /// The dominator tree as a graph over the same vertex set.
    ///
    /// With `Outgoing` mode the tree's edges run from immediate dominator to
    /// dominated vertex; with `Incoming` mode (the tree of a reversed
    /// flowgraph) they run the other way, matching the direction the tree
    /// was built in. Vertices unreachable from the root are kept as
    /// isolates.
    pub fn tree(&self) -> DiGraph {
        let root = self.root.index();
        let mode = self.mode;
        let edges = self.idom.iter().enumerate().filter_map(move |(v, d)| {
            let d = (*d)?;
            if v == root {
                return None;
            }
            match mode {
                Outgoing => Some((d.index(), v)),
                Incoming => Some((v, d.index())),
            }
        });
        DiGraph::from_edges(self.idom.len(), edges)
    }
}

/// Iterator over a node's dominators, from the node towards the root.
#[derive(Debug, Clone)]
pub struct DominatorsIter<'a> {
    dominators: &'a Dominators,
    node: Option<NodeIndex>,
}

impl<'a> Iterator for DominatorsIter<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let next = self.node.take();
        if let Some(next) = next {
            self.node = self.dominators.immediate_dominator(next);
        }
        next
    }
}

/// Per-vertex LIFO buckets backed by two parallel arrays.
///
/// `head[b]` holds the first element of bucket `b` plus one, zero meaning
/// the bucket is empty, and `next[e]` continues the list from element `e`
/// in the same encoding. No per-element allocations are made, and all three
/// operations are O(1).
#[derive(Debug)]
struct DBucket {
    head: Vec<usize>,
    next: Vec<usize>,
}

impl DBucket {
    fn new(size: usize) -> Self {
        DBucket {
            head: vec![0; size],
            next: vec![0; size],
        }
    }

    /// Put `elem` at the front of bucket `bucket`. `elem` must not currently
    /// be in any bucket.
    fn insert(&mut self, bucket: usize, elem: usize) {
        self.next[elem] = self.head[bucket];
        self.head[bucket] = elem + 1;
    }

    fn is_empty(&self, bucket: usize) -> bool {
        self.head[bucket] == 0
    }

    /// Remove and return the front element of the non-empty bucket `bucket`.
    fn delete(&mut self, bucket: usize) -> usize {
        let elem = self.head[bucket] - 1;
        self.head[bucket] = self.next[elem];
        elem
    }
}

// Add the edge `(v, w)` to the semidominator forest.
#[inline]
fn link(v: usize, w: usize, ancestor: &mut [usize]) {
    ancestor[w] = v + 1;
}

// Path compression for `eval`: relink every vertex on the ancestor chain of
// `v` directly below the chain's head, pulling the minimum-semidominator
// label down the path. Iterative, with an explicit stack for the chain.
fn compress(v: usize, ancestor: &mut [usize], label: &mut [usize], semi: &[usize]) {
    let mut path = Vec::new();
    let mut w = v;
    while ancestor[w] != 0 {
        path.push(w);
        w = ancestor[w] - 1;
    }

    let mut top = match path.pop() {
        Some(top) => top,
        None => return,
    };
    while let Some(pretop) = path.pop() {
        if semi[label[top]] < semi[label[pretop]] {
            label[pretop] = label[top];
        }
        ancestor[pretop] = ancestor[top];
        top = pretop;
    }
}

// If `v` is the root of a tree in the forest, return `v`. Otherwise return
// the vertex of minimum semidominator number on the path from `v`'s tree
// root (exclusive) down to `v`.
fn eval(v: usize, ancestor: &mut [usize], label: &mut [usize], semi: &[usize]) -> usize {
    if ancestor[v] == 0 {
        v
    } else {
        compress(v, ancestor, label, semi);
        label[v]
    }
}

/// Calculate the dominator tree of the flowgraph `graph` rooted at `root`.
///
/// With `Outgoing` mode edges are taken as given; with `Incoming` mode every
/// edge direction is reversed, i.e. the dominator tree of the reverse graph
/// is built. Vertices not reachable from `root` in the chosen direction are
/// reported by [`Dominators::unreachable`] and have no immediate dominator.
///
/// Returns an error if `root` is not a vertex of the graph.
pub fn dominator_tree(
    graph: &DiGraph,
    root: NodeIndex,
    mode: Direction,
) -> Result<Dominators, AlgoError> {
    let no_of_nodes = graph.node_count();

    if root.index() >= no_of_nodes {
        return Err(AlgoError::InvalidVertex);
    }

    // Step 1: DFS from the root, recording the preorder numbering and the
    // spanning tree parents. The stack carries (vertex, parent) pairs and a
    // vertex may be pushed several times; the entry that first reaches it
    // donates the tree edge, which keeps the numbering a proper DFS
    // numbering.
    let mut reached = FixedBitSet::with_capacity(no_of_nodes);
    let mut parent = vec![UNDEFINED; no_of_nodes];
    let mut order = Vec::new();
    let mut stack = vec![(root, UNDEFINED)];
    while let Some((node, par)) = stack.pop() {
        if reached.put(node.index()) {
            continue;
        }
        parent[node.index()] = par;
        order.push(node);
        for succ in graph.neighbors_directed(node, mode) {
            if !reached.contains(succ.index()) {
                stack.push((succ, node.index()));
            }
        }
    }
    let component_size = order.len();

    // `semi[v]` is v's one-based DFS number until its semidominator is
    // computed, then the semidominator's number. Zero marks unreachable
    // vertices.
    let mut semi = vec![0usize; no_of_nodes];
    for (i, &v) in order.iter().enumerate() {
        semi[v.index()] = i + 1;
    }

    // Predecessor lists in the traversal direction, with predecessors that
    // are unreachable from the root stripped out; they cannot contribute
    // semidominator candidates.
    let pred: Vec<Vec<usize>> = (0..no_of_nodes)
        .map(|v| {
            if !reached.contains(v) {
                return Vec::new();
            }
            graph
                .neighbors_directed(node_index(v), mode.opposite())
                .filter(|u| reached.contains(u.index()))
                .map(|u| u.index())
                .collect()
        })
        .collect();

    let mut idom = vec![UNDEFINED; no_of_nodes];
    let mut ancestor = vec![0usize; no_of_nodes];
    let mut label: Vec<usize> = (0..no_of_nodes).collect();
    let mut bucket = DBucket::new(no_of_nodes);

    // Steps 2 and 3, interleaved: process vertices in decreasing DFS order,
    // computing semidominators and draining the bucket of each vertex's
    // parent to define immediate dominators, sometimes provisionally.
    for i in (1..component_size).rev() {
        let w = order[i].index();
        for &v in &pred[w] {
            let u = eval(v, &mut ancestor, &mut label, &semi);
            if semi[u] < semi[w] {
                semi[w] = semi[u];
            }
        }
        bucket.insert(order[semi[w] - 1].index(), w);
        link(parent[w], w, &mut ancestor);
        while !bucket.is_empty(parent[w]) {
            let v = bucket.delete(parent[w]);
            let u = eval(v, &mut ancestor, &mut label, &semi);
            idom[v] = if semi[u] < semi[v] { u } else { parent[w] };
        }
    }

    // Step 4: in increasing DFS order, forward the provisional entries to
    // the final immediate dominators.
    for i in 1..component_size {
        let w = order[i].index();
        if idom[w] != order[semi[w] - 1].index() {
            idom[w] = idom[idom[w]];
        }
    }
    idom[root.index()] = root.index();

    let idom = idom
        .into_iter()
        .enumerate()
        .map(|(v, d)| {
            if reached.contains(v) {
                Some(node_index(d))
            } else {
                None
            }
        })
        .collect();

    Ok(Dominators { root, idom, mode })
}
