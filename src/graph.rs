//! `DiGraph` is a directed graph datastructure using an adjacency list
//! representation.

use std::fmt;

use indexmap::IndexSet;

use crate::Direction;

/// The integer type for node and edge indices. `u32` keeps the graph's data
/// small; graphs are limited to `u32::MAX - 1` nodes and edges.
type Ix = u32;

/// Node identifier.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct NodeIndex(Ix);

impl NodeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(x as Ix)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

/// Short version of `NodeIndex::new`.
#[inline]
pub fn node_index(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// Edge identifier.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct EdgeIndex(Ix);

impl EdgeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        EdgeIndex(x as Ix)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// An invalid `EdgeIndex` used to denote absence of an edge, for example
    /// to end an adjacency list.
    #[inline]
    pub fn end() -> Self {
        EdgeIndex(Ix::MAX)
    }
}

impl fmt::Debug for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == EdgeIndex::end() {
            write!(f, "EdgeIndex(End)")
        } else {
            write!(f, "EdgeIndex({})", self.0)
        }
    }
}

/// Short version of `EdgeIndex::new`.
#[inline]
pub fn edge_index(index: usize) -> EdgeIndex {
    EdgeIndex::new(index)
}

/// The graph's node type.
#[derive(Debug, Clone)]
struct Node {
    /// First edge in the outgoing and incoming edge lists.
    next: [EdgeIndex; 2],
}

/// The graph's edge type.
#[derive(Debug, Clone)]
struct Edge {
    /// Next edge in the outgoing and incoming edge lists.
    next: [EdgeIndex; 2],
    /// Start and end node index.
    node: [NodeIndex; 2],
}

/// A directed graph with contiguous node indices `0..node_count()` and edge
/// indices `0..edge_count()`, using an adjacency list representation.
///
/// The graph carries no node or edge weights. Algorithms that need edge
/// capacities or flows take them as edge-indexed `&[f64]` slices, which keeps
/// one graph usable with many capacity assignments.
///
/// Adding nodes or edges keeps all indices stable; nodes and edges are never
/// removed. Derived graphs (induced subgraphs, contractions, simplified
/// graphs) are returned as new `DiGraph` values.
#[derive(Clone, Default)]
pub struct DiGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl fmt::Debug for DiGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiGraph {{ {} nodes, edges: [", self.nodes.len())?;
        for (index, e) in self.edges.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", e.node[0].index(), e.node[1].index())?;
        }
        write!(f, "] }}")
    }
}

impl DiGraph {
    /// Create a new, empty `DiGraph`.
    pub fn new() -> Self {
        DiGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Create a new `DiGraph` with estimated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        DiGraph {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Create a graph with `node_count` nodes and the given edges.
    ///
    /// Node indices referenced by the edge list that are not below
    /// `node_count` create the missing nodes, so the result always contains
    /// every endpoint.
    pub fn from_edges<I>(node_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let iter = edges.into_iter();
        let mut gr = DiGraph::with_capacity(node_count, iter.size_hint().0);
        for _ in 0..node_count {
            gr.add_node();
        }
        for (source, target) in iter {
            let nx = std::cmp::max(source, target);
            while nx >= gr.node_count() {
                gr.add_node();
            }
            gr.add_edge(node_index(source), node_index(target));
        }
        gr
    }

    /// Return the number of nodes (vertices) in the graph.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has directed edges. Always true for `DiGraph`.
    #[inline]
    pub fn is_directed(&self) -> bool {
        true
    }

    /// Add a node to the graph and return its index.
    pub fn add_node(&mut self) -> NodeIndex {
        assert!(self.nodes.len() < Ix::MAX as usize);
        let node_idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node {
            next: [EdgeIndex::end(); 2],
        });
        node_idx
    }

    /// Add an edge from `a` to `b` to the graph and return its index.
    ///
    /// **Panics** if `a` or `b` are out of bounds.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex) -> EdgeIndex {
        let edge_idx = EdgeIndex::new(self.edges.len());
        assert!(edge_idx != EdgeIndex::end());
        assert!(
            a.index() < self.nodes.len() && b.index() < self.nodes.len(),
            "DiGraph::add_edge: node indices out of bounds"
        );
        // Read both list heads before relinking; for a == b the two slots
        // belong to the same node.
        let next = [
            self.nodes[a.index()].next[0],
            self.nodes[b.index()].next[1],
        ];
        self.edges.push(Edge { node: [a, b], next });
        self.nodes[a.index()].next[0] = edge_idx;
        self.nodes[b.index()].next[1] = edge_idx;
        edge_idx
    }

    /// Return the endpoints `(source, target)` of edge `e`.
    ///
    /// **Panics** if `e` is out of bounds.
    #[inline]
    pub fn edge_endpoints(&self, e: EdgeIndex) -> (NodeIndex, NodeIndex) {
        let edge = &self.edges[e.index()];
        (edge.node[0], edge.node[1])
    }

    /// Return an iterator of all neighbors of `a`, in the given direction:
    /// successors for `Outgoing`, predecessors for `Incoming`.
    ///
    /// Neighbors are produced in the reverse order of edge insertion, one
    /// entry per incident edge; multi-edges yield repeated neighbors.
    pub fn neighbors_directed(&self, a: NodeIndex, dir: Direction) -> Neighbors<'_> {
        Neighbors {
            edges: &self.edges,
            next: self.nodes[a.index()].next[dir.index()],
            dir,
        }
    }

    /// Return an iterator of references to the edges incident to `a` in the
    /// given direction.
    pub fn edges_directed(&self, a: NodeIndex, dir: Direction) -> Edges<'_> {
        Edges {
            edges: &self.edges,
            next: self.nodes[a.index()].next[dir.index()],
            dir,
        }
    }

    /// Return an iterator over all edge references, in edge-index order.
    pub fn edge_references(&self) -> EdgeReferences<'_> {
        EdgeReferences {
            iter: self.edges.iter().enumerate(),
        }
    }

    /// Return the subgraph induced by `keep`, together with the node index
    /// mapping in both directions.
    ///
    /// Edges of the subgraph appear in the same relative order as in `self`.
    /// `keep` must not contain duplicates.
    pub fn induced_subgraph(&self, keep: &[NodeIndex]) -> InducedSubgraph {
        let mut map = vec![None; self.node_count()];
        let mut graph = DiGraph::with_capacity(keep.len(), 0);
        for (sub, &full) in keep.iter().enumerate() {
            debug_assert!(map[full.index()].is_none());
            map[full.index()] = Some(NodeIndex::new(sub));
            graph.add_node();
        }
        for edge in &self.edges {
            if let (Some(a), Some(b)) = (map[edge.node[0].index()], map[edge.node[1].index()]) {
                graph.add_edge(a, b);
            }
        }
        InducedSubgraph {
            graph,
            map,
            invmap: keep.to_vec(),
        }
    }

    /// Contract the graph's vertices according to `membership`, which maps
    /// each node index to its group in `0..group_count`. The result has one
    /// node per group and one edge per original edge, endpoints replaced by
    /// their groups (self-loops and multi-edges are kept; see
    /// [`DiGraph::simplify`]).
    pub fn contract_vertices(&self, membership: &[usize], group_count: usize) -> DiGraph {
        assert_eq!(membership.len(), self.node_count());
        debug_assert!(membership.iter().all(|&g| g < group_count));
        let mut graph = DiGraph::with_capacity(group_count, self.edge_count());
        for _ in 0..group_count {
            graph.add_node();
        }
        for edge in &self.edges {
            graph.add_edge(
                node_index(membership[edge.node[0].index()]),
                node_index(membership[edge.node[1].index()]),
            );
        }
        graph
    }

    /// Return a copy of the graph with multi-edges and/or self-loops removed.
    ///
    /// Of a group of parallel edges the one with the smallest edge index
    /// survives; surviving edges keep their relative order.
    pub fn simplify(&self, remove_multiple: bool, remove_loops: bool) -> DiGraph {
        let mut seen: IndexSet<(Ix, Ix)> = IndexSet::with_capacity(self.edge_count());
        let mut graph = DiGraph::with_capacity(self.node_count(), self.edge_count());
        for _ in 0..self.node_count() {
            graph.add_node();
        }
        for edge in &self.edges {
            let (a, b) = (edge.node[0], edge.node[1]);
            if remove_loops && a == b {
                continue;
            }
            if remove_multiple && !seen.insert((a.0, b.0)) {
                continue;
            }
            graph.add_edge(a, b);
        }
        graph
    }
}

/// An induced subgraph together with its node index mapping, as returned by
/// [`DiGraph::induced_subgraph`].
#[derive(Debug, Clone)]
pub struct InducedSubgraph {
    /// The induced subgraph.
    pub graph: DiGraph,
    /// Original node index to subgraph node index; `None` for nodes that
    /// were not kept.
    pub map: Vec<Option<NodeIndex>>,
    /// Subgraph node index to original node index.
    pub invmap: Vec<NodeIndex>,
}

/// Iterator over the neighbors of a node.
///
/// Iterator element type is `NodeIndex`.
pub struct Neighbors<'a> {
    edges: &'a [Edge],
    next: EdgeIndex,
    dir: Direction,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let k = self.dir.index();
        match self.edges.get(self.next.index()) {
            None => None,
            Some(edge) => {
                self.next = edge.next[k];
                Some(edge.node[1 - k])
            }
        }
    }
}

/// A reference to an edge of the graph: its index and endpoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgeRef {
    id: EdgeIndex,
    source: NodeIndex,
    target: NodeIndex,
}

impl EdgeRef {
    /// The edge's index.
    #[inline]
    pub fn id(&self) -> EdgeIndex {
        self.id
    }

    /// The edge's source node.
    #[inline]
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    /// The edge's target node.
    #[inline]
    pub fn target(&self) -> NodeIndex {
        self.target
    }
}

/// Iterator over the edges incident to a node in one direction.
///
/// Iterator element type is [`EdgeRef`].
pub struct Edges<'a> {
    edges: &'a [Edge],
    next: EdgeIndex,
    dir: Direction,
}

impl<'a> Iterator for Edges<'a> {
    type Item = EdgeRef;

    fn next(&mut self) -> Option<EdgeRef> {
        let k = self.dir.index();
        match self.edges.get(self.next.index()) {
            None => None,
            Some(edge) => {
                let id = self.next;
                self.next = edge.next[k];
                Some(EdgeRef {
                    id,
                    source: edge.node[0],
                    target: edge.node[1],
                })
            }
        }
    }
}

/// Iterator over all edges of the graph, in edge-index order.
///
/// Iterator element type is [`EdgeRef`].
pub struct EdgeReferences<'a> {
    iter: std::iter::Enumerate<std::slice::Iter<'a, Edge>>,
}

impl<'a> Iterator for EdgeReferences<'a> {
    type Item = EdgeRef;

    fn next(&mut self) -> Option<EdgeRef> {
        self.iter.next().map(|(index, edge)| EdgeRef {
            id: edge_index(index),
            source: edge.node[0],
            target: edge.node[1],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Incoming, Outgoing};

    #[test]
    fn adjacency_is_reverse_insertion_order() {
        let g = DiGraph::from_edges(4, [(0, 1), (0, 2), (0, 3), (2, 0)]);
        let succ: Vec<usize> = g
            .neighbors_directed(node_index(0), Outgoing)
            .map(NodeIndex::index)
            .collect();
        assert_eq!(succ, vec![3, 2, 1]);
        let pred: Vec<usize> = g
            .neighbors_directed(node_index(0), Incoming)
            .map(NodeIndex::index)
            .collect();
        assert_eq!(pred, vec![2]);
    }

    #[test]
    fn from_edges_grows_nodes() {
        let g = DiGraph::from_edges(2, [(0, 5)]);
        assert_eq!(g.node_count(), 6);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(
            g.edge_endpoints(edge_index(0)),
            (node_index(0), node_index(5))
        );
    }

    #[test]
    fn self_loop_links_both_lists() {
        let g = DiGraph::from_edges(1, [(0, 0)]);
        assert_eq!(
            g.neighbors_directed(node_index(0), Outgoing).count(),
            1
        );
        assert_eq!(
            g.neighbors_directed(node_index(0), Incoming).count(),
            1
        );
    }

    #[test]
    fn induced_subgraph_maps_both_ways() {
        // 0 -> 1 -> 2 -> 3, 1 -> 3
        let g = DiGraph::from_edges(4, [(0, 1), (1, 2), (2, 3), (1, 3)]);
        let sub = g.induced_subgraph(&[node_index(1), node_index(3)]);
        assert_eq!(sub.graph.node_count(), 2);
        assert_eq!(sub.graph.edge_count(), 1);
        assert_eq!(
            sub.graph.edge_endpoints(edge_index(0)),
            (node_index(0), node_index(1))
        );
        assert_eq!(sub.map[1], Some(node_index(0)));
        assert_eq!(sub.map[0], None);
        assert_eq!(sub.invmap, vec![node_index(1), node_index(3)]);
    }

    #[test]
    fn contract_and_simplify() {
        // Two groups {0, 1} and {2}; edges inside the first group become
        // loops, the two crossing edges become parallel.
        let g = DiGraph::from_edges(3, [(0, 1), (0, 2), (1, 2), (1, 2)]);
        let contracted = g.contract_vertices(&[0, 0, 1], 2);
        assert_eq!(contracted.node_count(), 2);
        assert_eq!(contracted.edge_count(), 4);
        let simple = contracted.simplify(true, true);
        assert_eq!(simple.edge_count(), 1);
        assert_eq!(
            simple.edge_endpoints(edge_index(0)),
            (node_index(0), node_index(1))
        );
    }
}
