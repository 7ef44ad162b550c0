//! Listing all (s,t) edge cuts and all minimum (s,t) edge cuts of a
//! directed graph.
//!
//! Both enumerations follow JS Provan and DR Shier: A paradigm for listing
//! (s,t)-cuts in graphs, Algorithmica 15, 351–372, 1996: a binary recursion
//! over a growing pair of vertex sets `(S, T)`, parameterised by a pivot
//! rule. The all-cuts pivot works on the dominator tree of the graph induced
//! by the complement of `S`; the minimum-cut pivot works on the strongly
//! connected components of the reverse residual graph of a maximum flow.
//!
//! The module also provides the Even–Tarjan reduction (Shimon Even, R. Endre
//! Tarjan: Network flow and testing graph connectivity, SIAM J. Comput. 4(4),
//! 507–518), which encodes vertex capacities as edge capacities, and the
//! residual graph constructions the minimum-cut enumeration builds on.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::algo::dominators::dominator_tree;
use crate::algo::maxflow::maxflow;
use crate::algo::scc::scc_membership;
use crate::algo::AlgoError;
use crate::estack::ElemStack;
use crate::graph::{node_index, DiGraph, EdgeIndex, NodeIndex};
use crate::marked_queue::MarkedQueue;
use crate::visit::{depth_first_search, Bfs, Dfs, DfsEvent};
use crate::{Incoming, Outgoing};

/// An (s,t) cut: the source-side vertex partition and the edge cut it
/// generates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StCut {
    /// The vertices on the source side of the cut, in emission order.
    pub partition: Vec<NodeIndex>,
    /// The edges from the partition to its complement, in ascending edge
    /// index order.
    pub edges: Vec<EdgeIndex>,
}

/// All minimum (s,t) cuts of a graph, with the maximum flow value they
/// saturate.
#[derive(Debug, Clone)]
pub struct StMinCuts {
    /// The value of the maximum flow, which equals the capacity of every
    /// listed cut.
    pub value: f64,
    /// The minimum cuts.
    pub cuts: Vec<StCut>,
}

/// Even–Tarjan reduction of a graph.
///
/// A digraph is created with twice as many vertices and `2|E| + |V|` edges.
/// Each original vertex `i` is split into `i' = i` and `i'' = i + |V|`, with
/// a directed edge from `i'` to `i''`; each original edge `(i, j)` becomes
/// the two edges `(i'', j')` and `(j'', i')`.
///
/// The returned capacity vector assigns `1` to the `|V|` splitting edges and
/// `|V|` to the remaining `2|E|` edges; `|V|` stands in for infinity, which
/// is large enough because no minimum cut uses an edge of capacity `|V|`
/// when cutting all splitting edges costs less. This reduction lets an
/// edge-capacity maximum flow compute vertex connectivity (observation 2 in
/// Arkady Kanevsky: Finding all minimum-size separating vertex sets in a
/// graph, Networks 23, 533–541, 1993).
///
/// Returns an overflow error if the result's edge count does not fit the
/// edge index type.
pub fn even_tarjan_reduction(graph: &DiGraph) -> Result<(DiGraph, Vec<f64>), AlgoError> {
    let no_of_nodes = graph.node_count();
    let no_of_edges = graph.edge_count();

    let new_no_of_nodes = no_of_nodes.checked_mul(2).ok_or(AlgoError::Overflow)?;
    let new_no_of_edges = no_of_edges
        .checked_mul(2)
        .and_then(|e| e.checked_add(no_of_nodes))
        .ok_or(AlgoError::Overflow)?;
    if new_no_of_nodes >= u32::MAX as usize || new_no_of_edges >= u32::MAX as usize {
        return Err(AlgoError::Overflow);
    }

    let mut graphbar = DiGraph::with_capacity(new_no_of_nodes, new_no_of_edges);
    let mut capacity = Vec::with_capacity(new_no_of_edges);
    for _ in 0..new_no_of_nodes {
        graphbar.add_node();
    }

    // One edge per original vertex: (i', i'').
    for i in 0..no_of_nodes {
        graphbar.add_edge(node_index(i), node_index(i + no_of_nodes));
        capacity.push(1.0);
    }

    // Two new edges per original edge: (from, to) becomes (from'', to'),
    // (to'', from').
    for edge in graph.edge_references() {
        let from = edge.source().index();
        let to = edge.target().index();
        graphbar.add_edge(node_index(from + no_of_nodes), node_index(to));
        graphbar.add_edge(node_index(to + no_of_nodes), node_index(from));
        capacity.push(no_of_nodes as f64);
        capacity.push(no_of_nodes as f64);
    }

    Ok((graphbar, capacity))
}

/// The residual graph of `graph` under the given flow: one edge per original
/// edge with remaining capacity, carrying the remaining capacity
/// `capacity - flow` in the returned vector.
///
/// `capacity` and `flow` must both hold one value per edge of `graph`.
pub fn residual_graph(
    graph: &DiGraph,
    capacity: &[f64],
    flow: &[f64],
) -> Result<(DiGraph, Vec<f64>), AlgoError> {
    let no_of_edges = graph.edge_count();
    if capacity.len() != no_of_edges || flow.len() != no_of_edges {
        return Err(AlgoError::LengthMismatch);
    }

    let mut edges = Vec::new();
    let mut residual_capacity = Vec::new();
    for edge in graph.edge_references() {
        let c = capacity[edge.id().index()] - flow[edge.id().index()];
        if c > 0.0 {
            edges.push((edge.source().index(), edge.target().index()));
            residual_capacity.push(c);
        }
    }

    Ok((
        DiGraph::from_edges(graph.node_count(), edges),
        residual_capacity,
    ))
}

/// The reverse residual graph of `graph` under the given flow: each original
/// edge contributes a forward copy if it carries positive flow (the flow
/// that can be undone) and a reversed copy if it has remaining capacity.
///
/// Without `capacity`, unit capacities are assumed.
pub fn reverse_residual_graph(
    graph: &DiGraph,
    capacity: Option<&[f64]>,
    flow: &[f64],
) -> Result<DiGraph, AlgoError> {
    let no_of_edges = graph.edge_count();
    if flow.len() != no_of_edges {
        return Err(AlgoError::LengthMismatch);
    }
    if let Some(cap) = capacity {
        if cap.len() != no_of_edges {
            return Err(AlgoError::LengthMismatch);
        }
    }

    let mut edges = Vec::new();
    for edge in graph.edge_references() {
        let e = edge.id().index();
        let cap = capacity.map_or(1.0, |c| c[e]);
        let (from, to) = (edge.source().index(), edge.target().index());
        if flow[e] > 0.0 {
            edges.push((from, to));
        }
        if flow[e] < cap {
            edges.push((to, from));
        }
    }

    Ok(DiGraph::from_edges(graph.node_count(), edges))
}

/// The Provan–Shier recursion. At each node of the binary search tree the
/// pivot either refuses, which makes the node a leaf emitting the current
/// `S` (if non-trivial), or yields a pivot vertex `v` with its set
/// `I(S, v)`: the left subtree forbids `v` by pushing it onto `T`, the
/// right subtree commits to `I(S, v)` by pushing it onto `S` as one batch.
fn provan_shier_list<F>(
    graph: &DiGraph,
    s: &mut MarkedQueue,
    t: &mut ElemStack,
    source: NodeIndex,
    target: NodeIndex,
    result: &mut Vec<Vec<NodeIndex>>,
    pivot: &mut F,
) -> Result<(), AlgoError>
where
    F: FnMut(
        &DiGraph,
        &MarkedQueue,
        &ElemStack,
        NodeIndex,
        NodeIndex,
    ) -> Result<Option<(NodeIndex, Vec<NodeIndex>)>, AlgoError>,
{
    let no_of_nodes = graph.node_count();
    match pivot(graph, s, t, source, target)? {
        None => {
            if !s.is_empty() && s.len() != no_of_nodes {
                result.push(s.as_slice().to_vec());
            }
        }
        Some((v, isv)) => {
            t.push(v);
            provan_shier_list(graph, s, t, source, target, result, pivot)?;
            t.pop();

            s.start_batch();
            for &x in &isv {
                if !s.contains(x) {
                    s.push(x);
                }
            }
            provan_shier_list(graph, s, t, source, target, result, pivot)?;
            s.pop_batch();
        }
    }
    Ok(())
}

/// The minimal elements of `Γ(S)` under the dominator relation: a reverse
/// DFS of the dominator tree from its root, keeping a stack of the `Γ(S)`
/// vertices currently open. Finding a `Γ(S)` vertex below another one marks
/// the upper one as non-minimal.
fn all_st_cuts_minimal(
    no_of_nodes: usize,
    domtree: &DiGraph,
    root: NodeIndex,
    gamma: &FixedBitSet,
    invmap: &[NodeIndex],
) -> Vec<NodeIndex> {
    let mut nomark = vec![false; no_of_nodes];
    let mut open: Vec<NodeIndex> = Vec::new();

    depth_first_search(domtree, root, Incoming, |event| match event {
        DfsEvent::Discover(vid) => {
            let realvid = invmap[vid.index()];
            if gamma.contains(realvid.index()) {
                if let Some(&top) = open.last() {
                    nomark[top.index()] = true;
                }
                open.push(realvid);
            }
        }
        DfsEvent::Finish(vid) => {
            let realvid = invmap[vid.index()];
            if open.last() == Some(&realvid) {
                open.pop();
            }
        }
    });

    (0..no_of_nodes)
        .filter(|&v| gamma.contains(v) && !nomark[v])
        .map(node_index)
        .collect()
}

/// The pivot rule of the all-cuts enumeration.
///
/// Builds the subgraph induced by the complement of `S` and its dominator
/// tree rooted at the target (with edges reversed), then scans the minimal
/// elements of `Γ(S)` under the dominator relation for one whose dominated
/// region can be absorbed without touching `T` or the target. The returned
/// set `I(S, v)` is everything reachable from `v` inside that region plus
/// the vertices that cannot reach the target at all.
fn all_st_cuts_pivot(
    graph: &DiGraph,
    s: &MarkedQueue,
    t: &ElemStack,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<Option<(NodeIndex, Vec<NodeIndex>)>, AlgoError> {
    let no_of_nodes = graph.node_count();

    // The graph induced by Sbar = V \ S.
    let keep: Vec<NodeIndex> = (0..no_of_nodes)
        .map(node_index)
        .filter(|&v| !s.contains(v))
        .collect();
    let sub = graph.induced_subgraph(&keep);
    let root = sub.map[target.index()].expect("the target never enters S");

    // The dominator tree of Sbar, rooted at the target, all edges reversed.
    let dom = dominator_tree(&sub.graph, root, Incoming)?;
    let domtree = dom.tree();
    let leftout: Vec<NodeIndex> = dom
        .unreachable()
        .into_iter()
        .map(|v| sub.invmap[v.index()])
        .collect();

    // Γ(S) in the original graph; for empty S it is just the source.
    let mut gamma = FixedBitSet::with_capacity(no_of_nodes);
    if s.is_empty() {
        gamma.insert(source.index());
    } else {
        for &v in s.as_slice() {
            for nei in graph.neighbors_directed(v, Outgoing) {
                if !s.contains(nei) {
                    gamma.insert(nei.index());
                }
            }
        }
    }
    // Vertices that cannot reach the target are not Γ(S) members.
    for &v in &leftout {
        gamma.set(v.index(), false);
    }

    let minimal = if domtree.edge_count() > 0 {
        all_st_cuts_minimal(no_of_nodes, &domtree, root, &gamma, &sub.invmap)
    } else {
        Vec::new()
    };

    let gamma_vec: Vec<NodeIndex> = gamma.ones().map(node_index).collect();

    for &v in &minimal {
        // Nu(v): the subtree of the dominator tree rooted at v, back in
        // original vertex ids.
        let min_sub = sub.map[v.index()].expect("minimal elements lie outside S");
        let mut nuv = FixedBitSet::with_capacity(no_of_nodes);
        let mut subtree = Dfs::new(&domtree, min_sub, Incoming);
        while let Some(u) = subtree.next(&domtree) {
            nuv.insert(sub.invmap[u.index()].index());
        }

        // I(S,v) minus the unreachables: a BFS from Γ(S) inside Nu(v).
        let isv_min =
            Bfs::with_roots(graph, gamma_vec.iter().copied(), Outgoing, Some(nuv.clone()))
                .collect(graph);

        // v is admissible only if the absorbed region avoids T and the
        // target; otherwise try the next minimal element.
        if isv_min.iter().any(|&u| t.contains(u) || u == target) {
            continue;
        }

        // Fix v and compute the real I(S,v), extending the region by the
        // vertices that cannot reach the target.
        let mut restriction = nuv;
        for &u in &leftout {
            restriction.insert(u.index());
        }
        let isv = Bfs::with_roots(graph, [v], Outgoing, Some(restriction)).collect(graph);
        return Ok(Some((v, isv)));
    }

    Ok(None)
}

/// The minimal *active* elements of Sbar: active vertices from which no
/// other active vertex can be reached backwards. Computed by iteratively
/// deleting inactive vertices of in-degree zero and then collecting the
/// active vertices whose in-degree reached zero. Returned in ascending
/// Sbar index order.
fn all_st_mincuts_minimal(sbar: &DiGraph, active: &[bool], invmap: &[NodeIndex]) -> Vec<NodeIndex> {
    let no_of_nodes = sbar.node_count();
    let is_active = |v: usize| active[invmap[v].index()];

    let mut indeg: Vec<usize> = (0..no_of_nodes)
        .map(|v| sbar.neighbors_directed(node_index(v), Incoming).count())
        .collect();

    let mut removed = vec![false; no_of_nodes];
    let mut queue: VecDeque<usize> = (0..no_of_nodes)
        .filter(|&v| indeg[v] == 0 && !is_active(v))
        .collect();
    while let Some(v) = queue.pop_front() {
        removed[v] = true;
        for nei in sbar.neighbors_directed(node_index(v), Outgoing) {
            let u = nei.index();
            indeg[u] -= 1;
            if indeg[u] == 0 && !is_active(u) && !removed[u] {
                queue.push_back(u);
            }
        }
    }

    (0..no_of_nodes)
        .filter(|&v| is_active(v) && indeg[v] == 0)
        .map(node_index)
        .collect()
}

/// The pivot rule of the minimum-cut enumeration: pick the first minimal
/// active vertex of Sbar that is neither forbidden by `T` nor the target;
/// `I(S, v)` is everything that can reach `v` without entering `S`.
fn all_st_mincuts_pivot(
    graph: &DiGraph,
    s: &MarkedQueue,
    t: &ElemStack,
    target: NodeIndex,
    active: &[bool],
) -> Result<Option<(NodeIndex, Vec<NodeIndex>)>, AlgoError> {
    let no_of_nodes = graph.node_count();

    if s.len() == no_of_nodes {
        return Ok(None);
    }

    let keep: Vec<NodeIndex> = (0..no_of_nodes)
        .map(node_index)
        .filter(|&v| !s.contains(v))
        .collect();
    let sub = graph.induced_subgraph(&keep);

    let minimal = all_st_mincuts_minimal(&sub.graph, active, &sub.invmap);

    for &min_sub in &minimal {
        let v = sub.invmap[min_sub.index()];
        if v == target || t.contains(v) {
            continue;
        }

        let mut restriction = FixedBitSet::with_capacity(no_of_nodes);
        for &u in &keep {
            restriction.insert(u.index());
        }
        let order = Bfs::with_roots(graph, [v], Incoming, Some(restriction)).collect(graph);
        let isv: Vec<NodeIndex> = order.into_iter().filter(|&u| !t.contains(u)).collect();
        return Ok(Some((v, isv)));
    }

    Ok(None)
}

/// Mark `partition` as group `mark` in `membership` and collect its edge
/// cut: the edges leaving the partition, in ascending edge index order,
/// optionally keeping only edges with positive flow.
fn partition_cut(
    graph: &DiGraph,
    partition: &[NodeIndex],
    membership: &mut [usize],
    mark: usize,
    flow: Option<&[f64]>,
) -> Vec<EdgeIndex> {
    for &v in partition {
        membership[v.index()] = mark;
    }
    graph
        .edge_references()
        .filter(|e| {
            if let Some(flow) = flow {
                if flow[e.id().index()] <= 0.0 {
                    return false;
                }
            }
            membership[e.source().index()] == mark && membership[e.target().index()] != mark
        })
        .map(|e| e.id())
        .collect()
}

/// List all edge cuts between `source` and `target`.
///
/// Every distinct cut is listed exactly once, as the source-side vertex
/// partition that generates it together with the edges from that partition
/// to its complement. The implemented algorithm is described in JS Provan
/// and DR Shier: A paradigm for listing (s,t)-cuts in graphs, Algorithmica
/// 15, 351–372, 1996.
///
/// Runs in O(n (|V| + |E|)) time, where n is the number of cuts.
pub fn all_st_cuts(
    graph: &DiGraph,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<Vec<StCut>, AlgoError> {
    let no_of_nodes = graph.node_count();

    if source.index() >= no_of_nodes || target.index() >= no_of_nodes {
        return Err(AlgoError::InvalidVertex);
    }
    if source == target {
        return Err(AlgoError::IdenticalSourceTarget);
    }

    let mut s = MarkedQueue::new(no_of_nodes);
    let mut t = ElemStack::new(no_of_nodes);
    let mut partitions = Vec::new();
    let mut pivot = |g: &DiGraph,
                     s: &MarkedQueue,
                     t: &ElemStack,
                     source: NodeIndex,
                     target: NodeIndex| all_st_cuts_pivot(g, s, t, source, target);
    provan_shier_list(
        graph,
        &mut s,
        &mut t,
        source,
        target,
        &mut partitions,
        &mut pivot,
    )?;

    let mut membership = vec![usize::MAX; no_of_nodes];
    let cuts = partitions
        .into_iter()
        .enumerate()
        .map(|(i, partition)| {
            let edges = partition_cut(graph, &partition, &mut membership, i, None);
            StCut { partition, edges }
        })
        .collect();

    Ok(cuts)
}

/// List all minimum edge cuts between `source` and `target`, with their
/// common capacity, the maximum flow value.
///
/// All capacities must be strictly positive; without `capacity` every edge
/// has unit capacity. Multiple minimum cuts usually only exist with
/// integer-valued capacities; with real-valued ones, roundoff may hide some
/// of them. The implemented algorithm is described in JS Provan and DR
/// Shier: A paradigm for listing (s,t)-cuts in graphs, Algorithmica 15,
/// 351–372, 1996.
///
/// Runs in O(n (|V| + |E|)) time plus one maximum flow computation, where n
/// is the number of cuts.
pub fn all_st_mincuts(
    graph: &DiGraph,
    source: NodeIndex,
    target: NodeIndex,
    capacity: Option<&[f64]>,
) -> Result<StMinCuts, AlgoError> {
    let no_of_nodes = graph.node_count();
    let no_of_edges = graph.edge_count();

    if source.index() >= no_of_nodes || target.index() >= no_of_nodes {
        return Err(AlgoError::InvalidVertex);
    }
    if source == target {
        return Err(AlgoError::IdenticalSourceTarget);
    }
    if let Some(cap) = capacity {
        if cap.len() != no_of_edges {
            return Err(AlgoError::LengthMismatch);
        }
        if cap.iter().any(|&c| c <= 0.0) {
            return Err(AlgoError::NonPositiveCapacity);
        }
    }

    // The maximum flow, and the reverse residual graph it induces.
    let (value, flow) = maxflow(graph, source, target, capacity)?;
    let residual = reverse_residual_graph(graph, capacity, &flow)?;

    // Shrink the reverse residual graph to its strongly connected
    // components. Minimum cuts correspond to the closed vertex sets of the
    // shrunken graph.
    let (membership, proj_nodes) = scc_membership(&residual);
    let contracted = residual
        .contract_vertices(&membership, proj_nodes)
        .simplify(true, true);

    let newsource = node_index(membership[source.index()]);
    let newtarget = node_index(membership[target.index()]);
    if newsource == newtarget {
        // Source and target fall into one strongly connected component of
        // the reverse residual graph, so no closed set separates them.
        return Ok(StMinCuts {
            value,
            cuts: Vec::new(),
        });
    }

    // A supernode is active iff an endpoint of some positive-flow edge
    // projects into it.
    let mut active = vec![false; proj_nodes];
    for edge in graph.edge_references() {
        if flow[edge.id().index()] > 0.0 {
            active[membership[edge.source().index()]] = true;
            active[membership[edge.target().index()]] = true;
        }
    }

    let mut s = MarkedQueue::new(proj_nodes);
    let mut t = ElemStack::new(proj_nodes);
    let mut closedsets = Vec::new();
    let mut pivot = |g: &DiGraph,
                     s: &MarkedQueue,
                     t: &ElemStack,
                     _source: NodeIndex,
                     target: NodeIndex| { all_st_mincuts_pivot(g, s, t, target, &active) };
    provan_shier_list(
        &contracted,
        &mut s,
        &mut t,
        newsource,
        newtarget,
        &mut closedsets,
        &mut pivot,
    )?;

    // Linked lists of the original vertices behind each supernode, stored
    // in two parallel arrays with a one-based encoding.
    let mut revmap_ptr = vec![0usize; proj_nodes];
    let mut revmap_next = vec![0usize; no_of_nodes];
    for i in 0..no_of_nodes {
        let id = membership[i];
        revmap_next[i] = revmap_ptr[id];
        revmap_ptr[id] = i + 1;
    }

    // Lift every closed set to a vertex partition of the original graph and
    // derive its cut: the positive-flow edges leaving the partition.
    let mut part_membership = vec![usize::MAX; no_of_nodes];
    let mut cuts = Vec::with_capacity(closedsets.len());
    for (i, supercut) in closedsets.into_iter().enumerate() {
        let mut partition = Vec::new();
        for vtx in supercut {
            let mut ovtx = revmap_ptr[vtx.index()];
            while ovtx != 0 {
                ovtx -= 1;
                partition.push(node_index(ovtx));
                ovtx = revmap_next[ovtx];
            }
        }
        let edges = partition_cut(graph, &partition, &mut part_membership, i, Some(&flow));
        cuts.push(StCut { partition, edges });
    }

    Ok(StMinCuts { value, cuts })
}
