//! Strongly connected components.

use crate::graph::{node_index, DiGraph, NodeIndex};
use crate::visit::{Dfs, DfsPostOrder};
use crate::{Incoming, Outgoing};

/// Compute the *strongly connected components* using [Kosaraju's
/// algorithm][1].
///
/// Returns a vector where each element is a strongly connected component.
/// The order of components and of the node ids within each component is
/// deterministic for a given graph.
///
/// [1]: https://en.wikipedia.org/wiki/Kosaraju%27s_algorithm
pub fn kosaraju_scc(graph: &DiGraph) -> Vec<Vec<NodeIndex>> {
    let no_of_nodes = graph.node_count();
    if no_of_nodes == 0 {
        return Vec::new();
    }

    // First phase: postorder finish times over the whole graph.
    let mut finish_order = Vec::with_capacity(no_of_nodes);
    let mut dfs = DfsPostOrder::new(graph, node_index(0), Outgoing);
    for i in 0..no_of_nodes {
        dfs.move_to(node_index(i));
        while let Some(nx) = dfs.next(graph) {
            finish_order.push(nx);
        }
    }

    // Second phase: DFS against the edges, in decreasing finish time. Each
    // tree of this forest is one strongly connected component.
    let mut dfs = Dfs::new(graph, node_index(0), Incoming);
    dfs.stack.clear();
    let mut sccs = Vec::new();
    for &nx in finish_order.iter().rev() {
        if dfs.discovered.contains(nx.index()) {
            continue;
        }
        dfs.move_to(nx);
        let mut scc = Vec::new();
        while let Some(nz) = dfs.next(graph) {
            scc.push(nz);
        }
        sccs.push(scc);
    }
    sccs
}

/// Compute the strongly connected components as a membership vector: the
/// component index of every node, together with the number of components.
///
/// What [`DiGraph::contract_vertices`] consumes to collapse every component
/// into a single vertex.
pub fn scc_membership(graph: &DiGraph) -> (Vec<usize>, usize) {
    let sccs = kosaraju_scc(graph);
    let mut membership = vec![0; graph.node_count()];
    for (i, scc) in sccs.iter().enumerate() {
        for &v in scc {
            membership[v.index()] = i;
        }
    }
    (membership, sccs.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ix(i: usize) -> NodeIndex {
        node_index(i)
    }

    #[test]
    fn cycle_is_one_component() {
        let g = DiGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
        let sccs = kosaraju_scc(&g);
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), 3);
    }

    #[test]
    fn dag_has_singleton_components() {
        let g = DiGraph::from_edges(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
        let (membership, count) = scc_membership(&g);
        assert_eq!(count, 4);
        let mut seen = membership.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn two_cycles_with_a_bridge() {
        // 0 <-> 1, 2 <-> 3, bridge 1 -> 2
        let g = DiGraph::from_edges(4, [(0, 1), (1, 0), (2, 3), (3, 2), (1, 2)]);
        let (membership, count) = scc_membership(&g);
        assert_eq!(count, 2);
        assert_eq!(membership[0], membership[1]);
        assert_eq!(membership[2], membership[3]);
        assert_ne!(membership[0], membership[2]);

        let contracted = g.contract_vertices(&membership, count).simplify(true, true);
        assert_eq!(contracted.node_count(), 2);
        assert_eq!(contracted.edge_count(), 1);
        assert_eq!(
            contracted.edge_endpoints(crate::graph::edge_index(0)),
            (ix(membership[0]), ix(membership[2]))
        );
    }
}
