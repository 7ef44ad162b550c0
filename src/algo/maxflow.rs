//! Maximum flow.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;

use crate::algo::AlgoError;
use crate::graph::{DiGraph, EdgeRef, NodeIndex};
use crate::{Incoming, Outgoing};

fn capacity_of(capacity: Option<&[f64]>, edge: EdgeRef) -> f64 {
    capacity.map_or(1.0, |c| c[edge.id().index()])
}

fn residual_capacity(edge: EdgeRef, vertex: NodeIndex, flow: f64, capacity: Option<&[f64]>) -> f64 {
    if vertex == edge.source() {
        // backward edge
        flow
    } else {
        // forward edge
        capacity_of(capacity, edge) - flow
    }
}

/// The other endpoint of `edge`, seen from `vertex`.
fn other_endpoint(edge: EdgeRef, vertex: NodeIndex) -> NodeIndex {
    if vertex == edge.source() {
        edge.target()
    } else {
        edge.source()
    }
}

/// Whether an augmenting path exists in the residual network, leaving its
/// discovery tree in `edge_to`.
fn has_augmenting_path(
    graph: &DiGraph,
    source: NodeIndex,
    target: NodeIndex,
    edge_to: &mut [Option<EdgeRef>],
    flows: &[f64],
    capacity: Option<&[f64]>,
) -> bool {
    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut queue = VecDeque::new();
    visited.insert(source.index());
    queue.push_back(source);

    while let Some(vertex) = queue.pop_front() {
        let out_edges = graph.edges_directed(vertex, Outgoing);
        let in_edges = graph.edges_directed(vertex, Incoming);
        for edge in out_edges.chain(in_edges) {
            let next = other_endpoint(edge, vertex);
            let residual = residual_capacity(edge, next, flows[edge.id().index()], capacity);
            if !visited.contains(next.index()) && residual > 0.0 {
                visited.insert(next.index());
                edge_to[next.index()] = Some(edge);
                if next == target {
                    return true;
                }
                queue.push_back(next);
            }
        }
    }
    false
}

/// Compute the maximum flow from `source` to `target` using the
/// [Edmonds-Karp][ek] variation of the Ford-Fulkerson method.
///
/// `capacity`, if given, holds one capacity per edge index; without it every
/// edge has unit capacity. Returns the value of the maximum flow and the
/// flow of each edge, indexed by edge index.
///
/// Runs in **O(|V||E|²)** time.
///
/// [ek]: https://en.wikipedia.org/wiki/Edmonds%E2%80%93Karp_algorithm
pub fn maxflow(
    graph: &DiGraph,
    source: NodeIndex,
    target: NodeIndex,
    capacity: Option<&[f64]>,
) -> Result<(f64, Vec<f64>), AlgoError> {
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
    }

    let mut flows = vec![0.0; no_of_edges];
    let mut edge_to: Vec<Option<EdgeRef>> = vec![None; no_of_nodes];
    let mut max_flow = 0.0;

    while has_augmenting_path(graph, source, target, &mut edge_to, &flows, capacity) {
        // Minimum residual capacity along the discovered path.
        let mut path_flow = f64::INFINITY;
        let mut vertex = target;
        while vertex != source {
            let edge = edge_to[vertex.index()].expect("path reaches back to the source");
            let residual = residual_capacity(edge, vertex, flows[edge.id().index()], capacity);
            path_flow = path_flow.min(residual);
            vertex = other_endpoint(edge, vertex);
        }

        // Push the flow back along the path.
        let mut vertex = target;
        while vertex != source {
            let edge = edge_to[vertex.index()].expect("path reaches back to the source");
            let flow = &mut flows[edge.id().index()];
            if vertex == edge.source() {
                *flow -= path_flow;
            } else {
                *flow += path_flow;
            }
            vertex = other_endpoint(edge, vertex);
        }

        max_flow += path_flow;
    }

    Ok((max_flow, flows))
}
