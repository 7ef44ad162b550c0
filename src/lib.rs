//! **flowcuts** is a graph library for cut enumeration.
//!
//! The central entry points are [`algo::all_st_cuts`], which lists every
//! distinct edge cut separating a source vertex from a target vertex in a
//! directed graph, and [`algo::all_st_mincuts`], which lists every such cut
//! of minimum total capacity. Both implement the paradigm of Provan and
//! Shier (Algorithmica 15, 1996).
//!
//! The supporting pieces are exposed as well: a Lengauer–Tarjan dominator
//! tree builder ([`algo::dominator_tree`]), the Even–Tarjan vertex-capacity
//! reduction, residual and reverse-residual graph constructions, a max-flow
//! routine, and strongly connected components.
//!
//! Graphs are represented by [`DiGraph`], a directed graph with contiguous
//! vertex and edge indices. Edge capacities and flows live outside the graph
//! as edge-indexed `&[f64]` slices, so one graph can be paired with many
//! capacity assignments.

pub use crate::graph::{edge_index, node_index, DiGraph, EdgeIndex, NodeIndex};

pub mod algo;
pub mod estack;
pub mod graph;
pub mod marked_queue;
pub mod visit;

pub use crate::Direction::{Incoming, Outgoing};

/// Edge direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// An `Outgoing` edge is an outward edge *from* the current node.
    Outgoing = 0,
    /// An `Incoming` edge is an inbound edge *to* the current node.
    Incoming = 1,
}

impl Direction {
    /// Return the opposite `Direction`.
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Outgoing => Incoming,
            Incoming => Outgoing,
        }
    }

    /// Return `0` for `Outgoing` and `1` for `Incoming`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}
