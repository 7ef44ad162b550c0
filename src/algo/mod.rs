//! Graph algorithms: dominator trees, strongly connected components,
//! max-flow, and the Provan–Shier cut enumeration.

use std::error::Error;
use std::fmt;

pub mod dominators;
pub mod maxflow;
pub mod scc;
pub mod st_cuts;

pub use dominators::{dominator_tree, Dominators};
pub use maxflow::maxflow;
pub use scc::{kosaraju_scc, scc_membership};
pub use st_cuts::{
    all_st_cuts, all_st_mincuts, even_tarjan_reduction, residual_graph, reverse_residual_graph,
    StCut, StMinCuts,
};

/// An error raised by the algorithms in this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlgoError {
    /// A vertex index was out of bounds for the graph.
    InvalidVertex,
    /// The source and target vertices coincide.
    IdenticalSourceTarget,
    /// A capacity or flow vector does not match the graph's edge count.
    LengthMismatch,
    /// A capacity was zero or negative where strictly positive capacities
    /// are required.
    NonPositiveCapacity,
    /// The number of edges of a derived graph does not fit the edge index
    /// type.
    Overflow,
}

impl fmt::Display for AlgoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgoError::InvalidVertex => write!(f, "vertex index out of bounds"),
            AlgoError::IdenticalSourceTarget => {
                write!(f, "source and target are the same vertex")
            }
            AlgoError::LengthMismatch => {
                write!(f, "capacity or flow vector does not match the edge count")
            }
            AlgoError::NonPositiveCapacity => {
                write!(f, "capacities must be strictly positive")
            }
            AlgoError::Overflow => write!(f, "edge count overflows the index type"),
        }
    }
}

impl Error for AlgoError {}
