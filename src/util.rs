//! Defines the `JunctionError` type for the junction library

use crate::graph::NodeId;

use thiserror::Error;

use std::result;

pub type Result<T> = result::Result<T, JunctionError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum JunctionError {

    /// An operation referenced a node (or clique) that is not part of the graph, or a node that
    /// is not allowed in that position (e.g. a second root in the same connected component)
    #[error("invalid node {0}")]
    InvalidNode(NodeId),

    /// An operation referenced an edge that is not part of the graph
    #[error("invalid edge ({0}, {1})")]
    InvalidEdge(NodeId, NodeId),

    /// A query for an element that does not currently exist, e.g. the best simplicial node when
    /// there is none
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed configuration or input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A numeric value outside of its allowed range
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

}
