//! Exact-inference triangulation for probabilistic graphical models.
//!
//! Turns a moral graph into a chordal graph by node elimination, records the elimination
//! cliques and assembles them into a junction tree (optionally a binary join tree) for
//! message-passing inference.

pub mod binary_join_tree;
pub mod graph;
pub mod triangulation;
pub mod util;

pub use crate::binary_join_tree::{BinaryJoinTreeConverter, DefaultBinaryJoinTreeConverter};
pub use crate::graph::{CliqueGraph, CliqueId, DomainSizes, Edge, JunctionTree, NodeId, NodeSet, UndirectedGraph};
pub use crate::triangulation::{
    DefaultTriangulation, OrderedTriangulation, PartialOrderedTriangulation, StaticTriangulation,
    Triangulation, TriangulationConfig,
};
pub use crate::util::{JunctionError, Result};
