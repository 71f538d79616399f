//! Defines the `EliminationSequenceStrategy` trait: the objects that decide, one step at a time,
//! which node of the graph should be eliminated next.

use crate::graph::{DomainSizes, Edge, NodeId, NodeSet, UndirectedGraph};
use crate::triangulation::TriangulationConfig;
use crate::util::Result;

use itertools::Itertools;

mod default;
mod ordered;
mod partial_order;

pub use self::default::DefaultElimination;
pub use self::ordered::OrderedElimination;
pub use self::partial_order::PartialOrderElimination;


/// The outcome of the elimination of a node
#[derive(Clone, Debug, PartialEq)]
pub struct Elimination {

    /// The eliminated node
    pub node: NodeId,

    /// The node and its neighbours at the time of its elimination
    pub clique: NodeSet,

    /// The edges added between the neighbours of the node
    pub fill_ins: Vec<Edge>

}


/// An `EliminationSequenceStrategy` drives the elimination of the nodes of a graph.
///
/// The graph is owned by the caller, which lends it for every step. The strategy may keep
/// auxiliary structures about the graph (e.g. a `SimplicialSet`); this is why the graph must only
/// be mutated through `eliminate` between `initialize` and the elimination of the last node.
pub trait EliminationSequenceStrategy {

    /// Prepare the strategy for the elimination of `graph`, discarding any previous state.
    ///
    /// # Errors
    /// * `JunctionError::InvalidArgument` / `JunctionError::OutOfBounds` if the configuration or
    ///   the domain sizes are invalid, or if the strategy's own constraints do not fit the graph
    fn initialize(&mut self, graph: &UndirectedGraph, domain_sizes: &DomainSizes, config: &TriangulationConfig) -> Result<()>;

    /// Select the next node to eliminate.
    ///
    /// # Errors
    /// * `JunctionError::NotFound` if the graph is empty
    fn next_node_to_eliminate(&mut self, graph: &UndirectedGraph) -> Result<NodeId>;

    /// Eliminate `node`: link its neighbours pairwise and remove it from the graph.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    fn eliminate(&mut self, graph: &mut UndirectedGraph, node: NodeId) -> Result<Elimination>;


    /// The successive sets of nodes that every elimination order must respect: all the nodes of
    /// a set come before the nodes of the following sets, and nodes in no set come last. `None`
    /// if the strategy is free to eliminate the nodes in any order.
    fn order_constraints(&self) -> Option<Vec<NodeSet>> {
        None
    }

}


/// Eliminate a node directly on the graph, for strategies that do not track the structure of
/// the graph.
pub(crate) fn eliminate_node(graph: &mut UndirectedGraph, node: NodeId) -> Result<Elimination> {
    let clique = graph.closed_neighbourhood(node)?;
    let neighbours: Vec<NodeId> = graph.neighbours(node)?.iter().cloned().collect();

    let mut fill_ins = Vec::new();
    for (a, b) in neighbours.into_iter().tuple_combinations() {
        if graph.add_edge(a, b)? {
            fill_ins.push(Edge::new(a, b));
        }
    }
    graph.erase_node(node)?;

    Ok(Elimination { node, clique, fill_ins })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eliminate_on_graph() {
        let mut graph = UndirectedGraph::from_edges(vec![(0, 1), (0, 2), (0, 3), (1, 2)]).unwrap();
        let elimination = eliminate_node(&mut graph, 0).unwrap();
        assert_eq!(0, elimination.node);
        assert_eq!(4, elimination.clique.len());
        assert_eq!(vec![Edge::new(1, 3), Edge::new(2, 3)], elimination.fill_ins);
        assert!(graph.is_clique(&graph.node_set()));
        assert!(eliminate_node(&mut graph, 0).is_err());
    }
}
