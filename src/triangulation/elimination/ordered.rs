//! Defines the `OrderedElimination` strategy, which follows a complete elimination order chosen
//! by the user.

use super::{eliminate_node, Elimination, EliminationSequenceStrategy};
use crate::graph::{check_domain_sizes, DomainSizes, NodeId, NodeSet, UndirectedGraph};
use crate::triangulation::TriangulationConfig;
use crate::util::{JunctionError, Result};

/// Elimination along a fixed order. The order must list every node of the graph exactly once.
#[derive(Clone, Debug, Default)]
pub struct OrderedElimination {

    /// The elimination order
    order: Vec<NodeId>,

    /// The index in `order` of the next candidate
    position: usize

}


impl OrderedElimination {

    pub fn new(order: Vec<NodeId>) -> Self {
        OrderedElimination { order, position: 0 }
    }


    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

}


impl EliminationSequenceStrategy for OrderedElimination {

    fn initialize(&mut self, graph: &UndirectedGraph, domain_sizes: &DomainSizes, config: &TriangulationConfig) -> Result<()> {
        config.validate()?;
        check_domain_sizes(graph, domain_sizes)?;

        let mut seen = NodeSet::new();
        for &node in self.order.iter() {
            if ! graph.exists_node(node) {
                return Err(JunctionError::InvalidNode(node));
            }
            if ! seen.insert(node) {
                return Err(JunctionError::InvalidArgument(format!("node {} appears twice in the elimination order", node)));
            }
        }
        if seen.len() != graph.size() {
            return Err(JunctionError::InvalidArgument(
                format!("the elimination order covers {} of the {} nodes", seen.len(), graph.size())
            ));
        }

        self.position = 0;
        Ok(())
    }


    fn next_node_to_eliminate(&mut self, graph: &UndirectedGraph) -> Result<NodeId> {
        while self.position < self.order.len() && ! graph.exists_node(self.order[self.position]) {
            self.position += 1;
        }

        self.order
            .get(self.position)
            .cloned()
            .ok_or_else(|| JunctionError::NotFound(String::from("no node left to eliminate")))
    }


    fn eliminate(&mut self, graph: &mut UndirectedGraph, node: NodeId) -> Result<Elimination> {
        eliminate_node(graph, node)
    }


    fn order_constraints(&self) -> Option<Vec<NodeSet>> {
        Some(self.order.iter().map(|&n| Some(n).into_iter().collect()).collect())
    }

}
