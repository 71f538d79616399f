//! Defines the `DefaultElimination` strategy: minimum fill / minimum weight elimination driven by
//! a `SimplicialSet`.

use super::{Elimination, EliminationSequenceStrategy};
use crate::graph::{DomainSizes, NodeId, UndirectedGraph};
use crate::triangulation::simplicial_set::SimplicialSet;
use crate::triangulation::TriangulationConfig;
use crate::util::{JunctionError, Result};

/// Unconstrained elimination heuristic.
///
/// At every step, eliminates by order of preference:
/// 1. the lightest simplicial node
/// 2. the lightest almost simplicial node
/// 3. the lightest quasi simplicial node
/// 4. the lightest node of the graph
///
/// where lighter means smaller weight (product of the domain sizes of the node and its
/// neighbours) and ties are broken by the smallest node id.
#[derive(Clone, Debug, Default)]
pub struct DefaultElimination {

    /// The classification of the nodes of the graph being eliminated
    simplicial_set: Option<SimplicialSet>

}


impl DefaultElimination {

    pub fn new() -> Self {
        DefaultElimination { simplicial_set: None }
    }

}


impl EliminationSequenceStrategy for DefaultElimination {

    fn initialize(&mut self, graph: &UndirectedGraph, domain_sizes: &DomainSizes, config: &TriangulationConfig) -> Result<()> {
        config.validate()?;
        self.simplicial_set = Some(SimplicialSet::new(
            graph,
            domain_sizes,
            config.almost_simplicial_ratio,
            config.quasi_simplicial_threshold
        )?);
        Ok(())
    }


    fn next_node_to_eliminate(&mut self, graph: &UndirectedGraph) -> Result<NodeId> {
        if graph.is_empty() {
            return Err(JunctionError::NotFound(String::from("no node left to eliminate")));
        }

        let set = self.simplicial_set.as_mut().ok_or_else(not_initialized)?;

        if set.has_simplicial_node(graph)? {
            return set.best_simplicial_node(graph);
        }
        if set.has_almost_simplicial_node(graph)? {
            return set.best_almost_simplicial_node(graph);
        }
        if set.has_quasi_simplicial_node(graph)? {
            return set.best_quasi_simplicial_node(graph);
        }

        // nodes come by increasing id, so a strict comparison keeps the smallest id on ties
        let mut best: Option<(f64, NodeId)> = None;
        for node in graph.nodes() {
            let weight = set.weight(graph, node)?;
            if best.map_or(true, |(w, _)| weight < w) {
                best = Some((weight, node));
            }
        }

        best.map(|(_, node)| node)
            .ok_or_else(|| JunctionError::NotFound(String::from("no node left to eliminate")))
    }


    fn eliminate(&mut self, graph: &mut UndirectedGraph, node: NodeId) -> Result<Elimination> {
        let set = self.simplicial_set.as_mut().ok_or_else(not_initialized)?;
        let (clique, fill_ins) = set.eliminate(graph, node)?;
        Ok(Elimination { node, clique, fill_ins })
    }

}


pub(super) fn not_initialized() -> JunctionError {
    JunctionError::NotFound(String::from("the elimination strategy has not been initialized"))
}
