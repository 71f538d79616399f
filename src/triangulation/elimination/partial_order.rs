//! Defines the `PartialOrderElimination` strategy: the default heuristic restricted by a partial
//! order over the nodes.

use super::default::not_initialized;
use super::{Elimination, EliminationSequenceStrategy};
use crate::graph::{DomainSizes, NodeId, NodeSet, UndirectedGraph};
use crate::triangulation::simplicial_set::SimplicialSet;
use crate::triangulation::TriangulationConfig;
use crate::util::{JunctionError, Result};

use std::collections::{BTreeMap, HashMap};

/// Elimination constrained by a partial order.
///
/// The partial order is a sequence of sets of nodes: every node of a set must be eliminated
/// before any node of the following sets. Nodes of the graph that do not appear in the order are
/// eliminated last. Within the current set, nodes are chosen as `DefaultElimination` does:
/// simplicial, then almost simplicial, then quasi simplicial, then lightest, ties broken by the
/// smallest id.
#[derive(Clone, Debug, Default)]
pub struct PartialOrderElimination {

    /// The partial order as given by the user
    order: Vec<NodeSet>,

    /// The nodes of each set that remain to be eliminated
    subsets: Vec<NodeSet>,

    /// The index in `subsets` of every node
    rank: HashMap<NodeId, usize>,

    /// The first set that still has nodes
    current: usize,

    simplicial_set: Option<SimplicialSet>

}


impl PartialOrderElimination {

    /// Construct a `PartialOrderElimination` from an ordered sequence of sets of nodes
    pub fn new(order: Vec<NodeSet>) -> Self {
        PartialOrderElimination {
            order,
            subsets: Vec::new(),
            rank: HashMap::new(),
            current: 0,
            simplicial_set: None
        }
    }


    /// Construct a `PartialOrderElimination` from a rank for each node: nodes of lower rank are
    /// eliminated first.
    pub fn from_ranks(ranks: &HashMap<NodeId, usize>) -> Self {
        let mut groups: BTreeMap<usize, NodeSet> = BTreeMap::new();
        for (&node, &rank) in ranks.iter() {
            groups.entry(rank).or_insert_with(NodeSet::new).insert(node);
        }
        PartialOrderElimination::new(groups.into_iter().map(|(_, nodes)| nodes).collect())
    }


    /// The partial order, as given at construction
    pub fn order(&self) -> &[NodeSet] {
        &self.order
    }


    /// The nodes that may be eliminated now
    pub fn eligible_nodes(&self) -> Option<&NodeSet> {
        self.subsets[self.current..].iter().find(|s| ! s.is_empty())
    }

}


impl EliminationSequenceStrategy for PartialOrderElimination {

    fn initialize(&mut self, graph: &UndirectedGraph, domain_sizes: &DomainSizes, config: &TriangulationConfig) -> Result<()> {
        config.validate()?;

        let mut rank = HashMap::with_capacity(graph.size());
        for (i, subset) in self.order.iter().enumerate() {
            for &node in subset.iter() {
                if ! graph.exists_node(node) {
                    return Err(JunctionError::InvalidNode(node));
                }
                if rank.insert(node, i).is_some() {
                    return Err(JunctionError::InvalidArgument(
                        format!("node {} appears several times in the partial order", node)
                    ));
                }
            }
        }

        let mut subsets = self.order.clone();
        let leftover: NodeSet = graph.nodes().filter(|n| ! rank.contains_key(n)).collect();
        if ! leftover.is_empty() {
            for &node in leftover.iter() {
                rank.insert(node, subsets.len());
            }
            subsets.push(leftover);
        }

        self.simplicial_set = Some(SimplicialSet::new(
            graph,
            domain_sizes,
            config.almost_simplicial_ratio,
            config.quasi_simplicial_threshold
        )?);
        self.subsets = subsets;
        self.rank = rank;
        self.current = 0;
        Ok(())
    }


    fn next_node_to_eliminate(&mut self, graph: &UndirectedGraph) -> Result<NodeId> {
        if graph.is_empty() {
            return Err(JunctionError::NotFound(String::from("no node left to eliminate")));
        }

        let set = self.simplicial_set.as_mut().ok_or_else(not_initialized)?;

        while self.current < self.subsets.len() && self.subsets[self.current].is_empty() {
            self.current += 1;
        }
        let subset = self.subsets
                         .get(self.current)
                         .ok_or_else(|| JunctionError::NotFound(String::from("no node left to eliminate")))?;

        // the lists come by increasing weight: the first member of the subset is the lightest
        for candidates in vec![
            set.simplicial_nodes(graph)?,
            set.almost_simplicial_nodes(graph)?,
            set.quasi_simplicial_nodes(graph)?
        ] {
            if let Some(&node) = candidates.iter().find(|n| subset.contains(n)) {
                return Ok(node);
            }
        }

        let mut best: Option<(f64, NodeId)> = None;
        for &node in subset.iter() {
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

        if let Some(&i) = self.rank.get(&node) {
            self.subsets[i].remove(&node);
        }

        Ok(Elimination { node, clique, fill_ins })
    }


    fn order_constraints(&self) -> Option<Vec<NodeSet>> {
        Some(self.order.clone())
    }

}
