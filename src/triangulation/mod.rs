//! Static triangulation of undirected graphs.
//!
//! A `StaticTriangulation` eliminates the nodes of a graph one at a time, in the order chosen by
//! its `EliminationSequenceStrategy`, and records what every elimination creates: the fill-in
//! edges, which make the graph chordal, and the elimination cliques, from which its
//! `JunctionTreeStrategy` builds the junction tree.

pub mod elimination;
pub mod junction_tree;
pub mod simplicial_set;
mod thinning;

pub use self::elimination::{
    DefaultElimination, Elimination, EliminationSequenceStrategy, OrderedElimination, PartialOrderElimination,
};
pub use self::junction_tree::{elimination_tree, DefaultJunctionTree, JunctionTreeStrategy};
pub use self::simplicial_set::{Classification, SimplicialSet};
pub use self::thinning::{elimination_cliques, perfect_elimination_order, thin_fill_ins};

use crate::graph::{check_domain_sizes, CliqueGraph, CliqueId, DomainSizes, Edge, JunctionTree, NodeId, NodeSet,
                   UndirectedGraph};
use crate::util::{JunctionError, Result};

use indexmap::IndexMap;
use tracing::debug;

use std::collections::BTreeSet;

/// Default bound on the ratio between the weight of an almost simplicial node and the tree width
pub const DEFAULT_ALMOST_SIMPLICIAL_RATIO: f64 = 10.0;

/// Default bound on `fill-in * weight` for quasi simplicial nodes
pub const DEFAULT_QUASI_SIMPLICIAL_THRESHOLD: f64 = 512.0;


/// Parameters of a triangulation.
///
/// # Example
/// ```
/// use junction::TriangulationConfig;
///
/// let config = TriangulationConfig::default()
///     .with_minimality(true)
///     .with_quasi_simplicial_threshold(1024.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangulationConfig {

    /// Remove the fill-in edges that are not needed for chordality once the elimination is done
    pub minimality: bool,

    /// See `SimplicialSet`
    pub almost_simplicial_ratio: f64,

    /// See `SimplicialSet`
    pub quasi_simplicial_threshold: f64

}


impl Default for TriangulationConfig {

    fn default() -> Self {
        TriangulationConfig {
            minimality: false,
            almost_simplicial_ratio: DEFAULT_ALMOST_SIMPLICIAL_RATIO,
            quasi_simplicial_threshold: DEFAULT_QUASI_SIMPLICIAL_THRESHOLD
        }
    }

}


impl TriangulationConfig {

    pub fn with_minimality(mut self, minimality: bool) -> Self {
        self.minimality = minimality;
        self
    }


    pub fn with_almost_simplicial_ratio(mut self, ratio: f64) -> Self {
        self.almost_simplicial_ratio = ratio;
        self
    }


    pub fn with_quasi_simplicial_threshold(mut self, threshold: f64) -> Self {
        self.quasi_simplicial_threshold = threshold;
        self
    }


    /// Check the configuration.
    ///
    /// # Errors
    /// * `JunctionError::InvalidArgument` if a threshold is not a finite positive number
    pub fn validate(&self) -> Result<()> {
        simplicial_set::check_threshold("almost simplicial ratio", self.almost_simplicial_ratio)?;
        simplicial_set::check_threshold("quasi simplicial threshold", self.quasi_simplicial_threshold)
    }

}


/// Everything a triangulation computes about a graph.
#[derive(Clone, Debug)]
pub struct Triangulation {

    /// The input graph with the fill-in edges
    triangulated_graph: UndirectedGraph,

    fill_ins: BTreeSet<Edge>,

    /// The nodes in elimination order, with their elimination cliques
    eliminations: IndexMap<NodeId, NodeSet>,

    elimination_tree: CliqueGraph,

    junction_tree: JunctionTree,

    /// For every node, the junction tree clique holding its elimination clique
    created_cliques: IndexMap<NodeId, CliqueId>,

    max_log10_clique_domain_size: f64

}


impl Triangulation {

    /// The input graph plus the fill-in edges. This graph is chordal.
    pub fn triangulated_graph(&self) -> &UndirectedGraph {
        &self.triangulated_graph
    }


    /// The edges added by the triangulation
    pub fn fill_ins(&self) -> &BTreeSet<Edge> {
        &self.fill_ins
    }


    /// The nodes in the order they were eliminated. This order is a perfect elimination ordering
    /// of the triangulated graph.
    pub fn elimination_order(&self) -> Vec<NodeId> {
        self.eliminations.keys().cloned().collect()
    }


    /// Get the rank of a node in the elimination order.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node was not part of the graph
    pub fn elimination_position(&self, node: NodeId) -> Result<usize> {
        self.eliminations.get_index_of(&node).ok_or(JunctionError::InvalidNode(node))
    }


    /// Get the elimination clique of a node: the node and its neighbours eliminated after it in
    /// the triangulated graph.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node was not part of the graph
    pub fn elimination_clique(&self, node: NodeId) -> Result<&NodeSet> {
        self.eliminations.get(&node).ok_or(JunctionError::InvalidNode(node))
    }


    /// The nodes in elimination order, with their elimination cliques
    pub fn eliminations(&self) -> &IndexMap<NodeId, NodeSet> {
        &self.eliminations
    }


    /// The tree of all the elimination cliques. Clique `i` is the elimination clique of the `i`-th
    /// eliminated node.
    pub fn elimination_tree(&self) -> &CliqueGraph {
        &self.elimination_tree
    }


    pub fn junction_tree(&self) -> &JunctionTree {
        &self.junction_tree
    }


    /// Get the junction tree clique which contains the elimination clique of a node.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node was not part of the graph
    pub fn created_clique(&self, node: NodeId) -> Result<CliqueId> {
        self.created_cliques.get(&node).cloned().ok_or(JunctionError::InvalidNode(node))
    }


    pub fn created_cliques(&self) -> &IndexMap<NodeId, CliqueId> {
        &self.created_cliques
    }


    /// The decimal logarithm of the largest number of entries of a potential over a junction tree
    /// clique, or 0 for an empty graph.
    pub fn max_log10_clique_domain_size(&self) -> f64 {
        self.max_log10_clique_domain_size
    }

}


/// Triangulates graphs with an `EliminationSequenceStrategy` and a `JunctionTreeStrategy`.
///
/// The same `StaticTriangulation` can triangulate any number of graphs: every call to
/// `triangulate` resets the strategies.
#[derive(Clone, Debug)]
pub struct StaticTriangulation<E, J = DefaultJunctionTree> {

    elimination: E,

    junction: J,

    config: TriangulationConfig

}


/// Triangulation with the unconstrained elimination heuristic
pub type DefaultTriangulation = StaticTriangulation<DefaultElimination, DefaultJunctionTree>;

/// Triangulation whose elimination order respects a sequence of node subsets
pub type PartialOrderedTriangulation = StaticTriangulation<PartialOrderElimination, DefaultJunctionTree>;

/// Triangulation along a given elimination order
pub type OrderedTriangulation = StaticTriangulation<OrderedElimination, DefaultJunctionTree>;


impl<E, J> StaticTriangulation<E, J>
    where E: EliminationSequenceStrategy,
          J: JunctionTreeStrategy
{

    /// Construct a `StaticTriangulation`.
    ///
    /// # Errors
    /// * `JunctionError::InvalidArgument` if the configuration is invalid
    pub fn new(elimination: E, junction: J, config: TriangulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(StaticTriangulation { elimination, junction, config })
    }


    pub fn config(&self) -> &TriangulationConfig {
        &self.config
    }


    pub fn elimination_strategy(&self) -> &E {
        &self.elimination
    }


    pub fn junction_tree_strategy(&self) -> &J {
        &self.junction
    }


    /// Triangulate a graph.
    ///
    /// # Args
    /// * `graph`: the graph to triangulate, typically a moral graph. It is not modified.
    /// * `domain_sizes`: the domain size of every node of the graph
    ///
    /// # Returns
    /// the fill-ins, elimination order, elimination cliques and junction tree of the graph
    ///
    /// # Errors
    /// * `JunctionError::InvalidArgument` if a node has no domain size
    /// * `JunctionError::OutOfBounds` if a domain size is 0
    /// * any error of the elimination strategy, e.g. an order that does not fit the graph
    pub fn triangulate(&mut self, graph: &UndirectedGraph, domain_sizes: &DomainSizes) -> Result<Triangulation> {
        check_domain_sizes(graph, domain_sizes)?;

        let mut working = graph.clone();
        self.elimination.initialize(&working, domain_sizes, &self.config)?;

        let mut triangulated_graph = graph.clone();
        let mut fill_ins = BTreeSet::new();
        let mut eliminations = IndexMap::with_capacity(graph.size());

        while ! working.is_empty() {
            let node = self.elimination.next_node_to_eliminate(&working)?;
            let step = self.elimination.eliminate(&mut working, node)?;

            for edge in step.fill_ins {
                triangulated_graph.add_edge(edge.first(), edge.second())?;
                fill_ins.insert(edge);
            }
            eliminations.insert(step.node, step.clique);
        }

        if self.config.minimality && ! fill_ins.is_empty() {
            let constraints = self.elimination.order_constraints();
            let removed = thin_fill_ins(&mut triangulated_graph, &mut fill_ins, constraints.as_deref())?;
            debug!(removed, constrained = constraints.is_some(), "thinned fill-ins");

            if removed > 0 {
                let preferred: Vec<NodeId> = eliminations.keys().cloned().collect();
                let order = perfect_elimination_order(&triangulated_graph, &preferred, constraints.as_deref())?;
                eliminations = elimination_cliques(&triangulated_graph, &order)?;
            }
        }

        let elimination_tree = elimination_tree(&eliminations)?;
        let (junction_tree, created_cliques) = self.junction.junction_tree(&eliminations, &elimination_tree)?;

        let max_log10_clique_domain_size = junction_tree.cliques()
            .map(|(_, clique)| clique.iter().filter_map(|n| domain_sizes.get(n)).map(|&d| (d as f64).log10()).sum::<f64>())
            .fold(0.0, f64::max);

        debug!(
            nodes = graph.size(),
            fill_ins = fill_ins.len(),
            cliques = junction_tree.size(),
            max_log10_clique_domain_size,
            "triangulated graph"
        );

        Ok(Triangulation {
            triangulated_graph,
            fill_ins,
            eliminations,
            elimination_tree,
            junction_tree,
            created_cliques,
            max_log10_clique_domain_size
        })
    }

}


impl DefaultTriangulation {

    pub fn with_config(config: TriangulationConfig) -> Result<Self> {
        StaticTriangulation::new(DefaultElimination::new(), DefaultJunctionTree::new(), config)
    }

}


impl Default for DefaultTriangulation {

    fn default() -> Self {
        StaticTriangulation {
            elimination: DefaultElimination::new(),
            junction: DefaultJunctionTree::new(),
            config: TriangulationConfig::default()
        }
    }

}


impl PartialOrderedTriangulation {

    /// Construct a triangulation whose elimination order eliminates all the nodes of a subset
    /// before any node of the following subsets. Nodes in no subset are eliminated last.
    pub fn with_partial_order(order: Vec<NodeSet>, config: TriangulationConfig) -> Result<Self> {
        StaticTriangulation::new(PartialOrderElimination::new(order), DefaultJunctionTree::new(), config)
    }

}


impl OrderedTriangulation {

    /// Construct a triangulation eliminating the nodes in the given order
    pub fn with_order(order: Vec<NodeId>, config: TriangulationConfig) -> Result<Self> {
        StaticTriangulation::new(OrderedElimination::new(order), DefaultJunctionTree::new(), config)
    }

}
