//! Defines a `SimplicialSet`, which classifies the nodes of the graph being eliminated by how
//! cheap they are to eliminate.
//!
//! * a node is *simplicial* if its neighbours already form a clique (no fill-in)
//! * a node is *almost simplicial* if a single fill-in edge would make it simplicial and its
//!   weight is at most `almost_simplicial_ratio` times the largest clique weight created so far
//! * a node is *quasi simplicial* if `fill-in * weight` is below `quasi_simplicial_threshold`
//!
//! where the weight of a node is the product of the domain sizes of the node and its neighbours,
//! i.e. the size of the potential that eliminating it would create.

use crate::graph::{check_domain_sizes, domain_product, DomainSizes, Edge, NodeId, NodeSet, UndirectedGraph};
use crate::util::{JunctionError, Result};

use itertools::Itertools;
use ordered_float::OrderedFloat;
use tracing::trace;

use std::collections::{BTreeSet, HashMap};
use std::mem;

/// The category a node belongs to. A node belongs to exactly one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {

    /// The neighbours of the node form a clique
    Simplicial,

    /// One fill-in edge away from being simplicial, with a small enough weight
    AlmostSimplicial,

    /// Few fill-ins relative to its weight
    QuasiSimplicial,

    /// None of the above
    Unclassified

}

/// Key of the priority queues: smallest weight first, then smallest id
type Priority = (OrderedFloat<f64>, NodeId);


/// Incremental classification of the nodes of a graph under elimination.
///
/// # Representation
/// The `SimplicialSet` does not own the graph. Every mutation of the graph goes through the
/// `SimplicialSet` (`add_edge`, `erase_edge`, `erase_neighbours`, `erase_node`, `make_clique`,
/// `eliminate`), which performs it on the graph passed in and updates its bookkeeping:
///
/// * the number of edges among the neighbours of every node (its "triangles"), from which the
///   fill-in is `deg * (deg - 1) / 2 - triangles`
/// * the number of common neighbours of the end points of every edge, so that removing an edge
///   updates the triangles of its end points without recounting
///
/// Nodes whose neighbourhood changed are only marked as changed. They are reclassified the next
/// time they are queried, or all at once by `update_all_nodes` before a best-node query.
#[derive(Clone, Debug)]
pub struct SimplicialSet {

    /// The cardinality of every node
    domain_sizes: DomainSizes,

    /// The number of edges among the neighbours of every node
    nb_triangles: HashMap<NodeId, usize>,

    /// The number of common neighbours of the end points of every edge
    nb_adjacent_neighbours: HashMap<Edge, usize>,

    /// The weight of every node as of its last classification
    weights: HashMap<NodeId, f64>,

    /// The category of every node as of its last classification
    belongs: HashMap<NodeId, Classification>,

    simplicial: BTreeSet<Priority>,

    almost_simplicial: BTreeSet<Priority>,

    quasi_simplicial: BTreeSet<Priority>,

    /// The nodes that need to be reclassified
    changed: NodeSet,

    /// The weight of the largest clique created so far
    tree_width: f64,

    almost_simplicial_ratio: f64,

    quasi_simplicial_threshold: f64

}


impl SimplicialSet {

    /// Construct the `SimplicialSet` of a graph.
    ///
    /// # Args
    /// * `graph`: the graph to classify. It must then only be mutated through this set.
    /// * `domain_sizes`: the domain size of every node of `graph`
    /// * `almost_simplicial_ratio`: the largest ratio between the weight of an almost simplicial
    ///   node and the largest clique weight created so far
    /// * `quasi_simplicial_threshold`: the bound on `fill-in * weight` for quasi simplicial nodes
    ///
    /// # Errors
    /// * `JunctionError::InvalidArgument` if a threshold is not a positive number or a node has
    ///   no domain size
    /// * `JunctionError::OutOfBounds` if a node has a null domain size
    pub fn new(
        graph: &UndirectedGraph,
        domain_sizes: &DomainSizes,
        almost_simplicial_ratio: f64,
        quasi_simplicial_threshold: f64
    ) -> Result<Self> {
        check_threshold("almost simplicial ratio", almost_simplicial_ratio)?;
        check_threshold("quasi simplicial threshold", quasi_simplicial_threshold)?;
        check_domain_sizes(graph, domain_sizes)?;

        let domain_sizes: DomainSizes = graph.nodes().map(|n| (n, domain_sizes[&n])).collect();

        let mut nb_adjacent_neighbours = HashMap::with_capacity(graph.size_edges());
        for edge in graph.edges() {
            let common = common_neighbours(graph, edge.first(), edge.second())?.len();
            nb_adjacent_neighbours.insert(edge, common);
        }

        // every triangle containing a node is counted once by each of its two other nodes
        let mut nb_triangles = HashMap::with_capacity(graph.size());
        let mut weights = HashMap::with_capacity(graph.size());
        let mut belongs = HashMap::with_capacity(graph.size());
        for node in graph.nodes() {
            let neighbours = graph.neighbours(node)?;
            let twice: usize = neighbours.iter().map(|&n| nb_adjacent_neighbours[&Edge::new(node, n)]).sum();
            nb_triangles.insert(node, twice / 2);
            weights.insert(node, domain_product(neighbours.iter().chain(Some(&node)), &domain_sizes));
            belongs.insert(node, Classification::Unclassified);
        }

        let tree_width = domain_sizes.values().cloned().max().unwrap_or(1) as f64;

        Ok(SimplicialSet {
            domain_sizes,
            nb_triangles,
            nb_adjacent_neighbours,
            weights,
            belongs,
            simplicial: BTreeSet::new(),
            almost_simplicial: BTreeSet::new(),
            quasi_simplicial: BTreeSet::new(),
            changed: graph.node_set(),
            tree_width,
            almost_simplicial_ratio,
            quasi_simplicial_threshold
        })
    }


    /// The weight of the largest clique created by `eliminate` so far (initially, the largest
    /// domain size)
    pub fn tree_width(&self) -> f64 {
        self.tree_width
    }


    /// Check if a node is waiting to be reclassified
    pub fn is_changed(&self, id: NodeId) -> bool {
        self.changed.contains(&id)
    }


    /// Get the number of fill-in edges that eliminating the node would add.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn fill_in(&self, graph: &UndirectedGraph, id: NodeId) -> Result<usize> {
        let degree = graph.neighbours(id)?.len();
        let triangles = self.nb_triangles.get(&id).cloned().unwrap_or(0);
        Ok(pairs(degree).saturating_sub(triangles))
    }


    /// Get the weight of the node: the product of the domain sizes of the node and its neighbours.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn weight(&mut self, graph: &UndirectedGraph, id: NodeId) -> Result<f64> {
        self.update_node(graph, id)?;
        Ok(self.weights[&id])
    }


    /// Get the current category of a node.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn classification(&mut self, graph: &UndirectedGraph, id: NodeId) -> Result<Classification> {
        self.update_node(graph, id)?;
        Ok(self.belongs[&id])
    }


    /// Check if a node is simplicial.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn is_simplicial(&mut self, graph: &UndirectedGraph, id: NodeId) -> Result<bool> {
        Ok(self.classification(graph, id)? == Classification::Simplicial)
    }


    pub fn has_simplicial_node(&mut self, graph: &UndirectedGraph) -> Result<bool> {
        self.update_all_nodes(graph)?;
        Ok(! self.simplicial.is_empty())
    }


    pub fn has_almost_simplicial_node(&mut self, graph: &UndirectedGraph) -> Result<bool> {
        self.update_all_nodes(graph)?;
        Ok(! self.almost_simplicial.is_empty())
    }


    pub fn has_quasi_simplicial_node(&mut self, graph: &UndirectedGraph) -> Result<bool> {
        self.update_all_nodes(graph)?;
        Ok(! self.quasi_simplicial.is_empty())
    }


    /// Get the simplicial node with the smallest weight (ties: smallest id).
    ///
    /// # Errors
    /// * `JunctionError::NotFound` if there is no simplicial node
    pub fn best_simplicial_node(&mut self, graph: &UndirectedGraph) -> Result<NodeId> {
        self.update_all_nodes(graph)?;
        first(&self.simplicial, "simplicial")
    }


    /// Get the almost simplicial node with the smallest weight (ties: smallest id).
    ///
    /// # Errors
    /// * `JunctionError::NotFound` if there is no almost simplicial node
    pub fn best_almost_simplicial_node(&mut self, graph: &UndirectedGraph) -> Result<NodeId> {
        self.update_all_nodes(graph)?;
        first(&self.almost_simplicial, "almost simplicial")
    }


    /// Get the quasi simplicial node with the smallest weight (ties: smallest id).
    ///
    /// # Errors
    /// * `JunctionError::NotFound` if there is no quasi simplicial node
    pub fn best_quasi_simplicial_node(&mut self, graph: &UndirectedGraph) -> Result<NodeId> {
        self.update_all_nodes(graph)?;
        first(&self.quasi_simplicial, "quasi simplicial")
    }


    /// Get all the simplicial nodes, by increasing weight
    pub fn simplicial_nodes(&mut self, graph: &UndirectedGraph) -> Result<Vec<NodeId>> {
        self.update_all_nodes(graph)?;
        Ok(self.simplicial.iter().map(|&(_, id)| id).collect())
    }


    /// Get all the almost simplicial nodes, by increasing weight
    pub fn almost_simplicial_nodes(&mut self, graph: &UndirectedGraph) -> Result<Vec<NodeId>> {
        self.update_all_nodes(graph)?;
        Ok(self.almost_simplicial.iter().map(|&(_, id)| id).collect())
    }


    /// Get all the quasi simplicial nodes, by increasing weight
    pub fn quasi_simplicial_nodes(&mut self, graph: &UndirectedGraph) -> Result<Vec<NodeId>> {
        self.update_all_nodes(graph)?;
        Ok(self.quasi_simplicial.iter().map(|&(_, id)| id).collect())
    }


    /// Reclassify the node if its neighbourhood changed since its last classification.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn update_node(&mut self, graph: &UndirectedGraph, id: NodeId) -> Result<()> {
        if ! graph.exists_node(id) || ! self.belongs.contains_key(&id) {
            return Err(JunctionError::InvalidNode(id));
        }

        if self.changed.remove(&id) {
            self.classify(graph, id)?;
        }
        Ok(())
    }


    /// Reclassify every changed node
    pub fn update_all_nodes(&mut self, graph: &UndirectedGraph) -> Result<()> {
        for id in mem::replace(&mut self.changed, NodeSet::new()) {
            self.classify(graph, id)?;
        }
        Ok(())
    }


    /// Recompute the weight and the category of a node from its current neighbourhood
    fn classify(&mut self, graph: &UndirectedGraph, id: NodeId) -> Result<()> {
        let fill_in = self.fill_in(graph, id)?;
        let neighbours = graph.neighbours(id)?;
        let weight = domain_product(neighbours.iter().chain(Some(&id)), &self.domain_sizes);

        let category = if fill_in == 0 {
            Classification::Simplicial
        } else if fill_in == 1 && weight <= self.almost_simplicial_ratio * self.tree_width {
            Classification::AlmostSimplicial
        } else if (fill_in as f64) * weight < self.quasi_simplicial_threshold {
            Classification::QuasiSimplicial
        } else {
            Classification::Unclassified
        };

        self.unlist(id);
        self.weights.insert(id, weight);
        self.belongs.insert(id, category);

        let key = (OrderedFloat(weight), id);
        match category {
            Classification::Simplicial => { self.simplicial.insert(key); },
            Classification::AlmostSimplicial => { self.almost_simplicial.insert(key); },
            Classification::QuasiSimplicial => { self.quasi_simplicial.insert(key); },
            Classification::Unclassified => ()
        }

        Ok(())
    }


    /// Remove a node from the priority queue of its current category
    fn unlist(&mut self, id: NodeId) {
        let key = match self.weights.get(&id) {
            Some(&w) => (OrderedFloat(w), id),
            None => return
        };

        match self.belongs.get(&id) {
            Some(Classification::Simplicial) => { self.simplicial.remove(&key); },
            Some(Classification::AlmostSimplicial) => { self.almost_simplicial.remove(&key); },
            Some(Classification::QuasiSimplicial) => { self.quasi_simplicial.remove(&key); },
            _ => ()
        }
    }


    /// Add the edge `a - b` to the graph.
    ///
    /// # Returns
    /// `true` if the edge was not already in the graph
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if an end point is not in the graph
    /// * `JunctionError::InvalidEdge` if `a == b`
    pub fn add_edge(&mut self, graph: &mut UndirectedGraph, a: NodeId, b: NodeId) -> Result<bool> {
        if ! graph.add_edge(a, b)? {
            return Ok(false);
        }

        // every common neighbour w gets a new triangle (a, b, w)
        let common = common_neighbours(graph, a, b)?;
        for &w in common.iter() {
            *self.nb_triangles.entry(w).or_insert(0) += 1;
            *self.nb_adjacent_neighbours.entry(Edge::new(a, w)).or_insert(0) += 1;
            *self.nb_adjacent_neighbours.entry(Edge::new(b, w)).or_insert(0) += 1;
            self.changed.insert(w);
        }

        *self.nb_triangles.entry(a).or_insert(0) += common.len();
        *self.nb_triangles.entry(b).or_insert(0) += common.len();
        self.nb_adjacent_neighbours.insert(Edge::new(a, b), common.len());
        self.changed.insert(a);
        self.changed.insert(b);

        Ok(true)
    }


    /// Remove the edge `a - b` from the graph.
    ///
    /// # Errors
    /// * `JunctionError::InvalidEdge` if the edge is not in the graph
    pub fn erase_edge(&mut self, graph: &mut UndirectedGraph, a: NodeId, b: NodeId) -> Result<()> {
        graph.erase_edge(a, b)?;

        let common = common_neighbours(graph, a, b)?;
        for &w in common.iter() {
            decrement(&mut self.nb_triangles, &w, 1);
            decrement(&mut self.nb_adjacent_neighbours, &Edge::new(a, w), 1);
            decrement(&mut self.nb_adjacent_neighbours, &Edge::new(b, w), 1);
            self.changed.insert(w);
        }

        let count = self.nb_adjacent_neighbours.remove(&Edge::new(a, b)).unwrap_or(0);
        debug_assert_eq!(count, common.len());
        decrement(&mut self.nb_triangles, &a, count);
        decrement(&mut self.nb_triangles, &b, count);
        self.changed.insert(a);
        self.changed.insert(b);

        Ok(())
    }


    /// Remove all the edges incident to a node, leaving it isolated.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn erase_neighbours(&mut self, graph: &mut UndirectedGraph, id: NodeId) -> Result<()> {
        let neighbours: Vec<NodeId> = graph.neighbours(id)?.iter().cloned().collect();
        for n in neighbours {
            self.erase_edge(graph, id, n)?;
        }
        Ok(())
    }


    /// Remove a node and its incident edges from the graph.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn erase_node(&mut self, graph: &mut UndirectedGraph, id: NodeId) -> Result<()> {
        self.erase_neighbours(graph, id)?;
        graph.erase_node(id)?;

        self.unlist(id);
        self.weights.remove(&id);
        self.belongs.remove(&id);
        self.nb_triangles.remove(&id);
        self.changed.remove(&id);
        Ok(())
    }


    /// Link every pair of neighbours of a node, making it simplicial.
    ///
    /// # Returns
    /// the fill-in edges that were added
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn make_clique(&mut self, graph: &mut UndirectedGraph, id: NodeId) -> Result<Vec<Edge>> {
        if self.fill_in(graph, id)? == 0 {
            return Ok(Vec::new());
        }

        let neighbours: Vec<NodeId> = graph.neighbours(id)?.iter().cloned().collect();
        let mut fill_ins = Vec::new();
        for (a, b) in neighbours.into_iter().tuple_combinations() {
            if self.add_edge(graph, a, b)? {
                fill_ins.push(Edge::new(a, b));
            }
        }
        Ok(fill_ins)
    }


    /// Eliminate a node: link its neighbours pairwise and remove it from the graph.
    ///
    /// # Returns
    /// the clique created by the elimination (the node and its neighbours) and the fill-in edges
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn eliminate(&mut self, graph: &mut UndirectedGraph, id: NodeId) -> Result<(NodeSet, Vec<Edge>)> {
        let clique = graph.closed_neighbourhood(id)?;
        let fill_ins = self.make_clique(graph, id)?;

        let weight = domain_product(clique.iter(), &self.domain_sizes);
        if weight > self.tree_width {
            self.tree_width = weight;

            // the almost simplicial bound grew: nodes left out may now qualify
            for (&n, &category) in self.belongs.iter() {
                if category == Classification::QuasiSimplicial || category == Classification::Unclassified {
                    self.changed.insert(n);
                }
            }
        }

        self.erase_node(graph, id)?;

        trace!(node = id, clique = clique.len(), fill_ins = fill_ins.len(), "eliminated node");
        Ok((clique, fill_ins))
    }
}


pub(crate) fn check_threshold(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(JunctionError::InvalidArgument(format!("{} must be a positive number, got {}", name, value)))
    }
}


fn first(queue: &BTreeSet<Priority>, category: &str) -> Result<NodeId> {
    queue.iter()
         .next()
         .map(|&(_, id)| id)
         .ok_or_else(|| JunctionError::NotFound(format!("no {} node", category)))
}


fn pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}


fn decrement<K: Eq + std::hash::Hash>(map: &mut HashMap<K, usize>, key: &K, by: usize) {
    if let Some(count) = map.get_mut(key) {
        *count = count.saturating_sub(by);
    }
}


fn common_neighbours(graph: &UndirectedGraph, a: NodeId, b: NodeId) -> Result<Vec<NodeId>> {
    let na = graph.neighbours(a)?;
    let nb = graph.neighbours(b)?;
    Ok(na.intersection(nb).cloned().collect())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(graph: &UndirectedGraph, size: usize) -> DomainSizes {
        graph.nodes().map(|n| (n, size)).collect()
    }

    fn cycle(n: usize) -> UndirectedGraph {
        UndirectedGraph::from_edges((0..n).map(|i| (i, (i + 1) % n))).unwrap()
    }

    fn star(leaves: usize) -> UndirectedGraph {
        UndirectedGraph::from_edges((1..=leaves).map(|i| (0, i))).unwrap()
    }

    /// Recount the fill-in of every node from scratch and compare with the bookkeeping
    fn assert_consistent(set: &SimplicialSet, graph: &UndirectedGraph) {
        for node in graph.nodes() {
            let neighbours: Vec<NodeId> = graph.neighbours(node).unwrap().iter().cloned().collect();
            let missing = neighbours.iter()
                                    .tuple_combinations()
                                    .filter(|&(a, b)| ! graph.exists_edge(*a, *b))
                                    .count();
            assert_eq!(missing, set.fill_in(graph, node).unwrap(), "fill-in of node {}", node);
        }
        for edge in graph.edges() {
            let common = common_neighbours(graph, edge.first(), edge.second()).unwrap().len();
            assert_eq!(common, set.nb_adjacent_neighbours[&edge], "common neighbours of {}", edge);
        }
    }

    #[test]
    fn cycle_is_almost_simplicial() {
        let graph = cycle(4);
        let mut set = SimplicialSet::new(&graph, &sizes(&graph, 2), 10.0, 512.0).unwrap();

        for node in 0..4 {
            assert_eq!(1, set.fill_in(&graph, node).unwrap());
            assert_eq!(8.0, set.weight(&graph, node).unwrap());
            assert_eq!(Classification::AlmostSimplicial, set.classification(&graph, node).unwrap());
        }

        assert!(! set.has_simplicial_node(&graph).unwrap());
        assert_eq!(
            Err(JunctionError::NotFound(String::from("no simplicial node"))),
            set.best_simplicial_node(&graph)
        );
        assert_eq!(Ok(0), set.best_almost_simplicial_node(&graph));
        assert_eq!(vec![0, 1, 2, 3], set.almost_simplicial_nodes(&graph).unwrap());
    }

    #[test]
    fn almost_simplicial_bound() {
        // weight 8 exceeds 2 * tree width 2
        let graph = cycle(4);
        let mut set = SimplicialSet::new(&graph, &sizes(&graph, 2), 2.0, 10.0).unwrap();
        assert!(! set.has_almost_simplicial_node(&graph).unwrap());
        assert_eq!(Classification::QuasiSimplicial, set.classification(&graph, 3).unwrap());
        assert_eq!(Ok(0), set.best_quasi_simplicial_node(&graph));

        let mut set = SimplicialSet::new(&graph, &sizes(&graph, 2), 2.0, 8.0).unwrap();
        assert_eq!(Classification::Unclassified, set.classification(&graph, 3).unwrap());
        assert!(set.best_quasi_simplicial_node(&graph).is_err());
    }

    #[test]
    fn star_leaves_are_simplicial() {
        let graph = star(5);
        let mut set = SimplicialSet::new(&graph, &sizes(&graph, 2), 10.0, 512.0).unwrap();

        assert_eq!(vec![1, 2, 3, 4, 5], set.simplicial_nodes(&graph).unwrap());
        assert_eq!(Ok(1), set.best_simplicial_node(&graph));
        assert_eq!(10, set.fill_in(&graph, 0).unwrap());
        assert_eq!(64.0, set.weight(&graph, 0).unwrap());
        assert_eq!(Classification::Unclassified, set.classification(&graph, 0).unwrap());
    }

    #[test]
    fn weights_order_the_queues() {
        // a path 0 - 1 - 2 where 0 has a large domain
        let graph = UndirectedGraph::from_edges(vec![(0, 1), (1, 2)]).unwrap();
        let ds: DomainSizes = vec![(0, 10), (1, 2), (2, 3)].into_iter().collect();
        let mut set = SimplicialSet::new(&graph, &ds, 10.0, 512.0).unwrap();
        assert_eq!(vec![2, 0], set.simplicial_nodes(&graph).unwrap());
        assert_eq!(Ok(2), set.best_simplicial_node(&graph));
    }

    #[test]
    fn lazy_reclassification() {
        let mut graph = cycle(4);
        let mut set = SimplicialSet::new(&graph, &sizes(&graph, 2), 10.0, 512.0).unwrap();
        set.update_all_nodes(&graph).unwrap();
        assert!((0..4).all(|n| ! set.is_changed(n)));

        // the chord 0 - 2 changes the neighbourhood of its end points and the triangles of 1, 3
        assert!(set.add_edge(&mut graph, 0, 2).unwrap());
        assert!(! set.add_edge(&mut graph, 2, 0).unwrap());
        assert!((0..4).all(|n| set.is_changed(n)));
        assert_consistent(&set, &graph);

        assert!(set.is_simplicial(&graph, 1).unwrap());
        assert!(! set.is_changed(1));
        assert!(set.is_changed(3));
        assert_eq!(vec![1, 3], set.simplicial_nodes(&graph).unwrap());

        set.erase_edge(&mut graph, 0, 2).unwrap();
        assert_consistent(&set, &graph);
        assert!(! set.has_simplicial_node(&graph).unwrap());
    }

    #[test]
    fn eliminate_adds_fill_ins() {
        let mut graph = cycle(4);
        let mut set = SimplicialSet::new(&graph, &sizes(&graph, 2), 10.0, 512.0).unwrap();

        let (clique, fill_ins) = set.eliminate(&mut graph, 0).unwrap();
        assert_eq!(vec![0, 1, 3], clique.into_iter().collect::<Vec<_>>());
        assert_eq!(vec![Edge::new(1, 3)], fill_ins);
        assert!(! graph.exists_node(0));
        assert_eq!(8.0, set.tree_width());
        assert_consistent(&set, &graph);

        // what is left is a triangle
        assert_eq!(vec![1, 2, 3], set.simplicial_nodes(&graph).unwrap());

        let (clique, fill_ins) = set.eliminate(&mut graph, 2).unwrap();
        assert_eq!(3, clique.len());
        assert!(fill_ins.is_empty());
        assert_consistent(&set, &graph);
    }

    #[test]
    fn erase_neighbours_isolates() {
        let mut graph = star(3);
        let mut set = SimplicialSet::new(&graph, &sizes(&graph, 2), 10.0, 512.0).unwrap();
        set.erase_neighbours(&mut graph, 0).unwrap();
        assert_eq!(0, graph.size_edges());
        assert!(set.is_simplicial(&graph, 0).unwrap());
        assert_consistent(&set, &graph);

        set.erase_node(&mut graph, 0).unwrap();
        assert_eq!(vec![1, 2, 3], set.simplicial_nodes(&graph).unwrap());
    }

    #[test]
    fn growing_tree_width_reopens_almost_list() {
        // 0 has a big domain: it is too heavy to be almost simplicial at first
        let mut graph = cycle(4);
        graph.add_node(4);
        graph.add_node(5);
        graph.add_edge(4, 5).unwrap();
        let mut ds = sizes(&graph, 2);
        ds.insert(4, 30);
        ds.insert(5, 3);

        let mut set = SimplicialSet::new(&graph, &ds, 0.2, 1.0).unwrap();
        // 8 > 0.2 * 30
        assert_eq!(Classification::Unclassified, set.classification(&graph, 0).unwrap());

        // eliminating 5 creates a clique of weight 90: 8 <= 0.2 * 90
        set.eliminate(&mut graph, 5).unwrap();
        assert_eq!(90.0, set.tree_width());
        assert!(set.is_changed(0));
        assert_eq!(Classification::AlmostSimplicial, set.classification(&graph, 0).unwrap());
    }

    #[test]
    fn invalid_inputs() {
        let mut graph = cycle(4);
        let ds = sizes(&graph, 2);

        assert!(SimplicialSet::new(&graph, &ds, 0.0, 512.0).is_err());
        assert!(SimplicialSet::new(&graph, &ds, 10.0, -1.0).is_err());
        assert!(SimplicialSet::new(&graph, &ds, std::f64::NAN, 1.0).is_err());
        assert!(SimplicialSet::new(&graph, &DomainSizes::new(), 10.0, 1.0).is_err());

        let mut set = SimplicialSet::new(&graph, &ds, 10.0, 512.0).unwrap();
        assert_eq!(Err(JunctionError::InvalidNode(7)), set.is_simplicial(&graph, 7));
        assert_eq!(Err(JunctionError::InvalidNode(7)), set.eliminate(&mut graph, 7).map(|_| ()));
        assert_eq!(Err(JunctionError::InvalidEdge(0, 2)), set.erase_edge(&mut graph, 0, 2));
    }

    #[test]
    fn empty_graph() {
        let graph = UndirectedGraph::new();
        let mut set = SimplicialSet::new(&graph, &DomainSizes::new(), 10.0, 512.0).unwrap();
        assert!(! set.has_simplicial_node(&graph).unwrap());
        assert!(set.best_simplicial_node(&graph).is_err());
        assert!(set.best_almost_simplicial_node(&graph).is_err());
        assert!(set.best_quasi_simplicial_node(&graph).is_err());
        assert_eq!(1.0, set.tree_width());
    }
}
