//! Graph primitives shared by the triangulation: node identifiers, edges, domain sizes, the
//! undirected (moral / triangulated) graph and the clique graph used for junction trees.

mod clique_graph;
mod undirected;

pub use self::clique_graph::{CliqueGraph, CliqueId, JunctionTree};
pub use self::undirected::UndirectedGraph;

use crate::util::{JunctionError, Result};

use indexmap::IndexMap;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Identifier of a node (a random variable) of a graph.
pub type NodeId = usize;

/// An ordered set of `NodeId`s. Ordered so that every iteration over a set is deterministic.
pub type NodeSet = BTreeSet<NodeId>;

/// The number of values (the cardinality) of the variable behind each node.
pub type DomainSizes = HashMap<NodeId, usize>;


/// An undirected edge. The end points are normalised so that `first() <= second()`, hence
/// `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    first: NodeId,
    second: NodeId
}

impl Edge {

    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Edge { first: a, second: b }
        } else {
            Edge { first: b, second: a }
        }
    }

    /// The smallest end point
    pub fn first(&self) -> NodeId {
        self.first
    }

    /// The largest end point
    pub fn second(&self) -> NodeId {
        self.second
    }

    /// Given one end point of the edge, get the other one
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.first {
            Some(self.second)
        } else if node == self.second {
            Some(self.first)
        } else {
            None
        }
    }

    /// Check if `node` is one of the end points
    pub fn touches(&self, node: NodeId) -> bool {
        self.first == node || self.second == node
    }
}

impl fmt::Display for Edge {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }

}


/// Verify that every node of `graph` has a domain size and that the domain size is positive.
///
/// # Errors
/// * `JunctionError::InvalidArgument` if a node has no domain size
/// * `JunctionError::OutOfBounds` if a node has a domain size of 0
pub fn check_domain_sizes(graph: &UndirectedGraph, domain_sizes: &DomainSizes) -> Result<()> {
    for node in graph.nodes() {
        match domain_sizes.get(&node) {
            None => {
                return Err(JunctionError::InvalidArgument(format!("no domain size for node {}", node)));
            },
            Some(0) => {
                return Err(JunctionError::OutOfBounds(format!("domain size of node {} must be positive", node)));
            },
            Some(_) => ()
        }
    }

    Ok(())
}


/// Product of the domain sizes of `nodes`, i.e. the number of entries of a potential over them.
///
/// The product is computed in floating point: it is exact as long as it stays below 2^53 and
/// saturates to infinity instead of overflowing. Nodes without a domain size count as 1.
pub fn domain_product<'a, I>(nodes: I, domain_sizes: &DomainSizes) -> f64
    where I: IntoIterator<Item = &'a NodeId>
{
    nodes.into_iter()
         .map(|n| domain_sizes.get(n).cloned().unwrap_or(1) as f64)
         .product()
}


/// Build the moral graph of a directed acyclic graph given as a parent map.
///
/// Every node is linked to its parents and the parents of a common child are linked together.
///
/// # Args
/// * `parents`: for each node of the DAG, the set of its parents. Every parent must itself be a
///   key of the map.
///
/// # Errors
/// * `JunctionError::InvalidNode` if a parent is not a node of the map
/// * `JunctionError::InvalidEdge` if a node is its own parent
pub fn moral_graph(parents: &IndexMap<NodeId, NodeSet>) -> Result<UndirectedGraph> {
    let mut graph = UndirectedGraph::with_nodes(parents.keys().cloned());

    for (&child, pas) in parents.iter() {
        if let Some(&missing) = pas.iter().find(|p| ! parents.contains_key(*p)) {
            return Err(JunctionError::InvalidNode(missing));
        }

        for &p in pas.iter() {
            graph.add_edge(p, child)?;
        }

        // marry the parents
        let pas: Vec<NodeId> = pas.iter().cloned().collect();
        for i in 0..pas.len() {
            for j in (i + 1)..pas.len() {
                graph.add_edge(pas[i], pas[j])?;
            }
        }
    }

    Ok(graph)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_is_normalised() {
        let e = Edge::new(5, 2);
        assert_eq!(2, e.first());
        assert_eq!(5, e.second());
        assert_eq!(Edge::new(2, 5), e);
        assert_eq!(Some(2), e.other(5));
        assert_eq!(None, e.other(3));
        assert_eq!("2-5", e.to_string());
    }

    #[test]
    /// The student network from Koller & Friedman: D, I -> G; I -> S; G -> L
    fn student_moral_graph() {
        let (d, i, g, s, l) = (0, 1, 2, 3, 4);
        let mut parents = IndexMap::new();
        parents.insert(d, NodeSet::new());
        parents.insert(i, NodeSet::new());
        parents.insert(g, vec![d, i].into_iter().collect());
        parents.insert(s, vec![i].into_iter().collect());
        parents.insert(l, vec![g].into_iter().collect());

        let moral = moral_graph(&parents).unwrap();
        assert_eq!(5, moral.size());
        assert_eq!(5, moral.size_edges());

        // the parents of G get married
        assert!(moral.exists_edge(d, i));
        assert!(moral.exists_edge(g, d));
        assert!(moral.exists_edge(l, g));
        assert!(! moral.exists_edge(s, g));
    }

    #[test]
    fn moral_graph_missing_parent() {
        let mut parents = IndexMap::new();
        parents.insert(0, vec![7].into_iter().collect());
        assert_eq!(Err(JunctionError::InvalidNode(7)), moral_graph(&parents).map(|_| ()));
    }

    #[test]
    fn domain_size_checks() {
        let graph = UndirectedGraph::from_edges(vec![(0, 1), (1, 2)]).unwrap();

        let mut sizes: DomainSizes = vec![(0, 2), (1, 3)].into_iter().collect();
        assert!(match check_domain_sizes(&graph, &sizes) {
            Err(JunctionError::InvalidArgument(_)) => true,
            _ => false
        });

        sizes.insert(2, 0);
        assert!(match check_domain_sizes(&graph, &sizes) {
            Err(JunctionError::OutOfBounds(_)) => true,
            _ => false
        });

        sizes.insert(2, 4);
        assert!(check_domain_sizes(&graph, &sizes).is_ok());
        assert_eq!(24.0, domain_product(graph.node_set().iter(), &sizes));
    }
}
