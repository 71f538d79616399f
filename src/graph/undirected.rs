//! Defines an `UndirectedGraph`, the structure the triangulation works on: the moral graph given
//! as input, the working copy mutated by the elimination and the resulting triangulated graph.

use super::{Edge, NodeId, NodeSet};
use crate::util::{JunctionError, Result};

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A simple undirected graph (no self loops, no parallel edges).
///
/// # Representation
/// Adjacency sets keyed by node. Both maps are ordered so that iterating over nodes, neighbours
/// and edges is deterministic, which the elimination heuristics rely on for their tie-breaking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndirectedGraph {

    /// The neighbours of every node
    adjacency: BTreeMap<NodeId, NodeSet>,

    /// The number of edges
    edge_count: usize

}


impl UndirectedGraph {

    /// Construct an empty `UndirectedGraph`
    pub fn new() -> Self {
        UndirectedGraph { adjacency: BTreeMap::new(), edge_count: 0 }
    }


    /// Construct an `UndirectedGraph` with the given nodes and no edges
    pub fn with_nodes<I>(nodes: I) -> Self
        where I: IntoIterator<Item = NodeId>
    {
        let adjacency = nodes.into_iter().map(|n| (n, NodeSet::new())).collect();
        UndirectedGraph { adjacency, edge_count: 0 }
    }


    /// Construct an `UndirectedGraph` from a list of edges. The end points of the edges are
    /// added as nodes.
    ///
    /// # Errors
    /// * `JunctionError::InvalidEdge` if one of the edges is a self loop
    pub fn from_edges<I>(edges: I) -> Result<Self>
        where I: IntoIterator<Item = (NodeId, NodeId)>
    {
        let mut graph = UndirectedGraph::new();
        for (a, b) in edges {
            graph.add_node(a);
            graph.add_node(b);
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }


    /// Add a node to the graph.
    ///
    /// # Returns
    /// `true` if the node was not already in the graph
    pub fn add_node(&mut self, id: NodeId) -> bool {
        if self.adjacency.contains_key(&id) {
            return false;
        }
        self.adjacency.insert(id, NodeSet::new());
        true
    }


    /// The smallest id greater than every node of the graph
    pub fn next_node_id(&self) -> NodeId {
        self.adjacency.keys().next_back().map_or(0, |&n| n + 1)
    }


    /// Remove a node and all its incident edges.
    ///
    /// # Returns
    /// the former neighbours of the node
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn erase_node(&mut self, id: NodeId) -> Result<NodeSet> {
        let neighbours = self.adjacency.remove(&id).ok_or(JunctionError::InvalidNode(id))?;
        for n in neighbours.iter() {
            if let Some(adj) = self.adjacency.get_mut(n) {
                adj.remove(&id);
            }
        }
        self.edge_count -= neighbours.len();
        Ok(neighbours)
    }


    /// Check if the node belongs to the graph
    pub fn exists_node(&self, id: NodeId) -> bool {
        self.adjacency.contains_key(&id)
    }


    /// Add the edge `a - b`.
    ///
    /// # Returns
    /// `true` if the edge was not already in the graph
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if an end point is not in the graph
    /// * `JunctionError::InvalidEdge` if `a == b`
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        if a == b {
            return Err(JunctionError::InvalidEdge(a, b));
        }
        if ! self.exists_node(a) {
            return Err(JunctionError::InvalidNode(a));
        }
        if ! self.exists_node(b) {
            return Err(JunctionError::InvalidNode(b));
        }

        let inserted = self.adjacency.get_mut(&a).map_or(false, |adj| adj.insert(b));
        if inserted {
            if let Some(adj) = self.adjacency.get_mut(&b) {
                adj.insert(a);
            }
            self.edge_count += 1;
        }
        Ok(inserted)
    }


    /// Remove the edge `a - b`.
    ///
    /// # Errors
    /// * `JunctionError::InvalidEdge` if the edge is not in the graph
    pub fn erase_edge(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        if ! self.exists_edge(a, b) {
            return Err(JunctionError::InvalidEdge(a, b));
        }

        if let Some(adj) = self.adjacency.get_mut(&a) {
            adj.remove(&b);
        }
        if let Some(adj) = self.adjacency.get_mut(&b) {
            adj.remove(&a);
        }
        self.edge_count -= 1;
        Ok(())
    }


    /// Check if the edge `a - b` belongs to the graph
    pub fn exists_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.get(&a).map_or(false, |adj| adj.contains(&b))
    }


    /// Get the neighbours of a node.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the node is not in the graph
    pub fn neighbours(&self, id: NodeId) -> Result<&NodeSet> {
        self.adjacency.get(&id).ok_or(JunctionError::InvalidNode(id))
    }


    /// Get the closed neighbourhood of a node: the node and its neighbours
    pub fn closed_neighbourhood(&self, id: NodeId) -> Result<NodeSet> {
        let mut nodes = self.neighbours(id)?.clone();
        nodes.insert(id);
        Ok(nodes)
    }


    /// Iterate over the nodes, in increasing order
    pub fn nodes<'a>(&'a self) -> impl Iterator<Item = NodeId> + 'a {
        self.adjacency.keys().cloned()
    }


    /// Get the set of nodes
    pub fn node_set(&self) -> NodeSet {
        self.adjacency.keys().cloned().collect()
    }


    /// Iterate over the edges, in increasing order
    pub fn edges<'a>(&'a self) -> impl Iterator<Item = Edge> + 'a {
        self.adjacency.iter().flat_map(|(&a, adj)| {
            adj.range((a + 1)..).map(move |&b| Edge::new(a, b))
        })
    }


    /// The number of nodes
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }


    /// The number of edges
    pub fn size_edges(&self) -> usize {
        self.edge_count
    }


    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }


    /// Check if `nodes` are pairwise adjacent. Nodes outside of the graph are never part of a
    /// clique.
    pub fn is_clique(&self, nodes: &NodeSet) -> bool {
        nodes.iter().all(|a| {
            match self.adjacency.get(a) {
                Some(adj) => nodes.iter().all(|b| a == b || adj.contains(b)),
                None => false
            }
        })
    }


    /// Compute the connected components. Components are listed by increasing smallest node.
    pub fn connected_components(&self) -> Vec<NodeSet> {
        let mut seen = NodeSet::new();
        let mut components = Vec::new();

        for start in self.nodes() {
            if seen.contains(&start) {
                continue;
            }

            let mut component = NodeSet::new();
            let mut stack = vec![start];
            seen.insert(start);
            while let Some(node) = stack.pop() {
                component.insert(node);
                for &n in self.adjacency[&node].iter() {
                    if seen.insert(n) {
                        stack.push(n);
                    }
                }
            }
            components.push(component);
        }

        components
    }


    /// Maximum cardinality search: repeatedly visit the unvisited node with the largest number of
    /// visited neighbours (ties: smallest id).
    ///
    /// # Returns
    /// the nodes in visiting order. For a chordal graph, the reverse of this order is a perfect
    /// elimination ordering.
    pub fn maximum_cardinality_search(&self) -> Vec<NodeId> {
        let mut counts: HashMap<NodeId, usize> = self.nodes().map(|n| (n, 0)).collect();
        let mut queue: BTreeSet<(Reverse<usize>, NodeId)> = self.nodes().map(|n| (Reverse(0), n)).collect();
        let mut order = Vec::with_capacity(self.size());

        while let Some((_, node)) = queue.pop_first() {
            counts.remove(&node);
            order.push(node);

            for n in self.adjacency[&node].iter() {
                if let Some(c) = counts.get_mut(n) {
                    queue.remove(&(Reverse(*c), *n));
                    *c += 1;
                    queue.insert((Reverse(*c), *n));
                }
            }
        }

        order
    }


    /// Check if every cycle of length at least 4 has a chord.
    ///
    /// Verifies that the reverse maximum cardinality search order is a perfect elimination
    /// ordering (Tarjan & Yannakakis).
    pub fn is_chordal(&self) -> bool {
        let mut order = self.maximum_cardinality_search();
        order.reverse();
        self.is_perfect_elimination_ordering(&order)
    }


    /// Check if eliminating the nodes in `order` adds no fill-in edge, i.e. if the later
    /// neighbours of every node form a clique.
    pub fn is_perfect_elimination_ordering(&self, order: &[NodeId]) -> bool {
        if order.len() != self.size() {
            return false;
        }

        let position: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        if position.len() != order.len() {
            return false;
        }

        for (i, node) in order.iter().enumerate() {
            let later: Vec<NodeId> = match self.adjacency.get(node) {
                Some(adj) => adj.iter().cloned().filter(|n| position.get(n).map_or(false, |&p| p > i)).collect(),
                None => return false
            };

            // only the earliest later neighbour needs to be checked
            if let Some(&first) = later.iter().min_by_key(|n| position[*n]) {
                let adj = &self.adjacency[&first];
                if later.iter().any(|n| *n != first && ! adj.contains(n)) {
                    return false;
                }
            }
        }

        true
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(n: usize) -> UndirectedGraph {
        UndirectedGraph::from_edges((0..n).map(|i| (i, (i + 1) % n))).unwrap()
    }

    #[test]
    fn add_and_erase() {
        let mut graph = UndirectedGraph::with_nodes(0..4);
        assert!(graph.add_edge(0, 1).unwrap());
        assert!(! graph.add_edge(1, 0).unwrap());
        assert!(graph.add_edge(1, 2).unwrap());
        assert_eq!(2, graph.size_edges());

        assert_eq!(Err(JunctionError::InvalidNode(9)), graph.add_edge(0, 9));
        assert_eq!(Err(JunctionError::InvalidEdge(2, 2)), graph.add_edge(2, 2));
        assert_eq!(Err(JunctionError::InvalidEdge(0, 3)), graph.erase_edge(0, 3));

        let former = graph.erase_node(1).unwrap();
        assert_eq!(vec![0, 2], former.into_iter().collect::<Vec<_>>());
        assert_eq!(0, graph.size_edges());
        assert_eq!(3, graph.size());
        assert_eq!(Err(JunctionError::InvalidNode(1)), graph.neighbours(1).map(|_| ()));
        assert_eq!(4, graph.next_node_id());
    }

    #[test]
    fn edges_listed_once() {
        let graph = cycle(4);
        let edges: Vec<Edge> = graph.edges().collect();
        assert_eq!(vec![Edge::new(0, 1), Edge::new(0, 3), Edge::new(1, 2), Edge::new(2, 3)], edges);
    }

    #[test]
    fn components() {
        let mut graph = UndirectedGraph::from_edges(vec![(0, 1), (1, 2), (5, 6)]).unwrap();
        graph.add_node(9);
        let components = graph.connected_components();
        assert_eq!(3, components.len());
        assert_eq!(vec![0, 1, 2], components[0].iter().cloned().collect::<Vec<_>>());
        assert_eq!(vec![5, 6], components[1].iter().cloned().collect::<Vec<_>>());
        assert_eq!(vec![9], components[2].iter().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn chordality() {
        assert!(UndirectedGraph::new().is_chordal());
        assert!(cycle(3).is_chordal());
        assert!(! cycle(4).is_chordal());
        assert!(! cycle(7).is_chordal());

        let mut graph = cycle(4);
        graph.add_edge(0, 2).unwrap();
        assert!(graph.is_chordal());

        // a 5-cycle with a single chord still has a chordless 4-cycle
        let mut graph = cycle(5);
        graph.add_edge(0, 2).unwrap();
        assert!(! graph.is_chordal());
        graph.add_edge(0, 3).unwrap();
        assert!(graph.is_chordal());
    }

    #[test]
    fn perfect_elimination_ordering() {
        let mut graph = cycle(4);
        graph.add_edge(1, 3).unwrap();
        assert!(graph.is_perfect_elimination_ordering(&[0, 1, 2, 3]));
        assert!(! graph.is_perfect_elimination_ordering(&[1, 0, 2, 3]));
        assert!(! graph.is_perfect_elimination_ordering(&[0, 1, 2]));
    }

    #[test]
    fn cliques() {
        let mut graph = cycle(4);
        assert!(! graph.is_clique(&vec![0, 1, 2].into_iter().collect()));
        graph.add_edge(0, 2).unwrap();
        assert!(graph.is_clique(&vec![0, 1, 2].into_iter().collect()));
        assert!(graph.is_clique(&NodeSet::new()));
        assert!(! graph.is_clique(&vec![0, 42].into_iter().collect()));
    }
}
