//! Defines a `CliqueGraph`: an undirected graph whose nodes are cliques (sets of variables) and
//! whose edges carry separators. Junction trees and binary join trees are clique graphs.

use super::{Edge, NodeId, NodeSet, UndirectedGraph};
use crate::util::{JunctionError, Result};

use std::collections::{BTreeMap, HashMap, VecDeque};

/// Identifier of a clique in a `CliqueGraph`
pub type CliqueId = usize;

/// A junction tree is a `CliqueGraph` which is a forest satisfying the running intersection
/// property. See `CliqueGraph::is_join_tree`.
pub type JunctionTree = CliqueGraph;


/// A graph of cliques.
///
/// # Representation
/// The topology is held by an `UndirectedGraph` over clique ids. Each clique id maps to the set
/// of variables of the clique, and each edge maps to its separator, the intersection of the
/// cliques at its end points. Separators are stored and kept in sync whenever a clique changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CliqueGraph {

    /// The links between cliques
    graph: UndirectedGraph,

    /// The variables of every clique
    cliques: BTreeMap<CliqueId, NodeSet>,

    /// The separator of every edge
    separators: BTreeMap<Edge, NodeSet>

}


impl CliqueGraph {

    /// Construct an empty `CliqueGraph`
    pub fn new() -> Self {
        CliqueGraph {
            graph: UndirectedGraph::new(),
            cliques: BTreeMap::new(),
            separators: BTreeMap::new()
        }
    }


    /// Add a new clique, with a fresh id.
    ///
    /// # Returns
    /// the id of the new clique, greater than every id in use
    pub fn add_clique(&mut self, nodes: NodeSet) -> CliqueId {
        let id = self.graph.next_node_id();
        self.graph.add_node(id);
        self.cliques.insert(id, nodes);
        id
    }


    /// Add a new clique with a given id.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the id is already in use
    pub fn add_clique_with_id(&mut self, id: CliqueId, nodes: NodeSet) -> Result<()> {
        if ! self.graph.add_node(id) {
            return Err(JunctionError::InvalidNode(id));
        }
        self.cliques.insert(id, nodes);
        Ok(())
    }


    /// Remove a clique and all its incident edges.
    ///
    /// # Returns
    /// the variables of the removed clique
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the clique does not exist
    pub fn erase_clique(&mut self, id: CliqueId) -> Result<NodeSet> {
        let neighbours = self.graph.erase_node(id)?;
        for n in neighbours {
            self.separators.remove(&Edge::new(id, n));
        }
        self.cliques.remove(&id).ok_or(JunctionError::InvalidNode(id))
    }


    /// Check if the clique belongs to the graph
    pub fn exists_clique(&self, id: CliqueId) -> bool {
        self.cliques.contains_key(&id)
    }


    /// Get the variables of a clique.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the clique does not exist
    pub fn clique(&self, id: CliqueId) -> Result<&NodeSet> {
        self.cliques.get(&id).ok_or(JunctionError::InvalidNode(id))
    }


    /// Replace the variables of a clique. The separators of its edges are recomputed.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the clique does not exist
    pub fn set_clique(&mut self, id: CliqueId, nodes: NodeSet) -> Result<()> {
        match self.cliques.get_mut(&id) {
            Some(clique) => *clique = nodes,
            None => return Err(JunctionError::InvalidNode(id))
        }
        self.update_separators(id)
    }


    /// Add a variable to a clique
    pub fn add_to_clique(&mut self, id: CliqueId, node: NodeId) -> Result<()> {
        let mut nodes = self.clique(id)?.clone();
        if nodes.insert(node) {
            self.set_clique(id, nodes)?;
        }
        Ok(())
    }


    /// Remove a variable from a clique
    pub fn erase_from_clique(&mut self, id: CliqueId, node: NodeId) -> Result<()> {
        let mut nodes = self.clique(id)?.clone();
        if nodes.remove(&node) {
            self.set_clique(id, nodes)?;
        }
        Ok(())
    }


    fn update_separators(&mut self, id: CliqueId) -> Result<()> {
        let neighbours: Vec<CliqueId> = self.graph.neighbours(id)?.iter().cloned().collect();
        for n in neighbours {
            let separator = self.intersection(id, n)?;
            self.separators.insert(Edge::new(id, n), separator);
        }
        Ok(())
    }


    fn intersection(&self, a: CliqueId, b: CliqueId) -> Result<NodeSet> {
        let ca = self.clique(a)?;
        let cb = self.clique(b)?;
        Ok(ca.intersection(cb).cloned().collect())
    }


    /// Link two cliques. The separator of the new edge is the intersection of the cliques.
    ///
    /// # Returns
    /// `true` if the edge was not already in the graph
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if one of the cliques does not exist
    /// * `JunctionError::InvalidEdge` if `a == b`
    pub fn add_edge(&mut self, a: CliqueId, b: CliqueId) -> Result<bool> {
        let inserted = self.graph.add_edge(a, b)?;
        if inserted {
            let separator = self.intersection(a, b)?;
            self.separators.insert(Edge::new(a, b), separator);
        }
        Ok(inserted)
    }


    /// Remove the edge between two cliques.
    ///
    /// # Errors
    /// * `JunctionError::InvalidEdge` if the edge does not exist
    pub fn erase_edge(&mut self, a: CliqueId, b: CliqueId) -> Result<()> {
        self.graph.erase_edge(a, b)?;
        self.separators.remove(&Edge::new(a, b));
        Ok(())
    }


    pub fn exists_edge(&self, a: CliqueId, b: CliqueId) -> bool {
        self.graph.exists_edge(a, b)
    }


    /// Get the separator of the edge `a - b`.
    ///
    /// # Errors
    /// * `JunctionError::InvalidEdge` if the edge does not exist
    pub fn separator(&self, a: CliqueId, b: CliqueId) -> Result<&NodeSet> {
        self.separators.get(&Edge::new(a, b)).ok_or(JunctionError::InvalidEdge(a, b))
    }


    /// Get the cliques adjacent to a clique.
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if the clique does not exist
    pub fn neighbours(&self, id: CliqueId) -> Result<&NodeSet> {
        self.graph.neighbours(id)
    }


    /// Iterate over the cliques and their variables, by increasing id
    pub fn cliques<'a>(&'a self) -> impl Iterator<Item = (CliqueId, &'a NodeSet)> + 'a {
        self.cliques.iter().map(|(&id, nodes)| (id, nodes))
    }


    /// Iterate over the clique ids, in increasing order
    pub fn clique_ids<'a>(&'a self) -> impl Iterator<Item = CliqueId> + 'a {
        self.cliques.keys().cloned()
    }


    /// Iterate over the edges and their separators
    pub fn separators<'a>(&'a self) -> impl Iterator<Item = (Edge, &'a NodeSet)> + 'a {
        self.separators.iter().map(|(&e, s)| (e, s))
    }


    /// Iterate over the edges, in increasing order
    pub fn edges<'a>(&'a self) -> impl Iterator<Item = Edge> + 'a {
        self.graph.edges()
    }


    /// The links between the cliques, as an undirected graph over clique ids
    pub fn topology(&self) -> &UndirectedGraph {
        &self.graph
    }


    /// The number of cliques
    pub fn size(&self) -> usize {
        self.cliques.len()
    }


    /// The number of edges
    pub fn size_edges(&self) -> usize {
        self.graph.size_edges()
    }


    pub fn is_empty(&self) -> bool {
        self.cliques.is_empty()
    }


    /// The union of the variables of all cliques
    pub fn variables(&self) -> NodeSet {
        self.cliques.values().flat_map(|c| c.iter().cloned()).collect()
    }


    /// Get the clique with the smallest id containing a variable.
    ///
    /// # Errors
    /// * `JunctionError::NotFound` if no clique contains the variable
    pub fn container(&self, node: NodeId) -> Result<CliqueId> {
        self.cliques
            .iter()
            .find(|(_, c)| c.contains(&node))
            .map(|(&id, _)| id)
            .ok_or_else(|| JunctionError::NotFound(format!("no clique contains node {}", node)))
    }


    /// Get the clique with the smallest id whose variables are a superset of `nodes`
    pub fn container_of(&self, nodes: &NodeSet) -> Option<CliqueId> {
        self.cliques
            .iter()
            .find(|(_, c)| nodes.is_subset(c))
            .map(|(&id, _)| id)
    }


    /// Compute the connected components, as sets of clique ids
    pub fn connected_components(&self) -> Vec<NodeSet> {
        self.graph.connected_components()
    }


    /// Find the path from clique `from` to clique `to`, both included.
    ///
    /// # Returns
    /// the path (the shortest one if the graph is not a tree), or `None` if the cliques are not
    /// connected
    ///
    /// # Errors
    /// * `JunctionError::InvalidNode` if one of the cliques does not exist
    pub fn path(&self, from: CliqueId, to: CliqueId) -> Result<Option<Vec<CliqueId>>> {
        if ! self.exists_clique(from) {
            return Err(JunctionError::InvalidNode(from));
        }
        if ! self.exists_clique(to) {
            return Err(JunctionError::InvalidNode(to));
        }

        let mut predecessor: HashMap<CliqueId, CliqueId> = HashMap::new();
        let mut queue = VecDeque::new();
        predecessor.insert(from, from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut node = to;
                while node != from {
                    node = predecessor[&node];
                    path.push(node);
                }
                path.reverse();
                return Ok(Some(path));
            }

            for &n in self.graph.neighbours(current)?.iter() {
                if ! predecessor.contains_key(&n) {
                    predecessor.insert(n, current);
                    queue.push_back(n);
                }
            }
        }

        Ok(None)
    }


    /// Check if the graph has no cycle
    pub fn is_forest(&self) -> bool {
        self.size_edges() + self.connected_components().len() == self.size()
    }


    /// Check the running intersection property: for every variable, the cliques containing it
    /// induce a connected subgraph. On a forest this is equivalent to requiring that every clique
    /// on the path between two cliques containing a variable also contains it.
    pub fn has_running_intersection(&self) -> bool {
        let mut holders: BTreeMap<NodeId, Vec<CliqueId>> = BTreeMap::new();
        for (&id, clique) in self.cliques.iter() {
            for &node in clique.iter() {
                holders.entry(node).or_insert_with(Vec::new).push(id);
            }
        }

        for (node, ids) in holders.iter() {
            let mut seen = NodeSet::new();
            let mut stack = vec![ids[0]];
            seen.insert(ids[0]);
            while let Some(current) = stack.pop() {
                for &n in self.graph.neighbours(current).into_iter().flat_map(|s| s.iter()) {
                    if ! seen.contains(&n) && self.cliques[&n].contains(node) {
                        seen.insert(n);
                        stack.push(n);
                    }
                }
            }

            if seen.len() != ids.len() {
                return false;
            }
        }

        true
    }


    /// Check if the graph is a junction tree (a forest with the running intersection property)
    pub fn is_join_tree(&self) -> bool {
        self.is_forest() && self.has_running_intersection()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn set(nodes: &[NodeId]) -> NodeSet {
        nodes.iter().cloned().collect()
    }

    /// {0,1,2} - {1,2,3} - {3,4}
    fn chain() -> CliqueGraph {
        let mut jt = CliqueGraph::new();
        let a = jt.add_clique(set(&[0, 1, 2]));
        let b = jt.add_clique(set(&[1, 2, 3]));
        let c = jt.add_clique(set(&[3, 4]));
        jt.add_edge(a, b).unwrap();
        jt.add_edge(b, c).unwrap();
        jt
    }

    #[test]
    fn separators() {
        let mut jt = chain();
        assert_eq!(&set(&[1, 2]), jt.separator(0, 1).unwrap());
        assert_eq!(&set(&[3]), jt.separator(2, 1).unwrap());
        assert_eq!(Err(JunctionError::InvalidEdge(0, 2)), jt.separator(0, 2).map(|_| ()));

        // separators follow the cliques
        jt.add_to_clique(2, 2).unwrap();
        assert_eq!(&set(&[2, 3]), jt.separator(1, 2).unwrap());
        jt.erase_from_clique(1, 1).unwrap();
        assert_eq!(&set(&[2]), jt.separator(0, 1).unwrap());

        jt.erase_clique(1).unwrap();
        assert_eq!(0, jt.separators().count());
        assert_eq!(2, jt.size());
    }

    #[test]
    fn ids() {
        let mut jt = chain();
        assert_eq!(3, jt.add_clique(set(&[7])));
        assert_eq!(Err(JunctionError::InvalidNode(1)), jt.add_clique_with_id(1, set(&[9])));
        jt.add_clique_with_id(10, set(&[9])).unwrap();
        assert_eq!(11, jt.add_clique(NodeSet::new()));
    }

    #[test]
    fn containers() {
        let jt = chain();
        assert_eq!(Ok(0), jt.container(1));
        assert_eq!(Ok(2), jt.container(4));
        assert!(jt.container(8).is_err());
        assert_eq!(Some(1), jt.container_of(&set(&[2, 3])));
        assert_eq!(None, jt.container_of(&set(&[0, 4])));
        assert_eq!(set(&[0, 1, 2, 3, 4]), jt.variables());
    }

    #[test]
    fn paths() {
        let mut jt = chain();
        assert_eq!(Some(vec![0, 1, 2]), jt.path(0, 2).unwrap());
        assert_eq!(Some(vec![1]), jt.path(1, 1).unwrap());

        let lonely = jt.add_clique(set(&[5]));
        assert_eq!(None, jt.path(0, lonely).unwrap());
        assert_eq!(Err(JunctionError::InvalidNode(42)), jt.path(0, 42));
    }

    #[test]
    fn running_intersection() {
        let mut jt = chain();
        assert!(jt.is_forest());
        assert!(jt.has_running_intersection());
        assert!(jt.is_join_tree());

        // 0 is in both ends of the chain but not in the middle
        jt.add_to_clique(2, 0).unwrap();
        assert!(! jt.has_running_intersection());
        jt.add_to_clique(1, 0).unwrap();
        assert!(jt.has_running_intersection());

        // close a cycle
        jt.add_edge(0, 2).unwrap();
        assert!(! jt.is_forest());
        assert!(! jt.is_join_tree());
    }

    #[test]
    fn forest_components() {
        let mut jt = chain();
        jt.add_clique(set(&[5, 6]));
        assert_eq!(2, jt.connected_components().len());
        assert!(jt.is_join_tree());
    }
}
