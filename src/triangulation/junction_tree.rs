//! Assembly of the elimination cliques into a junction tree.

use crate::graph::{CliqueGraph, CliqueId, JunctionTree, NodeId, NodeSet};
use crate::util::{JunctionError, Result};

use indexmap::IndexMap;
use tracing::trace;

/// Build the elimination tree of an elimination sequence.
///
/// Clique `i` is the elimination clique of the `i`-th eliminated node. It is linked to the clique
/// of the earliest eliminated node among its other members. Nodes whose clique is only
/// themselves start a new tree.
///
/// # Args
/// * `eliminations`: the eliminated nodes in elimination order, with their elimination cliques
///
/// # Errors
/// * `JunctionError::InvalidArgument` if a clique contains a node eliminated before the node it
///   was created for, or a node that was never eliminated
pub fn elimination_tree(eliminations: &IndexMap<NodeId, NodeSet>) -> Result<CliqueGraph> {
    let mut tree = CliqueGraph::new();
    for (i, clique) in eliminations.values().enumerate() {
        tree.add_clique_with_id(i, clique.clone())?;
    }

    for (i, (node, clique)) in eliminations.iter().enumerate() {
        let mut parent = None;
        for member in clique.iter().filter(|&m| m != node) {
            match eliminations.get_index_of(member) {
                Some(rank) if rank > i => {
                    parent = Some(parent.map_or(rank, |p: usize| p.min(rank)));
                }
                _ => {
                    return Err(JunctionError::InvalidArgument(
                        format!("the clique of node {} holds node {} which is not eliminated after it", node, member)));
                }
            }
        }

        if let Some(parent) = parent {
            tree.add_edge(i, parent)?;
        }
    }

    Ok(tree)
}


/// A `JunctionTreeStrategy` turns the elimination cliques of a triangulation into a junction
/// tree.
pub trait JunctionTreeStrategy {

    /// Build the junction tree.
    ///
    /// # Args
    /// * `eliminations`: the eliminated nodes in elimination order, with their elimination cliques
    /// * `elimination_tree`: the elimination tree built from `eliminations`
    ///
    /// # Returns
    /// the junction tree, and for every node the id of the junction tree clique which holds its
    /// elimination clique
    fn junction_tree(
        &self,
        eliminations: &IndexMap<NodeId, NodeSet>,
        elimination_tree: &CliqueGraph
    ) -> Result<(JunctionTree, IndexMap<NodeId, CliqueId>)>;

}


/// Builds the junction tree from the elimination tree by absorbing every clique that is a subset
/// of a neighbour into that neighbour.
///
/// In elimination order, the clique holding the elimination clique of each node absorbs the
/// clique holding its parent when the latter is a subset of the former: the neighbours of the
/// parent are moved to the absorbing clique and the parent is erased. The surviving cliques keep
/// their elimination tree ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultJunctionTree;


impl DefaultJunctionTree {

    pub fn new() -> Self {
        DefaultJunctionTree
    }

}


impl JunctionTreeStrategy for DefaultJunctionTree {

    fn junction_tree(
        &self,
        eliminations: &IndexMap<NodeId, NodeSet>,
        elimination_tree: &CliqueGraph
    ) -> Result<(JunctionTree, IndexMap<NodeId, CliqueId>)> {
        let mut tree = elimination_tree.clone();
        let mut owner: Vec<CliqueId> = (0..eliminations.len()).collect();

        for i in 0..eliminations.len() {
            // the parent is the only neighbour with a larger id
            let parent = match elimination_tree.neighbours(i)?.range((i + 1)..).next() {
                Some(&p) => p,
                None => continue
            };

            let holder = find(&mut owner, i);
            let target = find(&mut owner, parent);
            if holder == target || ! tree.clique(target)?.is_subset(tree.clique(holder)?) {
                continue;
            }

            let moved: Vec<CliqueId> = tree.neighbours(target)?
                                           .iter()
                                           .cloned()
                                           .filter(|&c| c != holder)
                                           .collect();
            for c in moved {
                tree.add_edge(holder, c)?;
            }
            tree.erase_clique(target)?;
            owner[target] = holder;
            trace!(absorbed = target, into = holder, "clique absorbed");
        }

        let mut created = IndexMap::with_capacity(eliminations.len());
        for (i, &node) in eliminations.keys().enumerate() {
            created.insert(node, find(&mut owner, i));
        }

        Ok((tree, created))
    }

}


fn find(owner: &mut [CliqueId], id: CliqueId) -> CliqueId {
    let mut root = id;
    while owner[root] != root {
        root = owner[root];
    }

    let mut current = id;
    while owner[current] != root {
        let next = owner[current];
        owner[current] = root;
        current = next;
    }
    root
}
