//! Conversion of junction trees into binary join trees, whose cliques have at most two children.
//!
//! Message passing over a binary join tree only ever combines two incoming messages at a time.
//! A clique with more than two children gets a cascade of synthetic cliques: each synthetic
//! clique stands between the clique and two of its former children, and its variables are the
//! union of their two separators with the clique, so no variable shared along a path is lost.

use crate::graph::{check_domain_sizes, domain_product, CliqueGraph, CliqueId, DomainSizes, NodeSet, UndirectedGraph};
use crate::util::{JunctionError, Result};

use itertools::Itertools;
use ordered_float::OrderedFloat;
use tracing::{debug, trace};

/// A `BinaryJoinTreeConverter` binarizes junction trees.
pub trait BinaryJoinTreeConverter {

    /// Build a binary join tree from a junction tree.
    ///
    /// # Args
    /// * `tree`: the junction tree (or forest) to convert. It is not modified.
    /// * `domain_sizes`: the domain size of every variable of the tree
    /// * `roots`: at most one root clique per connected component. Components without a root are
    ///   rooted at their smallest clique id.
    ///
    /// # Returns
    /// a new clique graph in which every clique has at most two children with respect to the
    /// roots actually used (see `roots`). Cliques of `tree` keep their ids and variables.
    ///
    /// # Errors
    /// * `JunctionError::InvalidArgument` if `tree` is not a forest or a domain size is missing
    /// * `JunctionError::OutOfBounds` if a domain size is 0
    /// * `JunctionError::InvalidNode` if a root is not a clique of `tree` or if two roots belong
    ///   to the same connected component
    fn convert(&mut self, tree: &CliqueGraph, domain_sizes: &DomainSizes, roots: &NodeSet) -> Result<CliqueGraph>;

    /// The roots used by the last conversion, one per connected component
    fn roots(&self) -> &NodeSet;

}


/// Greedy binarization: the two children combined first are those whose merged separators have
/// the smallest domain, ties going to the pair that comes first in the children's order.
#[derive(Clone, Debug, Default)]
pub struct DefaultBinaryJoinTreeConverter {

    /// The roots of the last conversion
    roots: NodeSet

}


impl DefaultBinaryJoinTreeConverter {

    pub fn new() -> Self {
        DefaultBinaryJoinTreeConverter { roots: NodeSet::new() }
    }


    /// Pick the root of every connected component of `tree`
    fn select_roots(tree: &CliqueGraph, roots: &NodeSet) -> Result<NodeSet> {
        if let Some(&missing) = roots.iter().find(|&&r| ! tree.exists_clique(r)) {
            return Err(JunctionError::InvalidNode(missing));
        }

        let mut selected = NodeSet::new();
        for component in tree.connected_components() {
            let mut supplied = component.intersection(roots).cloned();
            match (supplied.next(), supplied.next()) {
                (_, Some(extra)) => return Err(JunctionError::InvalidNode(extra)),
                (Some(root), None) => { selected.insert(root); },
                (None, None) => {
                    if let Some(&root) = component.iter().next() {
                        selected.insert(root);
                    }
                }
            }
        }
        Ok(selected)
    }


    /// Reduce the children of `clique` to at most two.
    ///
    /// # Returns
    /// the number of synthetic cliques created
    fn binarize_clique(
        tree: &mut CliqueGraph,
        clique: CliqueId,
        from: Option<CliqueId>,
        domain_sizes: &DomainSizes
    ) -> Result<usize> {
        // every slot is a subtree hanging from `clique`, with the variables it shares with it
        let mut slots: Vec<(CliqueId, NodeSet)> = Vec::new();
        for &child in tree.neighbours(clique)?.iter().filter(|&&c| Some(c) != from) {
            slots.push((child, tree.separator(clique, child)?.clone()));
        }

        let mut created = 0;
        while slots.len() > 2 {
            let (i, j, scope) = slots.iter()
                                     .enumerate()
                                     .tuple_combinations()
                                     .map(|((i, (_, a)), (j, (_, b)))| (i, j, a | b))
                                     .min_by_key(|(i, j, scope)| (OrderedFloat(domain_product(scope, domain_sizes)), *i, *j))
                                     .ok_or_else(|| JunctionError::NotFound(String::from("no pair of children to combine")))?;

            let (second, _) = slots.remove(j);
            let (first, _) = slots[i].clone();

            let synthetic = tree.add_clique(scope.clone());
            tree.erase_edge(clique, first)?;
            tree.erase_edge(clique, second)?;
            tree.add_edge(synthetic, first)?;
            tree.add_edge(synthetic, second)?;
            tree.add_edge(clique, synthetic)?;
            trace!(clique, synthetic, first, second, size = scope.len(), "synthetic clique");

            slots[i] = (synthetic, scope);
            created += 1;
        }

        Ok(created)
    }

}


impl BinaryJoinTreeConverter for DefaultBinaryJoinTreeConverter {

    fn convert(&mut self, tree: &CliqueGraph, domain_sizes: &DomainSizes, roots: &NodeSet) -> Result<CliqueGraph> {
        if ! tree.is_forest() {
            return Err(JunctionError::InvalidArgument(String::from("a binary join tree can only be built from a forest")));
        }
        check_domain_sizes(&UndirectedGraph::with_nodes(tree.variables()), domain_sizes)?;

        let selected = Self::select_roots(tree, roots)?;
        let mut binary = tree.clone();
        let mut synthetic = 0;

        for &root in selected.iter() {
            let mut stack: Vec<(CliqueId, Option<CliqueId>)> = vec![(root, None)];
            while let Some((clique, from)) = stack.pop() {
                synthetic += Self::binarize_clique(&mut binary, clique, from, domain_sizes)?;

                for &child in binary.neighbours(clique)?.iter().filter(|&&c| Some(c) != from) {
                    stack.push((child, Some(clique)));
                }
            }
        }

        debug!(cliques = tree.size(), synthetic, roots = selected.len(), "binary join tree");
        self.roots = selected;
        Ok(binary)
    }


    fn roots(&self) -> &NodeSet {
        &self.roots
    }

}
