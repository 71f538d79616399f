//! Minimal triangulation post-pass: recursive thinning of the fill-in edges.
//!
//! A fill-in edge `u - v` can be removed from a chordal graph without breaking chordality iff the
//! common neighbours of `u` and `v` form a clique (the edge then belongs to a single maximal
//! clique). Removing an edge only changes the common neighbourhoods of edges incident to `u` or
//! `v`, so only those are checked again.
//!
//! When the elimination order is constrained, a removal must also leave an elimination order
//! that respects the constraints, which is checked on the whole graph.

use crate::graph::{Edge, NodeId, NodeSet, UndirectedGraph};
use crate::util::{JunctionError, Result};

use indexmap::IndexMap;
use tracing::trace;

use std::collections::{BTreeSet, HashMap};

/// Remove from `graph` every fill-in edge that is not needed for chordality, until none can be
/// removed.
///
/// # Args
/// * `graph`: a chordal graph
/// * `fill_ins`: the edges of `graph` that may be removed. Removed edges are taken out of it.
/// * `constraints`: successive sets of nodes that an elimination order of the result must
///   respect (see `perfect_elimination_order`). A removal that leaves no such order is undone.
///
/// # Returns
/// the number of edges removed
///
/// # Errors
/// * `JunctionError::InvalidEdge` if a fill-in is not an edge of the graph
pub fn thin_fill_ins(
    graph: &mut UndirectedGraph,
    fill_ins: &mut BTreeSet<Edge>,
    constraints: Option<&[NodeSet]>
) -> Result<usize> {
    if let Some(edge) = fill_ins.iter().find(|e| ! graph.exists_edge(e.first(), e.second())) {
        return Err(JunctionError::InvalidEdge(edge.first(), edge.second()));
    }

    match constraints {
        None => thin_unconstrained(graph, fill_ins),
        Some(constraints) => thin_constrained(graph, fill_ins, constraints)
    }
}


fn thin_unconstrained(graph: &mut UndirectedGraph, fill_ins: &mut BTreeSet<Edge>) -> Result<usize> {
    let mut candidates = fill_ins.clone();
    let mut removed = 0;

    while let Some(edge) = candidates.pop_first() {
        if ! is_removable(graph, edge)? {
            continue;
        }

        graph.erase_edge(edge.first(), edge.second())?;
        fill_ins.remove(&edge);
        removed += 1;

        for other in fill_ins.iter() {
            if other.touches(edge.first()) || other.touches(edge.second()) {
                candidates.insert(*other);
            }
        }
    }

    Ok(removed)
}


fn thin_constrained(graph: &mut UndirectedGraph, fill_ins: &mut BTreeSet<Edge>, constraints: &[NodeSet]) -> Result<usize> {
    let rank: HashMap<NodeId, usize> = graph.nodes().enumerate().map(|(i, n)| (n, i)).collect();
    let group = constraint_groups(graph, constraints);
    let mut removed = 0;

    loop {
        let mut progress = false;
        for edge in fill_ins.clone() {
            if ! is_removable(graph, edge)? {
                continue;
            }

            graph.erase_edge(edge.first(), edge.second())?;
            if eliminate_simplicial(graph, &rank, &group)?.is_some() {
                fill_ins.remove(&edge);
                removed += 1;
                progress = true;
            } else {
                graph.add_edge(edge.first(), edge.second())?;
            }
        }

        if ! progress {
            return Ok(removed);
        }
    }
}


/// An edge of a chordal graph can go without breaking chordality iff the common neighbours of its
/// end points form a clique
fn is_removable(graph: &UndirectedGraph, edge: Edge) -> Result<bool> {
    let common: NodeSet = graph.neighbours(edge.first())?
                               .intersection(graph.neighbours(edge.second())?)
                               .cloned()
                               .collect();
    Ok(graph.is_clique(&common))
}


/// Compute a perfect elimination ordering of a chordal graph that stays as close as possible to
/// a preferred order: at every step, the simplicial node that comes first in `preferred` is
/// eliminated.
///
/// # Args
/// * `graph`: a chordal graph
/// * `preferred`: a permutation of the nodes of `graph`
/// * `constraints`: if given, all the nodes of a set are eliminated before any node of the
///   following sets. Nodes in no set come last.
///
/// # Errors
/// * `JunctionError::InvalidArgument` if `preferred` is not a permutation of the nodes, or if no
///   perfect elimination ordering respects the constraints (in particular if the graph is not
///   chordal)
pub fn perfect_elimination_order(
    graph: &UndirectedGraph,
    preferred: &[NodeId],
    constraints: Option<&[NodeSet]>
) -> Result<Vec<NodeId>> {
    let rank: HashMap<NodeId, usize> = preferred.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    if rank.len() != graph.size() || graph.nodes().any(|n| ! rank.contains_key(&n)) {
        return Err(JunctionError::InvalidArgument(String::from("the preferred order is not a permutation of the nodes")));
    }

    let group = constraint_groups(graph, constraints.unwrap_or(&[]));
    eliminate_simplicial(graph, &rank, &group)?.ok_or_else(|| {
        JunctionError::InvalidArgument(String::from("no perfect elimination ordering respects the constraints"))
    })
}


/// The index of the constraint set of every node of the graph, `constraints.len()` for the nodes
/// in no set
fn constraint_groups(graph: &UndirectedGraph, constraints: &[NodeSet]) -> HashMap<NodeId, usize> {
    let mut group = HashMap::with_capacity(graph.size());
    for (i, nodes) in constraints.iter().enumerate() {
        for &node in nodes.iter().filter(|&&n| graph.exists_node(n)) {
            group.entry(node).or_insert(i);
        }
    }
    for node in graph.nodes() {
        group.entry(node).or_insert(constraints.len());
    }
    group
}


/// Eliminate simplicial nodes one group after the other, by rank within a group.
///
/// # Returns
/// the elimination order, or `None` if at some point the current group has no simplicial node
fn eliminate_simplicial(
    graph: &UndirectedGraph,
    rank: &HashMap<NodeId, usize>,
    group: &HashMap<NodeId, usize>
) -> Result<Option<Vec<NodeId>>> {
    let key = |n: NodeId| (group[&n], rank[&n], n);

    let mut remaining = vec![0; group.values().cloned().max().map_or(0, |g| g + 1)];
    for &g in group.values() {
        remaining[g] += 1;
    }

    let mut working = graph.clone();
    let mut candidates: BTreeSet<(usize, usize, NodeId)> = BTreeSet::new();
    for node in working.nodes() {
        if working.is_clique(working.neighbours(node)?) {
            candidates.insert(key(node));
        }
    }

    // eliminating a simplicial node adds no edge, so simplicial nodes stay simplicial
    let mut order = Vec::with_capacity(graph.size());
    let mut current = 0;
    while let Some((g, r, node)) = candidates.pop_first() {
        while remaining[current] == 0 {
            current += 1;
        }
        if g != current {
            return Ok(None);
        }

        let neighbours = working.erase_node(node)?;
        order.push(node);
        remaining[g] -= 1;
        trace!(node, rank = r, group = g, "simplicial node eliminated");

        for n in neighbours {
            if working.is_clique(working.neighbours(n)?) {
                candidates.insert(key(n));
            }
        }
    }

    if order.len() == graph.size() {
        Ok(Some(order))
    } else {
        Ok(None)
    }
}


/// Compute the elimination clique of every node: the node and its neighbours eliminated after
/// it.
///
/// # Errors
/// * `JunctionError::InvalidNode` if a node of `order` is not in the graph
pub fn elimination_cliques(graph: &UndirectedGraph, order: &[NodeId]) -> Result<IndexMap<NodeId, NodeSet>> {
    let position: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, &n)| (n, i)).collect();

    let mut cliques = IndexMap::with_capacity(order.len());
    for (i, &node) in order.iter().enumerate() {
        let mut clique: NodeSet = graph.neighbours(node)?
                                       .iter()
                                       .cloned()
                                       .filter(|n| position.get(n).map_or(false, |&p| p > i))
                                       .collect();
        clique.insert(node);
        cliques.insert(node, clique);
    }
    Ok(cliques)
}
