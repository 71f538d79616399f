//! Provides an example of how to use junction to build the junction tree of a Bayesian Network,
//! then a binary join tree for inference engines that combine two messages at a time.

use junction as j;
use j::BinaryJoinTreeConverter;

use indexmap::IndexMap;

fn main() -> j::Result<()> {
    // difficulty, intelligence, grade, sat, letter
    let names = ["D", "I", "G", "S", "L"];

    /////////////////////////////////////////////////////
    // Step 1: Moralize the network
    let mut parents: IndexMap<j::NodeId, j::NodeSet> = IndexMap::new();
    parents.insert(0, j::NodeSet::new());
    parents.insert(1, j::NodeSet::new());
    parents.insert(2, vec![0, 1].into_iter().collect());
    parents.insert(3, vec![1].into_iter().collect());
    parents.insert(4, vec![2].into_iter().collect());

    let graph = j::graph::moral_graph(&parents)?;
    let domain_sizes: j::DomainSizes = vec![(0, 2), (1, 2), (2, 3), (3, 2), (4, 2)].into_iter().collect();

    /////////////////////////////////////////////////////
    // Step 2: Triangulate

    // uncomment to eliminate the grade before anything else
    // let mut triangulation = j::PartialOrderedTriangulation::with_partial_order(
    //     vec![vec![2].into_iter().collect()],
    //     j::TriangulationConfig::default().with_minimality(true)
    // )?;
    let mut triangulation = j::DefaultTriangulation::default();
    let result = triangulation.triangulate(&graph, &domain_sizes)?;

    let order: Vec<&str> = result.elimination_order().iter().map(|&n| names[n]).collect();
    println!("elimination order: {}", order.join(" "));
    println!("fill-ins: {}", result.fill_ins().len());
    println!("largest clique: 10^{:.3} entries", result.max_log10_clique_domain_size());

    /////////////////////////////////////////////////////
    // Step 3: Junction tree and binary join tree
    print_tree("junction tree", result.junction_tree(), &names)?;

    let mut converter = j::DefaultBinaryJoinTreeConverter::new();
    let binary = converter.convert(result.junction_tree(), &domain_sizes, &j::NodeSet::new())?;
    print_tree("binary join tree", &binary, &names)?;

    Ok(())
}


fn print_tree(title: &str, tree: &j::CliqueGraph, names: &[&str]) -> j::Result<()> {
    println!("{}:", title);
    for (id, clique) in tree.cliques() {
        let variables: Vec<&str> = clique.iter().map(|&n| names[n]).collect();
        println!("  clique {}: {{{}}}", id, variables.join(", "));
    }
    for edge in tree.edges() {
        let separator: Vec<&str> = tree.separator(edge.first(), edge.second())?.iter().map(|&n| names[n]).collect();
        println!("  {} separated by {{{}}}", edge, separator.join(", "));
    }
    Ok(())
}
