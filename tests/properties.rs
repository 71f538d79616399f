//! Property tests of triangulations and binary join trees over random graphs

use junction::triangulation::thin_fill_ins;
use junction::{
    BinaryJoinTreeConverter, CliqueGraph, CliqueId, DefaultBinaryJoinTreeConverter, DefaultTriangulation, DomainSizes,
    NodeSet, PartialOrderedTriangulation, Triangulation, TriangulationConfig, UndirectedGraph,
};
use proptest::prelude::*;

use std::collections::VecDeque;

fn graphs() -> impl Strategy<Value = (UndirectedGraph, DomainSizes)> {
    (1usize..14)
        .prop_flat_map(|n| (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..(3 * n)),
            prop::collection::vec(1usize..5, n)
        ))
        .prop_map(|(n, edges, sizes)| {
            let mut graph = UndirectedGraph::with_nodes(0..n);
            for (a, b) in edges {
                if a != b {
                    graph.add_edge(a, b).unwrap();
                }
            }
            let domain_sizes = sizes.into_iter().enumerate().collect();
            (graph, domain_sizes)
        })
}

fn check_triangulation(graph: &UndirectedGraph, result: &Triangulation) -> Result<(), TestCaseError> {
    let triangulated = result.triangulated_graph();
    let order = result.elimination_order();

    prop_assert_eq!(graph.size(), order.len());
    prop_assert_eq!(graph.node_set(), order.iter().cloned().collect::<NodeSet>());
    prop_assert!(triangulated.is_chordal());
    prop_assert!(triangulated.is_perfect_elimination_ordering(&order));
    for edge in graph.edges() {
        prop_assert!(triangulated.exists_edge(edge.first(), edge.second()));
    }
    for edge in result.fill_ins() {
        prop_assert!(! graph.exists_edge(edge.first(), edge.second()));
    }

    let junction = result.junction_tree();
    prop_assert!(junction.is_join_tree());
    prop_assert_eq!(graph.node_set(), junction.variables());
    for edge in triangulated.edges() {
        let pair: NodeSet = vec![edge.first(), edge.second()].into_iter().collect();
        prop_assert!(junction.container_of(&pair).is_some());
    }
    Ok(())
}

fn max_children(tree: &CliqueGraph, roots: &NodeSet) -> usize {
    let mut max = 0;
    for &root in roots.iter() {
        let mut queue: VecDeque<(CliqueId, Option<CliqueId>)> = VecDeque::new();
        queue.push_back((root, None));
        while let Some((clique, from)) = queue.pop_front() {
            let children: Vec<CliqueId> = tree.neighbours(clique).unwrap()
                                              .iter()
                                              .cloned()
                                              .filter(|&c| Some(c) != from)
                                              .collect();
            max = max.max(children.len());
            for child in children {
                queue.push_back((child, Some(clique)));
            }
        }
    }
    max
}

proptest! {
    #[test]
    fn default_triangulation_is_a_junction_tree((graph, domain_sizes) in graphs()) {
        let result = DefaultTriangulation::default().triangulate(&graph, &domain_sizes).unwrap();
        check_triangulation(&graph, &result)?;
    }

    #[test]
    fn minimal_triangulation((graph, domain_sizes) in graphs()) {
        let plain = DefaultTriangulation::default().triangulate(&graph, &domain_sizes).unwrap();

        let config = TriangulationConfig::default().with_minimality(true);
        let minimal = DefaultTriangulation::with_config(config).unwrap().triangulate(&graph, &domain_sizes).unwrap();
        check_triangulation(&graph, &minimal)?;
        prop_assert!(minimal.fill_ins().is_subset(plain.fill_ins()));

        let mut triangulated = minimal.triangulated_graph().clone();
        let mut fill_ins = minimal.fill_ins().clone();
        prop_assert_eq!(0, thin_fill_ins(&mut triangulated, &mut fill_ins, None).unwrap());
    }

    #[test]
    fn partial_order_is_respected((graph, domain_sizes) in graphs()) {
        let subsets: Vec<NodeSet> = (0..3).map(|k| graph.nodes().filter(|n| n % 3 == k).collect()).collect();
        let mut triangulation = PartialOrderedTriangulation::with_partial_order(
            subsets,
            TriangulationConfig::default()
        ).unwrap();

        let result = triangulation.triangulate(&graph, &domain_sizes).unwrap();
        check_triangulation(&graph, &result)?;

        let order = result.elimination_order();
        for pair in order.windows(2) {
            prop_assert!(pair[0] % 3 <= pair[1] % 3);
        }
    }

    #[test]
    fn minimal_triangulation_keeps_the_partial_order((graph, domain_sizes) in graphs()) {
        let subsets: Vec<NodeSet> = (0..3).map(|k| graph.nodes().filter(|n| n % 3 == k).collect()).collect();

        let mut plain = PartialOrderedTriangulation::with_partial_order(
            subsets.clone(),
            TriangulationConfig::default()
        ).unwrap();
        let plain = plain.triangulate(&graph, &domain_sizes).unwrap();

        let mut minimal = PartialOrderedTriangulation::with_partial_order(
            subsets.clone(),
            TriangulationConfig::default().with_minimality(true)
        ).unwrap();
        let result = minimal.triangulate(&graph, &domain_sizes).unwrap();
        check_triangulation(&graph, &result)?;
        prop_assert!(result.fill_ins().is_subset(plain.fill_ins()));

        let order = result.elimination_order();
        for pair in order.windows(2) {
            prop_assert!(pair[0] % 3 <= pair[1] % 3);
        }

        let mut triangulated = result.triangulated_graph().clone();
        let mut fill_ins = result.fill_ins().clone();
        prop_assert_eq!(0, thin_fill_ins(&mut triangulated, &mut fill_ins, Some(&subsets[..])).unwrap());
    }

    #[test]
    fn binary_join_tree((graph, domain_sizes) in graphs()) {
        let result = DefaultTriangulation::default().triangulate(&graph, &domain_sizes).unwrap();
        let junction = result.junction_tree();

        let mut converter = DefaultBinaryJoinTreeConverter::new();
        let binary = converter.convert(junction, &domain_sizes, &NodeSet::new()).unwrap();

        prop_assert!(binary.is_join_tree());
        prop_assert!(max_children(&binary, converter.roots()) <= 2);
        prop_assert_eq!(junction.connected_components().len(), converter.roots().len());
        prop_assert_eq!(junction.variables(), binary.variables());
        for (id, clique) in junction.cliques() {
            prop_assert_eq!(clique, binary.clique(id).unwrap());
        }
    }
}
