/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

mod common;

use common::{test_graph_arcs, TEST_GRAPH_NUM_NODES};
use sparserank::prelude::*;

#[test]
fn test_canonical_graph() {
    let g = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &test_graph_arcs());
    assert_eq!(g.num_nodes(), 8);
    assert_eq!(g.num_arcs(), 11);
    assert_eq!(g.num_dead_ends(), 1);
    assert_eq!(g.successors(7), None);
    assert_eq!(g.successors(1), Some(&[3, 4, 5][..]));
    let outdegrees = (0..8).map(|node| g.outdegree(node)).collect::<Vec<_>>();
    assert_eq!(outdegrees, [2, 3, 1, 1, 1, 2, 1, 0]);
    assert!((g.density() - 11.0 / 64.0).abs() < 1E-12);
}

#[test]
fn test_eq_is_reflexive() {
    let g = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &test_graph_arcs());
    assert_eq!(g, g.clone());
    assert_eq!(g.check_eq(&g), Ok(()));
}

#[test]
fn test_eq_ignores_order() {
    let arcs = test_graph_arcs();
    let mut reversed = arcs.clone();
    reversed.reverse();
    let g0 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &arcs);
    let g1 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &reversed);
    // Successor lists are permuted...
    assert_eq!(g0.successors(1), Some(&[3, 4, 5][..]));
    assert_eq!(g1.successors(1), Some(&[5, 4, 3][..]));
    // ...but the graphs are equal
    assert_eq!(g0, g1);
}

#[test]
fn test_eq_ignores_multiplicity() {
    let mut arcs = test_graph_arcs();
    let g0 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &arcs);
    arcs.push((1, 3));
    let g1 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &arcs);
    assert_eq!(g1.outdegree(1), 4);
    assert_eq!(g0, g1);
}

#[test]
fn test_adding_an_arc_breaks_eq() {
    let mut arcs = test_graph_arcs();
    let g0 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &arcs);
    arcs.push((7, 0));
    let g1 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &arcs);
    assert_ne!(g0, g1);
    assert_eq!(
        g0.check_eq(&g1),
        Err(EqError::Successors {
            node: 7,
            first: vec![],
            second: vec![0],
        })
    );
}

#[test]
fn test_removing_an_arc_breaks_eq() {
    let mut arcs = test_graph_arcs();
    let g0 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &arcs);
    arcs.retain(|&arc| arc != (1, 4));
    let g1 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &arcs);
    assert_ne!(g0, g1);
    assert!(matches!(
        g0.check_eq(&g1),
        Err(EqError::Successors { node: 1, .. })
    ));
}

#[test]
fn test_different_number_of_nodes() {
    let arcs = test_graph_arcs();
    let g0 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES, &arcs);
    let g1 = ColGraph::from_arcs(TEST_GRAPH_NUM_NODES + 1, &arcs);
    assert_ne!(g0, g1);
    assert_eq!(g1.num_dead_ends(), 2);
}

#[test]
fn test_empty_graph() {
    let g = ColGraph::from_arcs(0, &[]);
    assert_eq!(g.num_nodes(), 0);
    assert_eq!(g.num_dead_ends(), 0);
    assert_eq!(g.density(), 0.0);
}
