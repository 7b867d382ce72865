/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use predicates::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sparserank::prelude::*;
use sparserank_algo::prelude::*;

const BETA: f64 = 0.85;

/// Returns the ℓ-∞ distance (maximum absolute difference) between two vectors.
fn l_inf_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Computes PageRank with a dense transition matrix, in which the rows of
/// dead ends are uniform.
fn power_method(n: usize, arcs: &[(usize, usize)], beta: f64, iterations: usize) -> Vec<f64> {
    let mut outdegree = vec![0usize; n];
    for &(src, _) in arcs {
        outdegree[src] += 1;
    }
    let mut matrix = vec![vec![0.0; n]; n];
    for &(src, dst) in arcs {
        matrix[src][dst] += 1.0 / outdegree[src] as f64;
    }
    for (row, &d) in matrix.iter_mut().zip(&outdegree) {
        if d == 0 {
            row.fill(1.0 / n as f64);
        }
    }

    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..iterations {
        let mut y = vec![(1.0 - beta) / n as f64; n];
        for (j, row) in matrix.iter().enumerate() {
            for (i, &m) in row.iter().enumerate() {
                y[i] += beta * x[j] * m;
            }
        }
        x = y;
    }
    x
}

/// Returns random arcs, including loops and parallel arcs.
fn random_arcs(n: usize, m: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..m)
        .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
        .collect()
}

/// Returns the arcs of some graphs of different shapes.
fn test_graphs() -> Vec<(usize, Vec<(usize, usize)>)> {
    let mut graphs = vec![
        (2, vec![(0, 1), (1, 0)]),
        (4, vec![]),
        (5, vec![(0, 0), (0, 1), (0, 1), (1, 2), (3, 3)]),
        (
            8,
            vec![
                (0, 1),
                (0, 2),
                (1, 3),
                (1, 4),
                (1, 5),
                (2, 4),
                (3, 6),
                (4, 6),
                (5, 6),
                (5, 7),
                (6, 2),
            ],
        ),
    ];
    for (seed, &(n, p)) in [(10, 0.3), (100, 0.05), (1000, 0.002)].iter().enumerate() {
        let er = ErdosRenyi::new(n, p, seed as u64);
        graphs.push((n, er.arcs().collect()));
    }
    for (seed, &(n, m)) in [(50, 200), (500, 1000)].iter().enumerate() {
        graphs.push((n, random_arcs(n, m, seed as u64)));
    }
    graphs
}

fn thread_counts() -> Vec<usize> {
    let mut counts = vec![1, 2, num_cpus::get()];
    counts.dedup();
    counts
}

#[test]
fn test_cross_representation_equivalence() -> anyhow::Result<()> {
    for (n, arcs) in test_graphs() {
        let col = ColGraph::from_arcs(n, &arcs);
        let row = RowGraph::from_arcs(n, &arcs);

        let expected = pagerank(&col, None, BETA, 50, 1E-7, Some(1))?;
        let expected = expected.rank();

        for num_threads in thread_counts() {
            let col_pr = pagerank(&col, None, BETA, 50, 1E-7, Some(num_threads))?;
            let row_pr = pagerank(&row, None, BETA, 50, 1E-7, Some(num_threads))?;
            assert!(
                compare(expected, col_pr.rank(), 1E-6),
                "column, n = {n}, {num_threads} threads"
            );
            assert!(
                compare(expected, row_pr.rank(), 1E-6),
                "row, n = {n}, {num_threads} threads"
            );
        }

        let all = pagerank(&row, None, BETA, 50, 1E-7, None)?;
        assert!(compare(expected, all.rank(), 1E-6));
    }
    Ok(())
}

#[test]
fn test_distribution() -> anyhow::Result<()> {
    for (n, arcs) in test_graphs() {
        let col = ColGraph::from_arcs(n, &arcs);
        let row = RowGraph::from_arcs(n, &arcs);
        for beta in [0.1, 0.5, 0.85, 0.99] {
            let col_pr = pagerank(&col, None, beta, 50, 1E-7, None)?;
            let row_pr = pagerank(&row, None, beta, 50, 1E-7, Some(1))?;
            for rank in [col_pr.rank(), row_pr.rank()] {
                assert!((rank.iter().sum::<f64>() - 1.0).abs() < 1E-3);
                assert!(check_distribution(rank).is_ok());
            }
            assert!(col_pr.warning().is_none());
            assert!(row_pr.warning().is_none());
        }
    }
    Ok(())
}

#[test]
fn test_dead_ends_only() {
    let col = ColGraph::from_arcs(4, &[]);
    let row = RowGraph::from_arcs(4, &[]);
    let thread_pool = thread_pool![2];
    for max_iter in 1..=10 {
        let mut col_pr = PageRank::new(&col);
        col_pr.run(preds::MaxIter::from(max_iter));
        let mut row_pr = PageRank::new(&row);
        row_pr.par_run(preds::MaxIter::from(max_iter), &thread_pool);
        for rank in [col_pr.rank(), row_pr.rank()] {
            assert_eq!(rank.len(), 4);
            for &x in rank {
                assert!((x - 0.25).abs() < 1E-15, "{max_iter} iterations: {x}");
            }
        }
        assert_eq!(col_pr.iterations(), max_iter);
        assert!(col_pr.norm_delta() < 1E-15);
    }
}

#[test]
fn test_two_node_cycle() -> anyhow::Result<()> {
    let arcs = [(0, 1), (1, 0)];
    let col = ColGraph::from_arcs(2, &arcs);
    let row = RowGraph::from_arcs(2, &arcs);
    for beta in [0.0, 0.3, 0.85, 1.0] {
        for num_threads in [Some(1), Some(2)] {
            let col_pr = pagerank(&col, None, beta, 50, 1E-7, num_threads)?;
            let row_pr = pagerank(&row, None, beta, 50, 1E-7, num_threads)?;
            assert!(compare(col_pr.rank(), &[0.5, 0.5], 1E-6));
            assert!(compare(row_pr.rank(), &[0.5, 0.5], 1E-6));
        }
    }
    Ok(())
}

#[test]
fn test_single_iteration() -> anyhow::Result<()> {
    let (n, arcs) = (100, ErdosRenyi::new(100, 0.1, 0).arcs().collect::<Vec<_>>());
    let col = ColGraph::from_arcs(n, &arcs);
    let row = RowGraph::from_arcs(n, &arcs);
    let expected = power_method(n, &arcs, BETA, 1);
    for tolerance in [0.0, 1E-7, 1.0, f64::INFINITY] {
        for num_threads in [Some(1), Some(2)] {
            let col_pr = pagerank(&col, None, BETA, 1, tolerance, num_threads)?;
            let row_pr = pagerank(&row, None, BETA, 1, tolerance, num_threads)?;
            assert_eq!(col_pr.iterations(), 1);
            assert_eq!(row_pr.iterations(), 1);
            assert!(l_inf_distance(col_pr.rank(), &expected) < 1E-12);
            assert!(l_inf_distance(row_pr.rank(), &expected) < 1E-12);
        }
    }
    Ok(())
}

#[test]
fn test_thread_count_invariance() {
    let n = 1000;
    let arcs = random_arcs(n, 5000, 42);
    let col = ColGraph::from_arcs(n, &arcs);
    let row = RowGraph::from_arcs(n, &arcs);
    let predicate = preds::MaxIter::from(50).or(preds::L2Norm::try_from(1E-7).unwrap());

    let mut results = vec![];
    for num_threads in [1, 2, 3, num_cpus::get()] {
        let thread_pool = thread_pool![num_threads];
        for granularity in [Granularity::Nodes(1), Granularity::Nodes(17), Granularity::Arcs(100)] {
            let mut col_pr = PageRank::new(&col);
            col_pr.granularity(granularity);
            col_pr.par_run(predicate.clone(), &thread_pool);
            results.push(col_pr.into_rank());

            let mut row_pr = PageRank::new(&row);
            row_pr.granularity(granularity);
            row_pr.par_run(predicate.clone(), &thread_pool);
            results.push(row_pr.into_rank());
        }
    }

    for rank in &results[1..] {
        assert!(compare(&results[0], rank, 1E-6));
    }
}

#[test]
fn test_one_thread_is_sequential() {
    let n = 300;
    let arcs = random_arcs(n, 1500, 7);
    let col = ColGraph::from_arcs(n, &arcs);
    let row = RowGraph::from_arcs(n, &arcs);
    let thread_pool = thread_pool![1];

    let mut seq = PageRank::new(&col);
    seq.run(preds::MaxIter::from(20));
    let mut par = PageRank::new(&col);
    par.granularity(Granularity::Nodes(1));
    par.par_run(preds::MaxIter::from(20), &thread_pool);
    assert_eq!(seq.rank(), par.rank());
    assert_eq!(seq.norm_delta(), par.norm_delta());

    let mut seq = PageRank::new(&row);
    seq.run(preds::MaxIter::from(20));
    let mut par = PageRank::new(&row);
    par.par_run(preds::MaxIter::from(20), &thread_pool);
    assert_eq!(seq.rank(), par.rank());
}

#[test]
fn test_huge_granularity() {
    let arcs = [(0, 1), (1, 2), (2, 0), (2, 1)];
    let col = ColGraph::from_arcs(3, &arcs);
    let row = RowGraph::from_arcs(3, &arcs);
    let thread_pool = thread_pool![4];

    let mut seq = PageRank::new(&col);
    seq.run(preds::MaxIter::from(1));

    for granularity in [
        Granularity::Nodes(1 << 63),
        Granularity::Nodes(usize::MAX),
        Granularity::Arcs(u64::MAX),
    ] {
        let mut col_pr = PageRank::new(&col);
        col_pr.granularity(granularity);
        col_pr.par_run(preds::MaxIter::from(1), &thread_pool);
        assert!(compare(seq.rank(), col_pr.rank(), 1E-12), "{granularity:?}");
        assert!(col_pr.warning().is_none());

        let mut row_pr = PageRank::new(&row);
        row_pr.granularity(granularity);
        row_pr.par_run(preds::MaxIter::from(1), &thread_pool);
        assert!(compare(seq.rank(), row_pr.rank(), 1E-12), "{granularity:?}");
        assert!(row_pr.warning().is_none());
    }
}

#[test]
fn test_more_threads_than_nodes() {
    let thread_pool = thread_pool![8];
    for (n, arcs) in [
        (1, vec![]),
        (2, vec![(0, 1)]),
        (3, vec![(0, 1), (1, 2), (2, 0), (0, 0)]),
    ] {
        let expected = power_method(n, &arcs, BETA, 20);
        let col = ColGraph::from_arcs(n, &arcs);
        let row = RowGraph::from_arcs(n, &arcs);
        for granularity in [Granularity::Nodes(1), Granularity::Nodes(2), Granularity::Nodes(1000)] {
            let mut col_pr = PageRank::new(&col);
            col_pr.granularity(granularity);
            col_pr.par_run(preds::MaxIter::from(20), &thread_pool);
            assert!(l_inf_distance(col_pr.rank(), &expected) < 1E-12, "n = {n}");

            let mut row_pr = PageRank::new(&row);
            row_pr.granularity(granularity);
            row_pr.par_run(preds::MaxIter::from(20), &thread_pool);
            assert!(l_inf_distance(row_pr.rank(), &expected) < 1E-12, "n = {n}");
        }
    }
}

#[test]
fn test_power_method() {
    for (n, arcs) in test_graphs() {
        if n > 500 {
            continue;
        }
        let expected = power_method(n, &arcs, BETA, 30);
        let col = ColGraph::from_arcs(n, &arcs);
        let row = RowGraph::from_arcs(n, &arcs);

        let mut col_pr = PageRank::new(&col);
        col_pr.run(preds::MaxIter::from(30));
        let mut row_pr = PageRank::new(&row);
        row_pr.granularity(Granularity::Nodes(1));
        row_pr.par_run(preds::MaxIter::from(30), &thread_pool![2]);

        assert!(l_inf_distance(col_pr.rank(), &expected) < 1E-12, "n = {n}");
        assert!(l_inf_distance(row_pr.rank(), &expected) < 1E-12, "n = {n}");
    }
}

#[test]
fn test_convergence() {
    let n = 200;
    let arcs = ErdosRenyi::new(n, 0.05, 3).arcs().collect::<Vec<_>>();
    let row = RowGraph::from_arcs(n, &arcs);
    let mut pr = PageRank::new(&row);
    pr.run(preds::MaxIter::from(1000).or(preds::L2Norm::try_from(1E-12).unwrap()));
    assert!(pr.iterations() < 1000);
    assert!(pr.norm_delta() <= 1E-12);

    // The result is a fixed point of the power method
    let expected = power_method(n, &arcs, BETA, pr.iterations() + 10);
    assert!(l_inf_distance(pr.rank(), &expected) < 1E-10);
}

#[test]
fn test_initial_vector() -> anyhow::Result<()> {
    let arcs = [(0, 1), (1, 2), (2, 0), (2, 3)];
    let col = ColGraph::from_arcs(4, &arcs);
    let row = RowGraph::from_arcs(4, &arcs);
    let initial = [1.0, 0.0, 0.0, 0.0];

    // After a single step with β = 1 the whole mass moves to node 1
    let col_pr = pagerank(&col, Some(&initial), 1.0, 1, 0.0, Some(1))?;
    assert_eq!(col_pr.rank(), &[0.0, 1.0, 0.0, 0.0]);
    let row_pr = pagerank(&row, Some(&initial), 1.0, 1, 0.0, Some(2))?;
    assert_eq!(row_pr.rank(), &[0.0, 1.0, 0.0, 0.0]);

    // The limit does not depend on the initial vector
    let from_initial = pagerank(&row, Some(&initial), BETA, 200, 1E-12, None)?;
    let from_uniform = pagerank(&row, None, BETA, 200, 1E-12, None)?;
    assert!(compare(from_initial.rank(), from_uniform.rank(), 1E-9));
    Ok(())
}

#[cfg(feature = "slow_tests")]
#[test]
fn test_large_random_graph() -> anyhow::Result<()> {
    let n = 100_000;
    let arcs = random_arcs(n, 2_000_000, 0);
    let col = ColGraph::from_arcs(n, &arcs);
    let row = RowGraph::from_arcs(n, &arcs);
    let expected = pagerank(&col, None, BETA, 50, 1E-7, Some(1))?;
    for num_threads in thread_counts() {
        let col_pr = pagerank(&col, None, BETA, 50, 1E-7, Some(num_threads))?;
        let row_pr = pagerank(&row, None, BETA, 50, 1E-7, Some(num_threads))?;
        assert!(compare(expected.rank(), col_pr.rank(), 1E-6));
        assert!(compare(expected.rank(), row_pr.rank(), 1E-6));
    }
    Ok(())
}
