/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Generates Erdös-Rényi random graphs.
///
/// The Erdös-Rényi random graph model is a simple model for generating random
/// graphs. It is parameterized by the number of nodes `n` and the probability
/// `p` of an arc between any two nodes. In this implementation, loops are never
/// included.
///
/// Arcs are returned by [`arcs`](ErdosRenyi::arcs) in lexicographical order;
/// the same seed always yields the same arcs. Note that the time required to
/// enumerate the arcs is quadratic in `n`.
///
/// # Examples
///
/// ```
/// use sparserank::prelude::*;
///
/// let er = ErdosRenyi::new(100, 0.05, 0);
/// let arcs = er.arcs().collect::<Vec<_>>();
/// let g = RowGraph::from_arcs(er.num_nodes(), &arcs);
/// assert_eq!(g.num_arcs(), arcs.len() as u64);
/// ```
#[derive(Debug, Clone)]
pub struct ErdosRenyi {
    n: usize,
    p: f64,
    seed: u64,
}

impl ErdosRenyi {
    /// Creates a new Erdös-Rényi random graph, given the number of
    /// nodes, the probability of an arc between any two nodes, and a
    /// seed for the [pseudorandom number generator](SmallRng).
    pub fn new(n: usize, p: f64, seed: u64) -> Self {
        assert!((0.0..=1.0).contains(&p), "p must be in [0..1]");
        Self { n, p, seed }
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.n
    }

    /// Returns an iterator over the arcs of the graph.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        (0..self.n).flat_map(move |x| {
            (0..self.n)
                .filter(|&y| y != x && rng.random_bool(self.p))
                .map(move |y| (x, y))
                .collect::<Vec<_>>()
        })
    }
}
