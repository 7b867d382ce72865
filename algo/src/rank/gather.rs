/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Gather kernels for row-oriented graphs.
//!
//! Each node pulls `rank / outdegree` from each of its predecessors. The dead
//! mass is the same for all nodes, so it is computed once per step from the
//! list of dead ends before the gather phase. Every node writes only its own
//! entry, so the parallel kernel needs no synchronization besides the final
//! reduction of the norm.

use kahan::KahanSum;
use rayon::prelude::*;
use rayon::ThreadPool;
use sparserank::prelude::*;

use super::PowerIteration;

/// Returns the new rank of `node`.
#[inline(always)]
fn gather(graph: &RowGraph, rank: &[f64], node: usize, dead_share: f64, beta: f64) -> f64 {
    let outdegrees = graph.outdegrees();
    let incoming = match graph.predecessors(node) {
        Some(pred) => pred
            .iter()
            .map(|&j| rank[j] / outdegrees[j] as f64)
            .sum::<f64>(),
        None => 0.0,
    };
    (incoming + dead_share) * beta
}

impl PowerIteration for RowGraph {
    type Scratch = ();

    fn step(&self, rank: &[f64], new_rank: &mut [f64], beta: f64) -> f64 {
        let n = self.num_nodes();
        let dead_mass = self
            .dead_ends()
            .iter()
            .fold(KahanSum::<f64>::new(), |acc, &j| acc + rank[j]);
        let dead_share = dead_mass.sum() / n as f64;
        let teleport = (1.0 - beta) / n as f64;

        let mut norm = KahanSum::<f64>::new();
        for (node, (x, &old)) in new_rank.iter_mut().zip(rank).enumerate() {
            *x = gather(self, rank, node, dead_share, beta) + teleport;
            let delta = *x - old;
            norm += delta * delta;
        }
        norm.sum()
    }

    fn scratch(&self, _num_threads: usize) -> Self::Scratch {}

    fn par_step(
        &self,
        rank: &[f64],
        new_rank: &mut [f64],
        beta: f64,
        node_granularity: usize,
        thread_pool: &ThreadPool,
        _scratch: &mut Self::Scratch,
    ) -> f64 {
        let n = self.num_nodes();
        let node_granularity = node_granularity.min(n).max(1);
        let teleport = (1.0 - beta) / n as f64;

        thread_pool.install(|| {
            let dead_mass = self
                .dead_ends()
                .par_iter()
                .with_min_len(node_granularity)
                .fold(KahanSum::<f64>::new, |acc, &j| acc + rank[j])
                .reduce(KahanSum::<f64>::new, |acc, sum| acc + sum);
            let dead_share = dead_mass.sum() / n as f64;

            new_rank
                .par_iter_mut()
                .zip(rank.par_iter())
                .enumerate()
                .with_min_len(node_granularity)
                .map(|(node, (x, &old))| {
                    *x = gather(self, rank, node, dead_share, beta) + teleport;
                    let delta = *x - old;
                    delta * delta
                })
                .fold(KahanSum::<f64>::new, |acc, sq| acc + sq)
                .reduce(KahanSum::<f64>::new, |acc, sum| acc + sum)
                .sum()
        })
    }
}
