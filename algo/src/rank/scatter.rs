/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Scatter kernels for column-oriented graphs.
//!
//! Each node pushes `rank / outdegree` to each of its successors, and dead
//! ends contribute their rank to the dead mass. Since different nodes may push
//! to the same successor, the parallel kernel scatters into one private buffer
//! of length _n_ per thread of the pool; the buffers are then merged index by
//! index, in parallel, when teleportation is applied. The buffers are
//! allocated once per run and cleared at each step.

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use kahan::KahanSum;
use rayon::prelude::*;
use rayon::ThreadPool;
use sparserank::prelude::*;

use super::PowerIteration;

/// Scatters the rank of the nodes in `nodes` into `out`, adding the rank of
/// dead ends to `dead_mass`.
#[inline(always)]
fn scatter(
    graph: &ColGraph,
    rank: &[f64],
    out: &mut [f64],
    dead_mass: &mut KahanSum<f64>,
    nodes: Range<usize>,
) {
    for node in nodes {
        match graph.successors(node) {
            Some(succ) => {
                let share = rank[node] / succ.len() as f64;
                for &s in succ {
                    out[s] += share;
                }
            }
            None => *dead_mass += rank[node],
        }
    }
}

impl PowerIteration for ColGraph {
    type Scratch = Vec<Box<[f64]>>;

    fn step(&self, rank: &[f64], new_rank: &mut [f64], beta: f64) -> f64 {
        let n = self.num_nodes();
        new_rank.fill(0.0);
        let mut dead_mass = KahanSum::<f64>::new();
        scatter(self, rank, new_rank, &mut dead_mass, 0..n);

        let dead_share = dead_mass.sum() / n as f64;
        let teleport = (1.0 - beta) / n as f64;

        let mut norm = KahanSum::<f64>::new();
        for (x, &old) in new_rank.iter_mut().zip(rank) {
            *x = (*x + dead_share) * beta + teleport;
            let delta = *x - old;
            norm += delta * delta;
        }
        norm.sum()
    }

    fn scratch(&self, num_threads: usize) -> Self::Scratch {
        (0..num_threads.max(1))
            .map(|_| vec![0.0; self.num_nodes()].into_boxed_slice())
            .collect()
    }

    fn par_step(
        &self,
        rank: &[f64],
        new_rank: &mut [f64],
        beta: f64,
        node_granularity: usize,
        thread_pool: &ThreadPool,
        partials: &mut Self::Scratch,
    ) -> f64 {
        let n = self.num_nodes();
        if partials.is_empty() || partials.iter().any(|buffer| buffer.len() != n) {
            *partials = self.scratch(thread_pool.current_num_threads());
        }
        let node_granularity = node_granularity.min(n).max(1);
        let node_cursor = AtomicUsize::new(0);
        let teleport = (1.0 - beta) / n as f64;

        thread_pool.install(|| {
            // Phase 1: each buffer is filled by a task pulling blocks of nodes
            // from the cursor until the node range is exhausted.
            let dead_mass = partials
                .par_iter_mut()
                .with_max_len(1)
                .map(|buffer| {
                    buffer.fill(0.0);
                    let mut dead_mass = KahanSum::<f64>::new();
                    loop {
                        let start = node_cursor.fetch_add(node_granularity, Ordering::Relaxed);
                        if start >= n {
                            break;
                        }
                        let end = (start + node_granularity).min(n);
                        scatter(self, rank, buffer, &mut dead_mass, start..end);
                    }
                    dead_mass
                })
                .reduce(KahanSum::<f64>::new, |acc, sum| acc + sum);
            let dead_share = dead_mass.sum() / n as f64;
            let partials: &[Box<[f64]>] = &partials[..];

            // Phase 2: merge the buffers, teleport and compute the norm.
            new_rank
                .par_iter_mut()
                .zip(rank.par_iter())
                .enumerate()
                .with_min_len(node_granularity)
                .map(|(i, (x, &old))| {
                    let incoming = partials.iter().map(|buffer| buffer[i]).sum::<f64>();
                    *x = (incoming + dead_share) * beta + teleport;
                    let delta = *x - old;
                    delta * delta
                })
                .fold(KahanSum::<f64>::new, |acc, sq| acc + sq)
                .reduce(KahanSum::<f64>::new, |acc, sum| acc + sum)
                .sum()
        })
    }
}
