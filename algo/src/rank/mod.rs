/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ranking algorithms.
//!
//! The [PageRank engine](pagerank::PageRank) is generic over the adjacency
//! layout through the [`PowerIteration`] trait, which provides the update
//! kernels for a single step of the power method. Column-oriented graphs
//! implement it by scattering rank along arcs, row-oriented graphs by
//! gathering it.

mod gather;
pub mod pagerank;
mod scatter;

pub use pagerank::pagerank;

use rayon::ThreadPool;
use sparserank::traits::SparseAdjacency;

/// A sparse adjacency structure providing the kernels of a step of the power
/// method for PageRank.
///
/// Given the current rank vector `rank`, a step writes into `new_rank` the
/// vector
///
/// > `new_rank[i] = (incoming[i] + dead_mass / n) · β + (1 − β) / n`,
///
/// where `incoming[i]` is the sum of `rank[j] / outdegree(j)` over the arcs
/// `j → i` (counting multiplicities) and `dead_mass` is the sum of the ranks of
/// dead ends, and returns the square of the ℓ₂ norm of `new_rank − rank`.
///
/// The sequential and parallel kernels compute the same update, so their
/// results differ only by floating-point rounding.
pub trait PowerIteration: SparseAdjacency + Sync {
    /// Working memory of [`par_step`](Self::par_step), allocated once per run
    /// by [`scratch`](Self::scratch) and reused at every step.
    type Scratch: Send;

    /// Performs a step sequentially, returning the squared ℓ₂ norm of the
    /// difference between `new_rank` and `rank`.
    ///
    /// The previous content of `new_rank` is ignored.
    fn step(&self, rank: &[f64], new_rank: &mut [f64], beta: f64) -> f64;

    /// Allocates the working memory of [`par_step`](Self::par_step) for a
    /// pool of `num_threads` threads.
    fn scratch(&self, num_threads: usize) -> Self::Scratch;

    /// Performs a step using the threads of `thread_pool`, returning the
    /// squared ℓ₂ norm of the difference between `new_rank` and `rank`.
    ///
    /// Nodes are handed out to threads in blocks of `node_granularity` nodes;
    /// blocks never exceed the number of nodes. The previous content of
    /// `new_rank` and of `scratch` is ignored.
    fn par_step(
        &self,
        rank: &[f64],
        new_rank: &mut [f64],
        beta: f64,
        node_granularity: usize,
        thread_pool: &ThreadPool,
        scratch: &mut Self::Scratch,
    ) -> f64;
}
