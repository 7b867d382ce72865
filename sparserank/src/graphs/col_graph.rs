/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::{SparseAdjacency, Successors};
use crate::utils::RaggedArray;

/// Error returned by [`ColGraph::check_eq`] describing the first difference
/// found between two graphs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EqError {
    /// The graphs have different numbers of nodes.
    #[error("Different number of nodes: {first} != {second}")]
    NumNodes { first: usize, second: usize },

    /// The graphs have different sets of successors for a specific node.
    #[error("Different successors for node {node}: {first:?} != {second:?}")]
    Successors {
        node: usize,
        first: Vec<usize>,
        second: Vec<usize>,
    },
}

/// A column-oriented sparse adjacency structure.
///
/// For each node we store the list of its successors, that is, the row
/// indices of the nonzero entries of the corresponding column of the
/// transition matrix. Nodes without successors (dead ends) have no list at
/// all, and [`successors`](Successors::successors) returns `None` for them.
///
/// This is the layout of choice for _scatter_ updates, in which each node
/// pushes a share of its rank to each of its successors.
///
/// Successor lists are stored in a [`RaggedArray`], and appear in the order in
/// which the arcs were provided to [`from_arcs`](SparseAdjacency::from_arcs).
/// Parallel arcs are kept.
///
/// # Equality
///
/// Two instances are [equal](PartialEq) if they have the same number of nodes
/// and, for each node, the same _set_ of successors. The comparison thus
/// ignores both the order and the multiplicity of arcs, whereas the transition
/// probabilities used by PageRank depend on multiplicities: equality is a
/// diagnostic tool, and it does not imply that two graphs have the same
/// PageRank. Use [`check_eq`](ColGraph::check_eq) to obtain a description of
/// the first difference.
#[derive(Debug, Clone)]
pub struct ColGraph {
    successors: RaggedArray<usize>,
    num_dead_ends: usize,
}

impl ColGraph {
    /// Returns the first difference between the successor sets of `self` and
    /// `other`, if any.
    pub fn check_eq(&self, other: &Self) -> Result<(), EqError> {
        if self.num_nodes() != other.num_nodes() {
            return Err(EqError::NumNodes {
                first: self.num_nodes(),
                second: other.num_nodes(),
            });
        }
        for node in 0..self.num_nodes() {
            let first = successor_set(&self.successors[node]);
            let second = successor_set(&other.successors[node]);
            if first != second {
                return Err(EqError::Successors {
                    node,
                    first,
                    second,
                });
            }
        }
        Ok(())
    }
}

/// Returns the sorted, deduplicated successors.
fn successor_set(succ: &[usize]) -> Vec<usize> {
    let mut set = succ.to_vec();
    set.sort_unstable();
    set.dedup();
    set
}

impl SparseAdjacency for ColGraph {
    fn from_arcs(num_nodes: usize, arcs: &[(usize, usize)]) -> Self {
        let successors = RaggedArray::from_pairs(num_nodes, arcs.iter().copied());
        for &(_, dst) in arcs {
            assert!(
                dst < num_nodes,
                "Node {dst} does not exist (the graph has {num_nodes} nodes)"
            );
        }
        let num_dead_ends = (0..num_nodes)
            .filter(|&node| successors.row_len(node) == 0)
            .count();
        Self {
            successors,
            num_dead_ends,
        }
    }

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.successors.len()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.successors.num_values() as u64
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.successors.row_len(node)
    }

    #[inline(always)]
    fn num_dead_ends(&self) -> usize {
        self.num_dead_ends
    }
}

impl Successors for ColGraph {
    #[inline(always)]
    fn successors(&self, node: usize) -> Option<&[usize]> {
        let succ = &self.successors[node];
        if succ.is_empty() {
            None
        } else {
            Some(succ)
        }
    }
}

impl PartialEq for ColGraph {
    fn eq(&self, other: &Self) -> bool {
        self.check_eq(other).is_ok()
    }
}

impl Eq for ColGraph {}
