/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::{Predecessors, SparseAdjacency};
use crate::utils::RaggedArray;

/// A row-oriented sparse adjacency structure.
///
/// For each node we store the list of its predecessors, that is, the column
/// indices of the nonzero entries of the corresponding row of the transition
/// matrix. Since the transition probability of an arc depends on the outdegree
/// of its source, we also store the outdegree of every node, and the list of
/// dead ends, which is computed once at construction time.
///
/// This is the layout of choice for _gather_ updates, in which each node pulls
/// rank from its predecessors: since every node writes only its own entry of
/// the new rank vector, parallel updates need no synchronization.
///
/// Predecessor lists are stored in a [`RaggedArray`], and appear in the order
/// in which the arcs were provided to
/// [`from_arcs`](SparseAdjacency::from_arcs). Parallel arcs are kept, and they
/// are counted in the outdegree of their source.
#[derive(Debug, Clone)]
pub struct RowGraph {
    predecessors: RaggedArray<usize>,
    outdegrees: Box<[usize]>,
    dead_ends: Box<[usize]>,
}

impl RowGraph {
    /// Returns the outdegrees of all nodes.
    pub fn outdegrees(&self) -> &[usize] {
        &self.outdegrees
    }
}

impl SparseAdjacency for RowGraph {
    fn from_arcs(num_nodes: usize, arcs: &[(usize, usize)]) -> Self {
        let predecessors =
            RaggedArray::from_pairs(num_nodes, arcs.iter().map(|&(src, dst)| (dst, src)));

        let mut outdegrees = vec![0; num_nodes].into_boxed_slice();
        for &(src, _) in arcs {
            assert!(
                src < num_nodes,
                "Node {src} does not exist (the graph has {num_nodes} nodes)"
            );
            outdegrees[src] += 1;
        }

        let dead_ends = outdegrees
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(node, _)| node)
            .collect::<Box<[_]>>();

        Self {
            predecessors,
            outdegrees,
            dead_ends,
        }
    }

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.outdegrees.len()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.predecessors.num_values() as u64
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.outdegrees[node]
    }

    #[inline(always)]
    fn num_dead_ends(&self) -> usize {
        self.dead_ends.len()
    }
}

impl Predecessors for RowGraph {
    #[inline(always)]
    fn predecessors(&self, node: usize) -> Option<&[usize]> {
        let pred = &self.predecessors[node];
        if pred.is_empty() {
            None
        } else {
            Some(pred)
        }
    }

    #[inline(always)]
    fn dead_ends(&self) -> &[usize] {
        &self.dead_ends
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pass_structures() {
        let g = RowGraph::from_arcs(4, &[(0, 2), (1, 2), (0, 2), (2, 0)]);
        assert_eq!(g.predecessors(2), Some(&[0, 1, 0][..]));
        assert_eq!(g.predecessors(0), Some(&[2][..]));
        assert_eq!(g.predecessors(1), None);
        assert_eq!(g.predecessors(3), None);
        assert_eq!(g.outdegrees(), &[2, 1, 1, 0]);
        assert_eq!(g.dead_ends(), &[3]);
        assert_eq!(g.num_arcs(), 4);
    }

    #[test]
    fn test_no_arcs() {
        let g = RowGraph::from_arcs(3, &[]);
        assert_eq!(g.dead_ends(), &[0, 1, 2]);
        assert_eq!(g.num_dead_ends(), 3);
        assert_eq!(g.density(), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_source_out_of_bounds() {
        RowGraph::from_arcs(2, &[(2, 0)]);
    }
}
