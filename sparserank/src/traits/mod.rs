/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Traits describing the capabilities of sparse adjacency structures.
//!
//! Every structure can be built once from a list of arcs and then answers
//! degree and dead-end queries ([`SparseAdjacency`]). Depending on the
//! layout, it additionally provides random access to the successors
//! ([`Successors`]) or to the predecessors ([`Predecessors`]) of a node.
//!
//! Algorithms should be generic over these traits, so that the choice of the
//! layout happens once, at compile time, and the inner loops are fully
//! monomorphized.

/// A sparse adjacency structure on nodes `0..num_nodes()`.
///
/// Structures are built by [`from_arcs`](SparseAdjacency::from_arcs) and are
/// immutable afterwards. Arcs are not deduplicated: parallel arcs increase the
/// outdegree of their source.
pub trait SparseAdjacency {
    /// Builds the structure from a number of nodes and a list of arcs.
    ///
    /// # Panics
    ///
    /// Panics if an arc references a node greater than or equal to
    /// `num_nodes`.
    fn from_arcs(num_nodes: usize, arcs: &[(usize, usize)]) -> Self
    where
        Self: Sized;

    /// Returns the number of nodes.
    fn num_nodes(&self) -> usize;

    /// Returns the number of arcs, counting multiplicities.
    fn num_arcs(&self) -> u64;

    /// Returns the number of arcs leaving `node`, counting multiplicities.
    fn outdegree(&self, node: usize) -> usize;

    /// Returns the number of dead ends, that is, nodes with outdegree zero.
    fn num_dead_ends(&self) -> usize;

    /// Returns whether `node` is a dead end.
    #[inline(always)]
    fn is_dead_end(&self, node: usize) -> bool {
        self.outdegree(node) == 0
    }

    /// Returns the density of the graph, that is, the number of arcs divided
    /// by the square of the number of nodes.
    ///
    /// The density of the empty graph is zero.
    fn density(&self) -> f64 {
        let n = self.num_nodes() as f64;
        if n == 0.0 {
            0.0
        } else {
            self.num_arcs() as f64 / (n * n)
        }
    }
}

/// A [`SparseAdjacency`] providing random access to successor lists.
pub trait Successors: SparseAdjacency {
    /// Returns the successors of `node`, in the order in which the
    /// corresponding arcs were given, or `None` if `node` is a dead end.
    fn successors(&self, node: usize) -> Option<&[usize]>;
}

/// A [`SparseAdjacency`] providing random access to predecessor lists and to
/// the list of dead ends.
pub trait Predecessors: SparseAdjacency {
    /// Returns the predecessors of `node`, in the order in which the
    /// corresponding arcs were given, or `None` if no arc reaches `node`.
    fn predecessors(&self, node: usize) -> Option<&[usize]>;

    /// Returns the dead ends in increasing order.
    fn dead_ends(&self) -> &[usize];
}
