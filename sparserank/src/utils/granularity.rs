/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Granularity of parallel tasks, specified transparently by nodes or arcs.
///
/// Parallel rank propagation splits the node range into tasks, each formed by
/// a contiguous block of nodes. This enum allows to specify the size of such
/// blocks either directly, as a number of nodes, or indirectly, as a number of
/// arcs, in which case the number of nodes is derived from the average
/// outdegree using [`node_granularity`](Self::node_granularity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Node granularity: each task will be formed by the specified number of
    /// nodes.
    Nodes(usize),
    /// Arc granularity: each task will be formed by a number of nodes that
    /// has, tentatively, sum of outdegrees equal to the specified number of
    /// arcs.
    Arcs(u64),
}

impl core::default::Default for Granularity {
    /// Returns a default granularity of 1000 nodes.
    fn default() -> Self {
        Self::Nodes(1000)
    }
}

impl Granularity {
    /// Returns a node granularity for a given number of nodes and arcs.
    ///
    /// For the variant [`Nodes`](Self::Nodes), the specified number of nodes is
    /// returned. For the variant [`Arcs`](Self::Arcs), the number of nodes is
    /// computed as the specified number of arcs divided by the average
    /// outdegree.
    ///
    /// The result is at least one and at most `num_nodes` (if positive): a
    /// block never spans more than the whole node range.
    pub fn node_granularity(&self, num_nodes: usize, num_arcs: u64) -> usize {
        let node_granularity = match self {
            Self::Nodes(n) => *n,
            Self::Arcs(n) => {
                let average_degree = num_arcs as f64 / num_nodes.max(1) as f64;
                if average_degree == 0.0 {
                    num_nodes
                } else {
                    (*n as f64 / average_degree)
                        .min(usize::MAX as f64)
                        .ceil() as usize
                }
            }
        };
        node_granularity.min(num_nodes).max(1)
    }
}
