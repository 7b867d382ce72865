/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Sparse adjacency structures and graph generators.

pub mod col_graph;
pub mod random;
pub mod row_graph;

pub mod prelude {
    pub use super::col_graph::{ColGraph, EqError};
    pub use super::random::ErdosRenyi;
    pub use super::row_graph::RowGraph;
}
