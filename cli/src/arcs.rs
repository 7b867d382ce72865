/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Loading of edge lists.
//!
//! Each line of an edge list describes an arc by a source and a target node
//! identifier, found in configurable columns. Columns are separated by
//! whitespace, or by a custom separator. Empty lines and lines starting with
//! the comment symbol are ignored; lines without enough columns, or whose
//! source or target is not a nonnegative integer, are skipped with a warning.
//!
//! Unless [`exact`](ArcsArgs::exact) is set, identifiers are relabeled with
//! consecutive integers starting from zero in order of first appearance (the
//! source of an arc appears before its target). The number of nodes is the
//! largest node identifier plus one.

use crate::ArcsArgs;
use anyhow::{Context, Result};
use dsi_progress_logger::ProgressLog;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// A list of arcs on nodes `0..num_nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arcs {
    pub num_nodes: usize,
    pub arcs: Vec<(usize, usize)>,
}

/// Maps node identifiers to nodes.
enum Labels {
    Exact,
    Relabel(HashMap<u64, usize>),
}

impl Labels {
    fn node(&mut self, id: u64) -> Result<usize> {
        match self {
            Labels::Exact => usize::try_from(id)
                .with_context(|| format!("Node identifier {id} does not fit a usize")),
            Labels::Relabel(map) => {
                let next = map.len();
                Ok(*map.entry(id).or_insert(next))
            }
        }
    }
}

/// Reads an edge list from `input`, logging progress on `pl`.
pub fn read_arcs(
    input: impl BufRead,
    args: &ArcsArgs,
    pl: &mut impl ProgressLog,
) -> Result<Arcs> {
    let mut labels = if args.exact {
        Labels::Exact
    } else {
        Labels::Relabel(HashMap::new())
    };
    let biggest_idx = args.source_column.max(args.target_column);
    let mut num_nodes = 0;
    let mut arcs = Vec::new();

    pl.item_name("arc");
    pl.expected_updates(args.max_arcs);
    pl.start("Reading arcs...");

    for (line_num, line) in input.lines().enumerate().skip(args.lines_to_skip) {
        if args.max_arcs.is_some_and(|max_arcs| arcs.len() >= max_arcs) {
            break;
        }
        let line = line.with_context(|| format!("Could not read line {}", line_num + 1))?;
        let line = line.trim();
        // skip empty lines and comments
        if line.is_empty() || line.starts_with(args.line_comment_symbol) {
            continue;
        }

        let vals = match args.separator {
            Some(separator) => line.split(separator).map(str::trim).collect::<Vec<_>>(),
            None => line.split_whitespace().collect::<Vec<_>>(),
        };

        if vals.get(biggest_idx).is_none() {
            log::warn!(
                "Line {}: {:?} does not have enough columns: got {} columns but expected at least {}",
                line_num + 1,
                line,
                vals.len(),
                biggest_idx + 1,
            );
            continue;
        }

        let (src, dst) = match (
            vals[args.source_column].parse::<u64>(),
            vals[args.target_column].parse::<u64>(),
        ) {
            (Ok(src), Ok(dst)) => (src, dst),
            _ => {
                log::warn!(
                    "Line {}: {:?} does not contain a valid pair of node identifiers",
                    line_num + 1,
                    line
                );
                continue;
            }
        };

        let src = labels.node(src)?;
        let dst = labels.node(dst)?;
        num_nodes = num_nodes.max(src.max(dst) + 1);
        arcs.push((src, dst));
        pl.light_update();
    }

    pl.done();
    log::info!("Read {} arcs on {} nodes", arcs.len(), num_nodes);

    Ok(Arcs { num_nodes, arcs })
}

/// Reads an edge list from the file at `path`, logging progress on `pl`.
pub fn load_arcs(
    path: impl AsRef<Path>,
    args: &ArcsArgs,
    pl: &mut impl ProgressLog,
) -> Result<Arcs> {
    let path = path.as_ref();
    log::info!("Loading arcs from {}", path.display());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open {}", path.display()))?;
    read_arcs(std::io::BufReader::new(file), args, pl)
        .with_context(|| format!("Could not read arcs from {}", path.display()))
}
