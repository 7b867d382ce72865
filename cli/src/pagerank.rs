/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::arcs::{load_arcs, Arcs};
use crate::{
    get_thread_pool, ArcsArgs, FloatVectorFormat, GlobalArgs, GranularityArgs, Layout,
    NumThreadsArg, PageRankArgs,
};
use anyhow::{ensure, Result};
use clap::Parser;
use dsi_progress_logger::{progress_logger, ProgressLog};
use predicates::Predicate;
use sparserank::prelude::*;
use sparserank_algo::rank::pagerank::preds::PredParams;
use sparserank_algo::rank::pagerank::PageRank;
use sparserank_algo::rank::PowerIteration;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "pagerank",
    about = "Compute PageRank by power iteration on a graph read from an edge list.",
    long_about = None
)]
pub struct CliArgs {
    /// The file containing the edge list.
    pub arcs: PathBuf,

    #[arg(short, long)]
    /// Where to store the rank vector.
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Layout::Row)]
    /// The adjacency layout.
    pub layout: Layout,

    #[arg(long, conflicts_with = "num_threads")]
    /// Use the sequential algorithm.
    pub sequential: bool,

    #[arg(long)]
    /// Path to a vector to start the iteration from (default: uniform).
    pub initial: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The input format for the initial vector.
    pub initial_fmt: FloatVectorFormat,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The output format for the rank vector.
    pub fmt: FloatVectorFormat,

    #[arg(long)]
    /// Decimal digits for text output formats.
    pub precision: Option<usize>,

    #[clap(flatten)]
    pub pr: PageRankArgs,

    #[clap(flatten)]
    pub arcs_args: ArcsArgs,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[clap(flatten)]
    pub granularity: GranularityArgs,
}

/// Builds a graph with the given layout, logging its statistics.
pub fn build_graph<G: SparseAdjacency>(arcs: &Arcs, layout: Layout) -> G {
    let start = Instant::now();
    let graph = G::from_arcs(arcs.num_nodes, &arcs.arcs);
    log::info!(
        "Built {layout} layout in {:?}: {} nodes, {} arcs, {} dead ends, density {:e}",
        start.elapsed(),
        graph.num_nodes(),
        graph.num_arcs(),
        graph.num_dead_ends(),
        graph.density()
    );
    graph
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let predicate = args.pr.predicate()?;

    let mut pl = progress_logger![];
    global_args.configure(&mut pl);

    let arcs = load_arcs(&args.arcs, &args.arcs_args, &mut pl)?;

    let initial = args
        .initial
        .as_ref()
        .map(|path| args.initial_fmt.load(path))
        .transpose()?;
    if let Some(initial) = &initial {
        ensure!(
            initial.len() == arcs.num_nodes,
            "The initial vector has {} entries, but the graph has {} nodes",
            initial.len(),
            arcs.num_nodes
        );
    }

    let rank = match args.layout {
        Layout::Column => {
            let graph: ColGraph = build_graph(&arcs, args.layout);
            pagerank(&graph, &args, initial.as_deref(), predicate, &mut pl)?
        }
        Layout::Row => {
            let graph: RowGraph = build_graph(&arcs, args.layout);
            pagerank(&graph, &args, initial.as_deref(), predicate, &mut pl)?
        }
    };

    if let Some((node, value)) = rank
        .iter()
        .enumerate()
        .max_by(|(_, x), (_, y)| x.total_cmp(y))
    {
        log::info!("Highest rank: node {node} ({value})");
    }

    if let Some(output) = &args.output {
        args.fmt.store(output, &rank, args.precision)?;
    }

    Ok(())
}

fn pagerank<'a, G: PowerIteration>(
    graph: &'a G,
    args: &CliArgs,
    initial: Option<&'a [f64]>,
    predicate: impl Predicate<PredParams>,
    pl: &mut impl ProgressLog,
) -> Result<Box<[f64]>> {
    let mut pr = PageRank::new(graph);
    pr.beta(args.pr.beta)
        .initial(initial)
        .granularity(args.granularity.granularity());

    let start = Instant::now();
    if args.sequential {
        pr.run_with_logging(predicate, pl);
    } else {
        let thread_pool = get_thread_pool(args.num_threads.num_threads)?;
        pr.par_run_with_logging(predicate, &thread_pool, pl);
    }

    log::info!(
        "Completed after {} iteration(s) in {:?}, norm delta = {}",
        pr.iterations(),
        start.elapsed(),
        pr.norm_delta()
    );

    Ok(pr.into_rank())
}
