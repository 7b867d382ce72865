/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::arcs::load_arcs;
use crate::pagerank::build_graph;
use crate::{
    get_thread_pool, ArcsArgs, GlobalArgs, GranularityArgs, Layout, NumThreadsArg, PageRankArgs,
};
use anyhow::{bail, Result};
use clap::Parser;
use dsi_progress_logger::progress_logger;
use predicates::Predicate;
use rayon::ThreadPool;
use sparserank::prelude::*;
use sparserank::utils::Granularity;
use sparserank_algo::rank::pagerank::preds::PredParams;
use sparserank_algo::rank::pagerank::PageRank;
use sparserank_algo::rank::PowerIteration;
use sparserank_algo::utils::compare;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "check",
    about = "Compute PageRank sequentially and in parallel using both layouts, and check that all results agree.",
    long_about = None
)]
pub struct CliArgs {
    /// The file containing the edge list.
    pub arcs: PathBuf,

    #[arg(long, default_value_t = 1E-6)]
    /// The maximum absolute difference allowed between corresponding entries
    /// of two rank vectors.
    pub eps: f64,

    #[clap(flatten)]
    pub pr: PageRankArgs,

    #[clap(flatten)]
    pub arcs_args: ArcsArgs,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[clap(flatten)]
    pub granularity: GranularityArgs,
}

/// Runs PageRank, sequentially if `thread_pool` is `None`, and returns the
/// rank vector.
fn timed_pagerank<G: PowerIteration>(
    name: &str,
    graph: &G,
    beta: f64,
    granularity: Granularity,
    predicate: impl Predicate<PredParams>,
    thread_pool: Option<&ThreadPool>,
) -> Box<[f64]> {
    let mut pr = PageRank::new(graph);
    pr.beta(beta).granularity(granularity);
    let start = Instant::now();
    match thread_pool {
        None => pr.run(predicate),
        Some(thread_pool) => pr.par_run(predicate, thread_pool),
    };
    log::info!(
        "{name}: {} iteration(s) in {:?}",
        pr.iterations(),
        start.elapsed()
    );
    pr.into_rank()
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let predicate = args.pr.predicate()?;
    let granularity = args.granularity.granularity();

    let mut pl = progress_logger![];
    global_args.configure(&mut pl);

    let arcs = load_arcs(&args.arcs, &args.arcs_args, &mut pl)?;
    let col: ColGraph = build_graph(&arcs, Layout::Column);
    let row: RowGraph = build_graph(&arcs, Layout::Row);
    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;

    let reference = timed_pagerank(
        "Sequential column",
        &col,
        args.pr.beta,
        granularity,
        predicate.clone(),
        None,
    );
    let results = [
        (
            "Parallel column",
            timed_pagerank(
                "Parallel column",
                &col,
                args.pr.beta,
                granularity,
                predicate.clone(),
                Some(&thread_pool),
            ),
        ),
        (
            "Sequential row",
            timed_pagerank(
                "Sequential row",
                &row,
                args.pr.beta,
                granularity,
                predicate.clone(),
                None,
            ),
        ),
        (
            "Parallel row",
            timed_pagerank(
                "Parallel row",
                &row,
                args.pr.beta,
                granularity,
                predicate,
                Some(&thread_pool),
            ),
        ),
    ];

    let mut failures = 0;
    for (name, rank) in &results {
        if compare(&reference, rank, args.eps) {
            log::info!("{name}: OK");
        } else {
            log::error!("{name}: the result differs from the sequential column result");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!(
            "{failures} of {} results differ from the sequential column result (eps = {})",
            results.len(),
            args.eps
        );
    }
    log::info!("All results agree (eps = {})", args.eps);
    Ok(())
}
