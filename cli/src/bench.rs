/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::arcs::load_arcs;
use crate::pagerank::build_graph;
use crate::{
    create_parent_dir, get_thread_pool, num_threads_parser, ArcsArgs, GlobalArgs,
    GranularityArgs, Layout, PageRankArgs,
};
use anyhow::{Context, Result};
use clap::Parser;
use dsi_progress_logger::progress_logger;
use predicates::Predicate;
use sparserank::prelude::*;
use sparserank_algo::rank::pagerank::preds::PredParams;
use sparserank_algo::rank::pagerank::PageRank;
use sparserank_algo::rank::PowerIteration;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "bench",
    about = "Compute PageRank with 1, 2, … threads and store the elapsed times in a CSV file for each layout.",
    long_about = "Compute PageRank with 1, 2, … threads and store the elapsed times in a CSV file for each layout. With one thread the sequential algorithm is used. Results for the graph in FILE.EXT using layout LAYOUT are stored in DIR/pagerank_speedup_FILE_LAYOUT.csv, with header n_thread,milliseconds."
)]
pub struct CliArgs {
    /// The file containing the edge list.
    pub arcs: PathBuf,

    #[arg(short, long, default_value = "stats")]
    /// The directory where the CSV files will be stored.
    pub output_dir: PathBuf,

    #[arg(long, default_value_t = num_cpus::get().max(1), value_parser = num_threads_parser)]
    /// The maximum number of threads.
    pub max_threads: usize,

    #[arg(short, long, value_enum)]
    /// The layouts to benchmark (default: all); can be repeated.
    pub layout: Vec<Layout>,

    #[clap(flatten)]
    pub pr: PageRankArgs,

    #[clap(flatten)]
    pub arcs_args: ArcsArgs,

    #[clap(flatten)]
    pub granularity: GranularityArgs,
}

/// Returns the path of the CSV file for the given graph file and layout.
pub fn csv_path(output_dir: impl AsRef<Path>, arcs: impl AsRef<Path>, layout: Layout) -> Result<PathBuf> {
    let arcs = arcs.as_ref();
    let stem = arcs
        .file_stem()
        .with_context(|| format!("Cannot extract a file name from {}", arcs.display()))?;
    Ok(output_dir.as_ref().join(format!(
        "pagerank_speedup_{}_{layout}.csv",
        stem.to_string_lossy()
    )))
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let predicate = args.pr.predicate()?;

    let mut pl = progress_logger![];
    global_args.configure(&mut pl);

    let arcs = load_arcs(&args.arcs, &args.arcs_args, &mut pl)?;

    let layouts = if args.layout.is_empty() {
        vec![Layout::Column, Layout::Row]
    } else {
        args.layout.clone()
    };

    for layout in layouts {
        let path = csv_path(&args.output_dir, &args.arcs, layout)?;
        match layout {
            Layout::Column => {
                let graph: ColGraph = build_graph(&arcs, layout);
                sweep(&graph, layout, &args, predicate.clone(), &path)?;
            }
            Layout::Row => {
                let graph: RowGraph = build_graph(&arcs, layout);
                sweep(&graph, layout, &args, predicate.clone(), &path)?;
            }
        }
    }

    Ok(())
}

/// Times PageRank with 1 to `args.max_threads` threads, writing the results
/// at `path`.
fn sweep<G: PowerIteration>(
    graph: &G,
    layout: Layout,
    args: &CliArgs,
    predicate: impl Predicate<PredParams> + Clone,
    path: &Path,
) -> Result<()> {
    create_parent_dir(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    let mut file = BufWriter::new(file);
    writeln!(file, "n_thread,milliseconds")?;

    for num_threads in 1..=args.max_threads {
        let mut pr = PageRank::new(graph);
        pr.beta(args.pr.beta)
            .granularity(args.granularity.granularity());

        let start;
        if num_threads == 1 {
            start = Instant::now();
            pr.run(predicate.clone());
        } else {
            let thread_pool = get_thread_pool(num_threads)?;
            start = Instant::now();
            pr.par_run(predicate.clone(), &thread_pool);
        }
        let millis = start.elapsed().as_millis();

        log::info!(
            "{layout} layout, {num_threads} thread(s): {millis} ms, {} iteration(s)",
            pr.iterations()
        );
        writeln!(file, "{num_threads},{millis}")
            .with_context(|| format!("Could not write to {}", path.display()))?;
    }

    file.flush()
        .with_context(|| format!("Could not write to {}", path.display()))?;
    log::info!("Results stored at {}", path.display());
    Ok(())
}
