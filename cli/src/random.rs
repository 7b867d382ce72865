/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{create_parent_dir, GlobalArgs};
use anyhow::{ensure, Context, Result};
use clap::Parser;
use dsi_progress_logger::{progress_logger, ProgressLog};
use sparserank::graphs::prelude::ErdosRenyi;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "random",
    about = "Write the edge list of an Erdős–Rényi random graph, one arc per line, source and target separated by a TAB.",
    long_about = None
)]
pub struct CliArgs {
    #[arg(short, long)]
    /// The number of nodes.
    pub nodes: usize,

    #[arg(short, long)]
    /// The probability of an arc between two distinct nodes.
    pub prob: f64,

    #[arg(short, long, default_value_t = 0)]
    /// The seed of the pseudorandom number generator.
    pub seed: u64,

    #[arg(short, long)]
    /// Where to write the edge list (default: standard output).
    pub output: Option<PathBuf>,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(
        (0.0..=1.0).contains(&args.prob),
        "The probability must be in [0 . . 1], got {}",
        args.prob
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            create_parent_dir(path)?;
            let file = std::fs::File::create(path)
                .with_context(|| format!("Could not create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    let mut pl = progress_logger![];
    global_args.configure(&mut pl);
    pl.item_name("arc");
    pl.start(format!(
        "Generating arcs (n = {}, p = {}, seed = {})...",
        args.nodes, args.prob, args.seed
    ));

    let er = ErdosRenyi::new(args.nodes, args.prob, args.seed);
    for (src, dst) in er.arcs() {
        writeln!(out, "{src}\t{dst}").context("Could not write arc")?;
        pl.light_update();
    }
    out.flush().context("Could not write arcs")?;

    pl.done();
    Ok(())
}
