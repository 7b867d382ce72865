/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]
#![allow(clippy::type_complexity)]

use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dsi_progress_logger::ProgressLog;
use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
use jiff::{SpanRound, Unit};
use predicates::prelude::*;
use sparserank::utils::Granularity;
use sparserank_algo::rank::pagerank::preds::{L2Norm, MaxIter, PredParams};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    /// Returns the package version, followed by the git commit and the build
    /// environment.
    pub fn version_string() -> String {
        let commit = match (GIT_COMMIT_HASH_SHORT, GIT_DIRTY) {
            (Some(hash), Some(true)) => format!("commit {hash}, dirty"),
            (Some(hash), _) => format!("commit {hash}"),
            (None, _) => "no git information".to_string(),
        };
        format!("{PKG_VERSION} ({commit})\nbuilt on {BUILD_DATE} for {TARGET} with {RUSTC_VERSION}")
    }
}

/// Options of the edge-list loader (see [`arcs`]).
#[derive(Args, Debug, Clone)]
pub struct ArcsArgs {
    #[arg(long, default_value_t = '#')]
    /// Lines starting with this character are comments.
    pub line_comment_symbol: char,

    #[arg(long, default_value_t = 0)]
    /// Number of lines to skip at the start of the file, e.g., a header.
    pub lines_to_skip: usize,

    #[arg(long)]
    /// Stop after reading this many arcs.
    pub max_arcs: Option<usize>,

    #[arg(long)]
    /// Column separator (default: any whitespace).
    pub separator: Option<char>,

    #[arg(long, default_value_t = 0)]
    /// Zero-based column of the source node.
    pub source_column: usize,

    #[arg(long, default_value_t = 1)]
    /// Zero-based column of the target node.
    pub target_column: usize,

    #[arg(long)]
    /// Use the identifiers in the file as nodes, instead of relabeling them in
    /// order of first appearance.
    pub exact: bool,
}

impl Default for ArcsArgs {
    fn default() -> Self {
        Self {
            line_comment_symbol: '#',
            lines_to_skip: 0,
            max_arcs: None,
            separator: None,
            source_column: 0,
            target_column: 1,
            exact: false,
        }
    }
}

/// Parses a positive number of threads.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    match arg.parse::<usize>()? {
        0 => bail!("The number of threads must be positive"),
        num_threads => Ok(num_threads),
    }
}

#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = num_cpus::get().max(1), value_parser = num_threads_parser)]
    /// Number of threads (default: all available CPUs).
    pub num_threads: usize,
}

#[derive(Args, Debug)]
pub struct GranularityArgs {
    #[arg(long, conflicts_with = "node_granularity")]
    /// Size of the blocks of nodes handed out to threads, as an approximate
    /// number of arcs (advanced option).
    pub arc_granularity: Option<u64>,

    #[arg(long)]
    /// Size of the blocks of nodes handed out to threads (advanced option;
    /// default: 1000).
    pub node_granularity: Option<usize>,
}

impl GranularityArgs {
    /// Returns the granularity selected on the command line.
    pub fn granularity(&self) -> Granularity {
        self.arc_granularity
            .map(Granularity::Arcs)
            .or(self.node_granularity.map(Granularity::Nodes))
            .unwrap_or_default()
    }
}

/// Shared CLI arguments for commands computing PageRank.
#[derive(Args, Debug)]
pub struct PageRankArgs {
    #[arg(short, long, default_value_t = 0.85)]
    /// The damping factor β (must be in the interval [0 . . 1]).
    pub beta: f64,

    #[arg(long, default_value_t = 50)]
    /// Maximum number of iterations.
    pub max_iter: usize,

    #[arg(short, long, default_value_t = 1E-7)]
    /// Stop when the ℓ₂ norm of the difference between successive
    /// approximations is at most this value.
    pub tolerance: f64,
}

impl PageRankArgs {
    /// Checks the arguments and returns the corresponding stopping predicate.
    pub fn predicate(&self) -> Result<impl Predicate<PredParams> + Clone> {
        ensure!(
            (0.0..=1.0).contains(&self.beta),
            "The damping factor must be in [0 . . 1], got {}",
            self.beta
        );
        Ok(MaxIter::from(self.max_iter).or(L2Norm::try_from(self.tolerance)?))
    }
}

/// The adjacency layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Successor lists; rank is scattered along arcs.
    Column,
    /// Predecessor lists, outdegrees and dead ends; rank is gathered along
    /// arcs.
    Row,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Column => f.write_str("column"),
            Layout::Row => f.write_str("row"),
        }
    }
}

/// Formats of files containing a vector of floats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FloatVectorFormat {
    /// One value per line.
    Ascii,
    /// A JSON array.
    Json,
}

impl FloatVectorFormat {
    /// Writes `values` at `path`, creating missing parent directories.
    ///
    /// With `precision` set, values are written with that many decimal
    /// digits; otherwise, with the shortest representation that parses back
    /// to the same value.
    pub fn store(
        &self,
        path: impl AsRef<Path>,
        values: &[f64],
        precision: Option<usize>,
    ) -> Result<()> {
        let path = path.as_ref();
        create_parent_dir(path)?;
        let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        log::info!(
            "Storing {} values in {:?} format at {}",
            values.len(),
            self,
            path.display()
        );

        let render = |x: &f64| match precision {
            Some(digits) => format!("{x:.digits$}"),
            None => x.to_string(),
        };
        let written = match (self, precision) {
            (FloatVectorFormat::Ascii, _) => values
                .iter()
                .try_for_each(|x| writeln!(writer, "{}", render(x))),
            (FloatVectorFormat::Json, None) => {
                serde_json::to_writer(&mut writer, values).map_err(std::io::Error::from)
            }
            (FloatVectorFormat::Json, Some(_)) => {
                let items = values.iter().map(render).collect::<Vec<_>>();
                write!(writer, "[{}]", items.join(", "))
            }
        };
        written
            .and_then(|()| writer.flush())
            .with_context(|| format!("Cannot write {}", path.display()))
    }

    /// Reads a vector from `path`. Empty lines of ASCII files are ignored.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<f64>> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
        let reader = BufReader::new(file);
        log::info!("Loading a vector in {:?} format from {}", self, path.display());

        match self {
            FloatVectorFormat::Ascii => {
                let mut values = Vec::new();
                for (line_num, line) in reader.lines().enumerate() {
                    let line = line.with_context(|| {
                        format!("Cannot read line {} of {}", line_num + 1, path.display())
                    })?;
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    values.push(line.parse::<f64>().with_context(|| {
                        format!("Line {} of {}: {line:?} is not a float", line_num + 1, path.display())
                    })?);
                }
                Ok(values)
            }
            FloatVectorFormat::Json => serde_json::from_reader(reader)
                .with_context(|| format!("Cannot parse a JSON array of floats in {}", path.display())),
        }
    }
}

/// Builds a thread pool with `num_threads` threads.
pub fn get_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .with_context(|| format!("Cannot build a thread pool with {num_threads} threads"))?;
    log::info!("Thread pool: {} threads", thread_pool.current_num_threads());
    Ok(thread_pool)
}

/// Creates the missing ancestors of `path`.
pub fn create_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory {}", dir.display())),
        _ => Ok(()),
    }
}

/// Parses a duration such as `1d2h3m4s567`: amounts are followed by a unit
/// among `d`, `h`, `m` and `s`, and a trailing amount without unit is in
/// milliseconds. Whitespace is ignored.
fn parse_duration(value: &str) -> Result<Duration> {
    ensure!(
        !value.trim().is_empty(),
        "Empty duration (use 0 to log at every update)"
    );
    let mut millis = 0u64;
    let mut amount = String::new();
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            amount.push(c);
            continue;
        }
        let unit: u64 = match c {
            's' => 1_000,
            'm' => 60 * 1_000,
            'h' => 60 * 60 * 1_000,
            'd' => 24 * 60 * 60 * 1_000,
            _ => bail!("Unknown unit {c:?} in duration {value:?}"),
        };
        let amount_value = amount
            .parse::<u64>()
            .with_context(|| format!("Missing amount before {c:?} in duration {value:?}"))?;
        millis += amount_value * unit;
        amount.clear();
    }
    if !amount.is_empty() {
        millis += amount.parse::<u64>()?;
    }
    Ok(Duration::from_millis(millis))
}

/// Formats a duration compactly, e.g., `1h2m3s45ms`, rounding to
/// milliseconds.
fn format_elapsed(elapsed: Duration) -> String {
    let span = jiff::Span::new()
        .seconds(elapsed.as_secs() as i64)
        .milliseconds(elapsed.subsec_millis() as i64);
    let rounding = SpanRound::new()
        .largest(Unit::Day)
        .smallest(Unit::Millisecond)
        .days_are_24_hours();
    match span.round(rounding) {
        Ok(span) => SpanPrinter::new()
            .spacing(Spacing::None)
            .designator(Designator::Compact)
            .span_to_string(&span),
        Err(_) => format!("{elapsed:?}"),
    }
}

/// Initializes `env_logger` (default level `info`) with lines containing the
/// wall-clock time, the time elapsed since initialization, the level, the
/// thread and the target of each record.
pub fn init_env_logger() -> Result<()> {
    let start = Instant::now();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let now = jiff::Timestamp::try_from(SystemTime::now()).map_err(std::io::Error::other)?;
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{} {} {style}{}{style:#} [{:?}] {} - {}",
                now.strftime("%F %T%.3f"),
                format_elapsed(start.elapsed()),
                record.level(),
                std::thread::current().id(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .context("Cannot initialize the logger")
}

/// Options shared by all subcommands.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global = true, display_order = 1000)]
    /// Interval between progress logs (default: 10s), e.g., "1m30s"; units are
    /// d, h, m and s, and a bare number is in milliseconds.
    pub log_interval: Option<Duration>,
}

impl GlobalArgs {
    /// Applies the global options to a progress logger.
    pub fn configure(&self, pl: &mut impl ProgressLog) {
        if let Some(log_interval) = self.log_interval {
            pl.log_interval(log_interval);
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[clap(name = "pagerank", visible_alias = "pr")]
    PageRank(pagerank::CliArgs),
    Check(check::CliArgs),
    Bench(bench::CliArgs),
    Random(random::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "sparserank", version=build_info::version_string())]
/// Tools computing PageRank over sparse graphs read from edge lists.
///
/// Logging is configured by the RUST_LOG environment variable (see
/// <https://docs.rs/env_logger/latest/env_logger/>); the default level is
/// `info`.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

pub mod arcs;
pub mod bench;
pub mod check;
pub mod pagerank;
pub mod random;

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = Instant::now();
    let Cli {
        command,
        args: global_args,
    } = Cli::parse_from(args);
    let result = match command {
        SubCommands::PageRank(args) => pagerank::main(global_args, args),
        SubCommands::Check(args) => check::main(global_args, args),
        SubCommands::Bench(args) => bench::main(global_args, args),
        SubCommands::Random(args) => random::main(global_args, args),
    };
    result?;
    log::info!("Done in {}", format_elapsed(start.elapsed()));
    Ok(())
}
