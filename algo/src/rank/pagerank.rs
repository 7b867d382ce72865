/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank by power iteration.
//!
//! # The formula
//!
//! If we denote with *P* the row-normalized adjacency matrix of the graph
//! (with zero rows for dead ends), with **d** the characteristic vector of dead
//! ends, with *n* the number of nodes and with β the damping factor, the
//! PageRank vector is the stationary distribution of the Markov chain
//!
//! > **x** ↦ β **x** ( *P*  +  **d**ᵀ **1** / *n* )  +  (1 − β) **1** / *n*,
//!
//! that is, at each step the surfer follows a uniformly chosen arc with
//! probability β, and jumps to a uniformly chosen node (_teleports_) with
//! probability 1 − β. Dead ends redistribute their rank uniformly. Parallel
//! arcs are counted with their multiplicity, so each arc leaving a node *j*
//! carries a fraction 1 / outdegree(*j*) of its rank.
//!
//! The power method starts from the uniform distribution (or from a
//! [user-provided vector](PageRank::initial)) and applies the map above until
//! a stopping [predicate](preds) is satisfied. At least one iteration is
//! always performed.
//!
//! # Layouts
//!
//! The update is computed by the [`PowerIteration`] kernels of the adjacency
//! structure: [`ColGraph`](sparserank::graphs::prelude::ColGraph) scatters the
//! rank of each node to its successors, while
//! [`RowGraph`](sparserank::graphs::prelude::RowGraph) gathers for each node
//! the rank of its predecessors. The two layouts compute the same vector up
//! to floating-point rounding.
//!
//! # Parallelism
//!
//! Parallel runs use the threads of a user-provided [`ThreadPool`]. Each
//! iteration is split into phases separated by a full barrier, and no phase
//! of an iteration starts before the previous iteration is complete. All
//! reductions are Kahan-compensated, so results obtained with different
//! numbers of threads are equal up to floating-point rounding. A pool with a
//! single thread uses the sequential kernel, and thus gives exactly the same
//! result of a sequential run.
//!
//! # Stopping criteria
//!
//! The [`run`](PageRank::run) method accepts a composable [`Predicate`] that is
//! evaluated after each iteration. The predicate receives the current
//! iteration number and the _norm delta_, that is, the ℓ₂ norm
//! ‖**x**⁽ᵗ⁾ − **x**⁽ᵗ⁻¹⁾‖₂ of the difference between the last two
//! approximations.
//!
//! # Distribution check
//!
//! At the end of a run the sum of the rank vector is checked: if, rounded to
//! three decimal digits, it is not one, a [`DistributionWarning`] is logged and
//! returned. The rank vector is left untouched.

pub mod preds {
    //! Stopping conditions for [`PageRank`](super::PageRank).
    //!
    //! After each iteration the engine evaluates its predicate on a
    //! [`PredParams`], and stops as soon as the predicate is true. Conditions
    //! are combined with the [`or`](PredicateBooleanExt::or) and
    //! [`and`](PredicateBooleanExt::and) combinators of the `predicates` crate:
    //!
    //! ```
    //! # fn main() -> anyhow::Result<()> {
    //! use predicates::prelude::*;
    //! use sparserank_algo::rank::pagerank::preds::{L2Norm, MaxIter, PredParams};
    //!
    //! let stop = MaxIter::from(50).or(L2Norm::new(1E-7)?);
    //! assert!(stop.eval(&PredParams { iteration: 50, norm_delta: 1.0 }));
    //! assert!(stop.eval(&PredParams { iteration: 3, norm_delta: 1E-8 }));
    //! assert!(!stop.eval(&PredParams { iteration: 3, norm_delta: 1E-3 }));
    //! # Ok(())
    //! # }
    //! ```

    use anyhow::{ensure, Result};
    use predicates::reflection::PredicateReflection;
    #[allow(unused_imports)] // for links
    use predicates::boolean::PredicateBooleanExt;
    use predicates::Predicate;
    use std::fmt::{Display, Formatter};

    /// The state of a run after an iteration.
    #[derive(Debug, Clone, Copy)]
    pub struct PredParams {
        /// The number of iterations performed so far (at least one).
        pub iteration: usize,
        /// The ℓ₂ norm of the difference between the last two approximations.
        pub norm_delta: f64,
    }

    /// True once the given number of iterations has been performed.
    ///
    /// A bound of zero behaves like a bound of one.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MaxIter(usize);

    impl From<usize> for MaxIter {
        fn from(max_iter: usize) -> Self {
            Self(max_iter)
        }
    }

    impl Display for MaxIter {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "at most {} iterations", self.0)
        }
    }

    impl PredicateReflection for MaxIter {}

    impl Predicate<PredParams> for MaxIter {
        fn eval(&self, params: &PredParams) -> bool {
            params.iteration >= self.0
        }
    }

    /// True once the ℓ₂ norm of the difference between the last two
    /// approximations is at most a threshold.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct L2Norm(f64);

    impl L2Norm {
        /// The default threshold.
        pub const DEFAULT_THRESHOLD: f64 = 1E-7;

        /// Returns a predicate with the given threshold, which must be a
        /// nonnegative number (possibly infinite).
        pub fn new(threshold: f64) -> Result<Self> {
            ensure!(
                threshold >= 0.0,
                "The threshold must be a nonnegative number, got {threshold}"
            );
            Ok(Self(threshold))
        }
    }

    impl TryFrom<f64> for L2Norm {
        type Error = anyhow::Error;
        fn try_from(threshold: f64) -> Result<Self> {
            Self::new(threshold)
        }
    }

    impl Default for L2Norm {
        fn default() -> Self {
            Self(Self::DEFAULT_THRESHOLD)
        }
    }

    impl Display for L2Norm {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "ℓ₂ norm delta at most {}", self.0)
        }
    }

    impl PredicateReflection for L2Norm {}

    impl Predicate<PredParams> for L2Norm {
        fn eval(&self, params: &PredParams) -> bool {
            params.norm_delta <= self.0
        }
    }
}

use anyhow::{ensure, Context, Result};
use dsi_progress_logger::{no_logging, ProgressLog};
use predicates::prelude::*;
use rayon::ThreadPool;
use sparserank::utils::Granularity;

use super::PowerIteration;
use crate::utils::{check_distribution, DistributionWarning};

/// Computes PageRank by power iteration, sequentially or in parallel.
///
/// The struct is configured via setters and then executed via
/// [`run`](Self::run) or [`par_run`](Self::par_run). After completion the rank
/// vector is available via the [`rank`](Self::rank) method.
///
/// # Examples
///
/// ```
/// use sparserank::prelude::*;
/// use sparserank_algo::rank::pagerank::{preds, PageRank};
///
/// // 0 → 1, 0 → 2, 1 → 2, 2 → 0, 3 → 0, 4 → 3
/// let arcs = [(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)];
/// let g = RowGraph::from_arcs(5, &arcs);
///
/// let mut pr = PageRank::new(&g);
/// let warning = pr.run(preds::L2Norm::try_from(1E-9).unwrap());
///
/// assert!(warning.is_none());
/// assert_eq!(pr.rank().len(), 5);
/// assert!((pr.rank().iter().sum::<f64>() - 1.0).abs() < 1E-9);
/// ```
///
/// A parallel run on the column layout, starting from a custom vector:
///
/// ```
/// use sparserank::prelude::*;
/// use sparserank_algo::prelude::*;
///
/// let arcs = [(0, 1), (0, 2), (1, 2), (2, 0), (3, 0), (4, 3)];
/// let g = ColGraph::from_arcs(5, &arcs);
/// let initial = [0.5, 0.2, 0.1, 0.1, 0.1];
///
/// let mut pr = PageRank::new(&g);
/// pr.beta(0.9)
///     .initial(Some(&initial))
///     .granularity(Granularity::Nodes(2));
/// pr.par_run(preds::MaxIter::from(10), &thread_pool![2]);
///
/// assert_eq!(pr.iterations(), 10);
/// assert!(pr.rank()[2] > pr.rank()[4]);
/// ```
pub struct PageRank<'a, G: PowerIteration> {
    graph: &'a G,
    beta: f64,
    initial: Option<&'a [f64]>,
    granularity: Granularity,

    rank: Box<[f64]>,
    iteration: usize,
    norm_delta: f64,
    warning: Option<DistributionWarning>,
}

impl<G: PowerIteration> std::fmt::Debug for PageRank<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRank")
            .field("beta", &self.beta)
            .field("granularity", &self.granularity)
            .field("norm_delta", &self.norm_delta)
            .field("iteration", &self.iteration)
            .field("warning", &self.warning)
            .finish_non_exhaustive()
    }
}

impl<'a, G: PowerIteration> PageRank<'a, G> {
    /// The default damping factor.
    pub const DEFAULT_BETA: f64 = 0.85;

    /// Creates a new PageRank computation on the given graph.
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            beta: Self::DEFAULT_BETA,
            initial: None,
            granularity: Granularity::default(),
            rank: Box::default(),
            iteration: 0,
            norm_delta: f64::INFINITY,
            warning: None,
        }
    }

    /// Sets the damping factor β.
    ///
    /// # Panics
    ///
    /// Panics if `beta` is not in the interval [0 . . 1].
    pub fn beta(&mut self, beta: f64) -> &mut Self {
        assert!(
            (0.0..=1.0).contains(&beta),
            "The damping factor must be in [0 . . 1], got {beta}"
        );
        self.beta = beta;
        self
    }

    /// Sets the vector the iteration starts from.
    ///
    /// Pass `None` to revert to the uniform distribution (1/*n*).
    ///
    /// # Panics
    ///
    /// Panics if the length of the vector does not match the number of nodes.
    pub fn initial(&mut self, initial: Option<&'a [f64]>) -> &mut Self {
        if let Some(v) = initial {
            let n = self.graph.num_nodes();
            assert_eq!(
                v.len(),
                n,
                "Initial vector length ({}) does not match the number of nodes ({n})",
                v.len()
            );
        }
        self.initial = initial;
        self
    }

    /// Sets the parallel task granularity.
    ///
    /// The granularity expresses how many
    /// [nodes](Granularity::node_granularity) will be passed to a Rayon task at
    /// a time.
    pub fn granularity(&mut self, granularity: Granularity) -> &mut Self {
        self.granularity = granularity;
        self
    }

    /// Returns the rank vector.
    ///
    /// After a run, this contains the computed PageRank values; before the
    /// first run it is empty.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Consumes the computation, returning the rank vector.
    pub fn into_rank(self) -> Box<[f64]> {
        self.rank
    }

    /// Returns the number of iterations performed by the last run.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Returns the ℓ₂ norm of the difference between the last two
    /// approximations.
    pub fn norm_delta(&self) -> f64 {
        self.norm_delta
    }

    /// Returns the distribution warning of the last run, if any.
    pub fn warning(&self) -> Option<DistributionWarning> {
        self.warning
    }

    /// Runs the PageRank computation sequentially until the given predicate
    /// is satisfied.
    pub fn run(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
    ) -> Option<DistributionWarning> {
        self.run_with_logging(predicate, no_logging![])
    }

    /// Runs the PageRank computation sequentially until the given predicate
    /// is satisfied, logging iterations on `pl`.
    ///
    /// The options of `pl` will be preserved, making thus possible to
    /// customize the logs.
    pub fn run_with_logging(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
        pl: &mut impl ProgressLog,
    ) -> Option<DistributionWarning> {
        log::info!("Layout: {}", std::any::type_name::<G>());
        self.iterate(predicate, pl, |graph, rank, new_rank, beta| {
            graph.step(rank, new_rank, beta)
        })
    }

    /// Runs the PageRank computation using the threads of `thread_pool` until
    /// the given predicate is satisfied.
    pub fn par_run(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
        thread_pool: &ThreadPool,
    ) -> Option<DistributionWarning> {
        self.par_run_with_logging(predicate, thread_pool, no_logging![])
    }

    /// Runs the PageRank computation using the threads of `thread_pool` until
    /// the given predicate is satisfied, logging iterations on `pl`.
    ///
    /// If the pool has a single thread, this method is equivalent to
    /// [`run_with_logging`](Self::run_with_logging).
    pub fn par_run_with_logging(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
        thread_pool: &ThreadPool,
        pl: &mut impl ProgressLog,
    ) -> Option<DistributionWarning> {
        let num_threads = thread_pool.current_num_threads();
        if num_threads == 1 {
            return self.run_with_logging(predicate, pl);
        }

        let node_granularity = self
            .granularity
            .node_granularity(self.graph.num_nodes(), self.graph.num_arcs());
        log::info!("Layout: {}", std::any::type_name::<G>());
        log::info!("Threads: {num_threads}, granularity: {node_granularity} nodes");

        let mut scratch = self.graph.scratch(num_threads);
        self.iterate(predicate, pl, |graph, rank, new_rank, beta| {
            graph.par_step(
                rank,
                new_rank,
                beta,
                node_granularity,
                thread_pool,
                &mut scratch,
            )
        })
    }

    fn iterate(
        &mut self,
        predicate: impl Predicate<preds::PredParams>,
        pl: &mut impl ProgressLog,
        mut step: impl FnMut(&G, &[f64], &mut [f64], f64) -> f64,
    ) -> Option<DistributionWarning> {
        let n = self.graph.num_nodes();
        self.iteration = 0;
        self.norm_delta = f64::INFINITY;
        self.warning = None;

        if n == 0 {
            self.rank = Box::default();
            return None;
        }

        log::info!("Beta: {}", self.beta);
        log::info!(
            "Initial vector: {}",
            if self.initial.is_some() {
                "custom"
            } else {
                "uniform"
            }
        );
        log::info!("Stopping criterion: {}", predicate);
        log::info!("{} dead ends", self.graph.num_dead_ends());

        let mut rank = match self.initial {
            Some(v) => v.to_vec().into_boxed_slice(),
            None => vec![1.0 / n as f64; n].into_boxed_slice(),
        };
        let mut new_rank = vec![0.0; n].into_boxed_slice();

        pl.item_name("iteration");
        pl.expected_updates(None);
        pl.start(format!("Computing PageRank (beta={})...", self.beta));

        loop {
            let squared_norm = step(self.graph, &rank, &mut new_rank, self.beta);
            std::mem::swap(&mut rank, &mut new_rank);

            self.iteration += 1;
            self.norm_delta = squared_norm.sqrt();

            log::debug!(
                "Iteration {}: norm delta = {}",
                self.iteration,
                self.norm_delta
            );

            pl.update_and_display();

            if predicate.eval(&preds::PredParams {
                iteration: self.iteration,
                norm_delta: self.norm_delta,
            }) {
                break;
            }
        }

        pl.done();
        log::info!(
            "Completed {} iterations (norm delta: {})",
            self.iteration,
            self.norm_delta
        );

        self.rank = rank;
        self.warning = check_distribution(&self.rank).err();
        if let Some(warning) = self.warning {
            log::warn!("{warning}");
        }
        self.warning
    }
}

/// Runs PageRank on `graph` with the given parameters.
///
/// The iteration starts from `initial`, or from the uniform distribution if
/// `initial` is `None`, and stops after `max_iter` iterations or when the ℓ₂
/// norm of the difference between successive approximations is at most
/// `tolerance`, whichever comes first; at least one iteration is always
/// performed.
///
/// If `num_threads` is `Some(1)`, the computation is sequential; otherwise, a
/// thread pool with the given number of threads, or with as many threads as
/// available CPUs if `num_threads` is `None`, is used.
///
/// The returned [`PageRank`] provides the rank vector, the number of
/// iterations, and the distribution warning, if any.
pub fn pagerank<'a, G: PowerIteration>(
    graph: &'a G,
    initial: Option<&'a [f64]>,
    beta: f64,
    max_iter: usize,
    tolerance: f64,
    num_threads: Option<usize>,
) -> Result<PageRank<'a, G>> {
    ensure!(
        (0.0..=1.0).contains(&beta),
        "The damping factor must be in [0 . . 1], got {beta}"
    );
    if let Some(v) = initial {
        ensure!(
            v.len() == graph.num_nodes(),
            "Initial vector length ({}) does not match the number of nodes ({})",
            v.len(),
            graph.num_nodes()
        );
    }
    ensure!(
        num_threads != Some(0),
        "The number of threads must be positive"
    );
    let predicate = preds::MaxIter::from(max_iter).or(preds::L2Norm::try_from(tolerance)?);

    let mut pr = PageRank::new(graph);
    pr.beta(beta).initial(initial);

    match num_threads {
        Some(1) => {
            pr.run(predicate);
        }
        _ => {
            let num_threads = num_threads.unwrap_or_else(num_cpus::get);
            let thread_pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .with_context(|| format!("Cannot build a thread pool with {num_threads} threads"))?;
            pr.par_run(predicate, &thread_pool);
        }
    }

    Ok(pr)
}
