/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Utilities for checking and comparing rank vectors.

use kahan::KahanSum;

/// Creates a new [`rayon::ThreadPool`] with the given number of threads, or
/// with the default number of threads if no argument is given.
///
/// # Panics
///
/// Panics if the thread pool cannot be built.
#[macro_export]
macro_rules! thread_pool {
    () => {
        rayon::ThreadPoolBuilder::new()
            .build()
            .expect("Cannot build a ThreadPool with default parameters")
    };
    ($num_threads:expr) => {
        rayon::ThreadPoolBuilder::new()
            .num_threads($num_threads)
            .build()
            .unwrap_or_else(|_| {
                panic!(
                    "Cannot build a ThreadPool with default parameters and {} threads",
                    $num_threads,
                )
            })
    };
}

/// The diagnostic returned when a rank vector is not a probability
/// distribution.
///
/// This is never a fault: the rank vector it refers to is returned unchanged.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("The rank vector is not a distribution: its entries sum to {sum}")]
pub struct DistributionWarning {
    /// The sum of the entries of the rank vector.
    pub sum: f64,
}

/// Rounds `x` to the given number of decimal digits.
pub fn round(x: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (x * scale).round() / scale
}

/// Checks that the entries of `v` sum to one, up to rounding to three decimal
/// digits.
pub fn check_distribution(v: &[f64]) -> Result<(), DistributionWarning> {
    let sum = v.iter().fold(KahanSum::<f64>::new(), |acc, &x| acc + x).sum();
    if round(sum, 3) == 1.0 {
        Ok(())
    } else {
        Err(DistributionWarning { sum })
    }
}

/// Returns whether two vectors have the same length and differ by at most
/// `tolerance` in each entry.
///
/// Entries whose difference is NaN (e.g., because one of them is NaN) never
/// match. The first difference found is logged at debug level.
pub fn compare(v1: &[f64], v2: &[f64], tolerance: f64) -> bool {
    if v1.len() != v2.len() {
        log::debug!("Different lengths: {} != {}", v1.len(), v2.len());
        return false;
    }
    match v1
        .iter()
        .zip(v2)
        .position(|(x, y)| {
            let diff = (x - y).abs();
            diff.is_nan() || diff > tolerance
        })
    {
        Some(i) => {
            log::debug!(
                "First difference at index {i}: {} != {} (tolerance {tolerance})",
                v1[i],
                v2[i]
            );
            false
        }
        None => true,
    }
}
