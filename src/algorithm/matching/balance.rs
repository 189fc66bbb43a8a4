//! Balance assessment for matched samples
//!
//! This module provides functions and structures for assessing the balance
//! of covariates between treated and control groups, before and after
//! matching.

use log::debug;
use serde::Serialize;
use std::fmt;

use crate::algorithm::estimation::statistics::{mean, variance};
use crate::algorithm::matching::covariates::{Covariate, CovariateMatrix};
use crate::error::{MatchError, Result};

/// Floor on the pre-matching SMD when computing the percent reduction
pub const REDUCTION_EPSILON: f64 = 1e-10;

/// Balance of a single covariate before and after matching
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceMetric {
    /// Name of the covariate
    pub covariate: &'static str,

    /// Standardized mean difference over the full eligible population
    pub smd_before: f64,

    /// Standardized mean difference over the matched subset
    pub smd_after: f64,

    /// Percent reduction of |SMD| achieved by matching
    pub reduction_pct: f64,

    /// Mean for matched treated units
    pub treated_mean: f64,

    /// Mean for matched control units
    pub control_mean: f64,
}

/// Summary statistics for a balance table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    /// Number of covariates with |SMD after| above the threshold
    pub imbalanced_covariates: usize,

    /// Maximum |SMD| after matching
    pub max_standardized_difference: f64,

    /// Mean |SMD| after matching
    pub mean_absolute_standardized_difference: f64,

    /// Total number of covariates
    pub total_covariates: usize,
}

/// Balance diagnostics for every matching covariate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceTable {
    /// Balance metrics for each covariate, in covariate order
    pub metrics: Vec<BalanceMetric>,

    /// Summary statistics
    pub summary: BalanceSummary,
}

/// Standardized mean difference with pooled population standard deviation
///
/// `(mean_t - mean_c) / √((var_t + var_c) / 2)`, or 0 when the pooled
/// standard deviation is 0.
#[must_use]
pub fn standardized_mean_difference(treated: &[f64], control: &[f64]) -> f64 {
    let pooled_std = ((variance(treated, 0) + variance(control, 0)) / 2.0).sqrt();
    if pooled_std > 0.0 {
        (mean(treated) - mean(control)) / pooled_std
    } else {
        0.0
    }
}

/// Percent reduction in |SMD| from before to after matching
#[must_use]
pub fn reduction_pct(smd_before: f64, smd_after: f64) -> f64 {
    (1.0 - smd_after.abs() / smd_before.abs().max(REDUCTION_EPSILON)) * 100.0
}

/// Calculator for balance tables
#[derive(Debug, Clone)]
pub struct BalanceCalculator {
    /// Threshold for marking a covariate as imbalanced
    imbalance_threshold: f64,
}

impl Default for BalanceCalculator {
    fn default() -> Self {
        Self {
            imbalance_threshold: 0.1, // Standardized difference > 0.1 is imbalanced
        }
    }
}

impl BalanceCalculator {
    /// Create a new balance calculator with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set threshold for marking a covariate as imbalanced
    #[must_use]
    pub const fn with_imbalance_threshold(mut self, threshold: f64) -> Self {
        self.imbalance_threshold = threshold;
        self
    }

    /// Calculate the balance table
    ///
    /// # Arguments
    ///
    /// * `treated_before` / `control_before` - Raw covariates of all eligible units
    /// * `treated_after` / `control_after` - Raw covariates of matched units
    pub fn calculate_balance(
        &self,
        treated_before: &CovariateMatrix,
        control_before: &CovariateMatrix,
        treated_after: &CovariateMatrix,
        control_after: &CovariateMatrix,
    ) -> Result<BalanceTable> {
        for matrix in [control_before, treated_after, control_after] {
            if matrix.cols() != treated_before.cols() {
                return Err(MatchError::DimensionMismatch {
                    expected: treated_before.cols(),
                    actual: matrix.cols(),
                });
            }
        }
        if treated_before.cols() != Covariate::COUNT {
            return Err(MatchError::DimensionMismatch {
                expected: Covariate::COUNT,
                actual: treated_before.cols(),
            });
        }

        let metrics: Vec<BalanceMetric> = Covariate::ALL
            .iter()
            .enumerate()
            .map(|(col, covariate)| {
                let tb: Vec<f64> = treated_before.column(col).collect();
                let cb: Vec<f64> = control_before.column(col).collect();
                let ta: Vec<f64> = treated_after.column(col).collect();
                let ca: Vec<f64> = control_after.column(col).collect();

                let smd_before = standardized_mean_difference(&tb, &cb);
                let smd_after = standardized_mean_difference(&ta, &ca);
                BalanceMetric {
                    covariate: covariate.name(),
                    smd_before,
                    smd_after,
                    reduction_pct: reduction_pct(smd_before, smd_after),
                    treated_mean: mean(&ta),
                    control_mean: mean(&ca),
                }
            })
            .collect();

        let summary = self.calculate_summary_statistics(&metrics);

        debug!(
            "Balance assessment complete: {} of {} covariates are imbalanced after matching (|smd| > {})",
            summary.imbalanced_covariates, summary.total_covariates, self.imbalance_threshold
        );

        Ok(BalanceTable { metrics, summary })
    }

    /// Calculate summary statistics for a set of balance metrics
    fn calculate_summary_statistics(&self, metrics: &[BalanceMetric]) -> BalanceSummary {
        let mut imbalanced = 0;
        let mut max_std_diff = 0.0;
        let mut sum_abs_std_diff = 0.0;

        for metric in metrics {
            let abs_std_diff = metric.smd_after.abs();

            if abs_std_diff > self.imbalance_threshold {
                imbalanced += 1;
            }

            if abs_std_diff > max_std_diff {
                max_std_diff = abs_std_diff;
            }

            sum_abs_std_diff += abs_std_diff;
        }

        let mean_abs_std_diff = if metrics.is_empty() {
            0.0
        } else {
            sum_abs_std_diff / metrics.len() as f64
        };

        BalanceSummary {
            imbalanced_covariates: imbalanced,
            max_standardized_difference: max_std_diff,
            mean_absolute_standardized_difference: mean_abs_std_diff,
            total_covariates: metrics.len(),
        }
    }
}

impl BalanceTable {
    /// Compute a balance table with the default imbalance threshold
    pub fn compute(
        treated_before: &CovariateMatrix,
        control_before: &CovariateMatrix,
        treated_after: &CovariateMatrix,
        control_after: &CovariateMatrix,
    ) -> Result<Self> {
        BalanceCalculator::new().calculate_balance(
            treated_before,
            control_before,
            treated_after,
            control_after,
        )
    }

    /// Look up the metric of one covariate
    #[must_use]
    pub fn metric(&self, covariate: Covariate) -> Option<&BalanceMetric> {
        self.metrics.iter().find(|m| m.covariate == covariate.name())
    }
}

impl fmt::Display for BalanceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Balance Summary:\n\
             - Total covariates: {}\n\
             - Imbalanced covariates after matching: {}\n\
             - Maximum standardized difference: {:.4}\n\
             - Mean absolute standardized difference: {:.4}\n",
            self.summary.total_covariates,
            self.summary.imbalanced_covariates,
            self.summary.max_standardized_difference,
            self.summary.mean_absolute_standardized_difference
        )?;
        writeln!(
            f,
            "{:<20} {:>10} {:>10} {:>12}",
            "Covariate", "Before", "After", "% Reduction"
        )?;
        for metric in &self.metrics {
            writeln!(
                f,
                "{:<20} {:>10.4} {:>10.4} {:>11.1}%",
                metric.covariate, metric.smd_before, metric.smd_after, metric.reduction_pct
            )?;
        }
        Ok(())
    }
}
