//! Covariate standardization
//!
//! Standardization parameters are fitted once per run over the reference
//! population and then passed explicitly to every call that rescales a
//! subset, so treated and control distances stay comparable.

use crate::algorithm::matching::covariates::CovariateMatrix;
use crate::error::{MatchError, Result};

/// Column means and standard deviations of a reference population
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizationParams {
    /// Column means
    pub mean: Vec<f64>,
    /// Column standard deviations; zero-variance columns hold 1
    pub std: Vec<f64>,
}

impl StandardizationParams {
    /// Fit parameters on a matrix
    ///
    /// Uses the population standard deviation (divisor `n`). A column whose
    /// standard deviation is exactly 0 gets 1 instead.
    #[must_use]
    pub fn fit(matrix: &CovariateMatrix) -> Self {
        let cols = matrix.cols();
        let n = matrix.rows() as f64;
        let mut mean = vec![0.0; cols];
        let mut std = vec![1.0; cols];

        if matrix.is_empty() {
            return Self { mean, std };
        }

        for (col, m) in mean.iter_mut().enumerate() {
            *m = matrix.column(col).sum::<f64>() / n;
        }
        for (col, s) in std.iter_mut().enumerate() {
            let variance = matrix
                .column(col)
                .map(|x| (x - mean[col]).powi(2))
                .sum::<f64>()
                / n;
            let sd = variance.sqrt();
            *s = if sd == 0.0 { 1.0 } else { sd };
        }

        Self { mean, std }
    }

    /// Number of columns the parameters cover
    #[must_use]
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    /// Check if the parameters cover no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Rescale a matrix with these parameters
    pub fn apply(&self, matrix: &CovariateMatrix) -> Result<CovariateMatrix> {
        if matrix.cols() != self.len() || self.std.len() != self.len() {
            return Err(MatchError::DimensionMismatch {
                expected: self.len(),
                actual: matrix.cols(),
            });
        }

        let mut scaled = matrix.clone();
        let cols = self.len();
        for (i, value) in scaled.data_mut().iter_mut().enumerate() {
            let col = i % cols;
            let sd = if self.std[col] == 0.0 { 1.0 } else { self.std[col] };
            *value = (*value - self.mean[col]) / sd;
        }
        Ok(scaled)
    }
}

/// Standardize columns to zero mean and unit variance
///
/// # Arguments
///
/// * `matrix` - Covariates to rescale
/// * `reference` - Parameters from a reference population; when `None` they
///   are fitted on `matrix` itself
///
/// # Returns
///
/// The standardized matrix together with the parameters actually used
pub fn standardize(
    matrix: &CovariateMatrix,
    reference: Option<&StandardizationParams>,
) -> Result<(CovariateMatrix, StandardizationParams)> {
    let params = match reference {
        Some(params) => params.clone(),
        None => StandardizationParams::fit(matrix),
    };
    let scaled = params.apply(matrix)?;
    Ok((scaled, params))
}
