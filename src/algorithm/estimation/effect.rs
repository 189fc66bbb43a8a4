//! Treatment effect estimation on matched pairs
//!
//! Everything here is a pure function of a [`MatchSet`] and the outcome and
//! weight vectors of the analysed households.

use serde::Serialize;

use crate::algorithm::estimation::significance::{
    TestResult, mann_whitney_u, paired_t_test, wilcoxon_signed_rank,
};
use crate::algorithm::estimation::statistics::{
    mean, median, percent_positive, std_dev, weighted_mean,
};
use crate::algorithm::matching::types::MatchSet;

/// Normal critical value for a 95% interval
pub const Z_95: f64 = 1.96;

/// Effect of treatment on the treated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectEstimate {
    /// Mean paired difference (ATT)
    pub att: f64,
    /// Paired difference weighted by treated sampling weights
    pub att_weighted: f64,
    /// Standard error of the ATT
    pub se: f64,
    /// Lower bound of the normal 95% interval
    pub ci_lower: f64,
    /// Upper bound of the normal 95% interval
    pub ci_upper: f64,
    /// Paired t-test; `None` when unavailable
    pub paired_t: Option<TestResult>,
    /// Wilcoxon signed-rank test; `None` when unavailable
    pub wilcoxon: Option<TestResult>,
    /// Standardized effect size of the paired differences
    pub cohens_d: f64,
}

/// Outcome summary of the matched sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedOutcomes {
    /// Mean outcome of matched treated households
    pub mean_treated: f64,
    /// Mean outcome of matched control households
    pub mean_control: f64,
    /// Median outcome of matched treated households
    pub median_treated: f64,
    /// Median outcome of matched control households
    pub median_control: f64,
    /// Difference of the medians
    pub median_diff: f64,
    /// Percentage of matched treated households with any spending
    pub pct_treated_any_spend: f64,
    /// Percentage of matched control households with any spending
    pub pct_control_any_spend: f64,
}

/// Naive comparison of all treated and control households, ignoring matching
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedComparison {
    /// Mean outcome of all treated households in scope
    pub mean_treated: f64,
    /// Mean outcome of all control households in scope
    pub mean_control: f64,
    /// Difference of the means
    pub naive_diff: f64,
    /// Mann-Whitney U test; `None` when unavailable
    pub mann_whitney: Option<TestResult>,
}

fn matched_outcome_vectors(match_set: &MatchSet, outcomes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    match_set
        .matches
        .iter()
        .map(|m| (outcomes[m.treated], outcomes[m.control]))
        .unzip()
}

/// Estimate the treatment effect from matched pairs
///
/// # Arguments
///
/// * `match_set` - Accepted pairs
/// * `outcomes` - Outcome per household position
/// * `weights` - Sampling weight per household position
///
/// # Returns
///
/// The ATT with its standard error (`sd(diff, ddof = 1) / √n`), normal 95%
/// interval, paired tests and Cohen's d
#[must_use]
pub fn estimate_effect(match_set: &MatchSet, outcomes: &[f64], weights: &[f64]) -> EffectEstimate {
    let (y_treated, y_control) = matched_outcome_vectors(match_set, outcomes);
    let w_treated: Vec<f64> = match_set.matches.iter().map(|m| weights[m.treated]).collect();
    let diffs: Vec<f64> = y_treated.iter().zip(&y_control).map(|(t, c)| t - c).collect();

    let att = mean(&diffs);
    let att_weighted = weighted_mean(&diffs, &w_treated);
    let sd = std_dev(&diffs, 1);
    let se = sd / (diffs.len() as f64).sqrt();
    let cohens_d = att / if sd > 0.0 { sd } else { 1.0 };

    EffectEstimate {
        att,
        att_weighted,
        se,
        ci_lower: Z_95.mul_add(-se, att),
        ci_upper: Z_95.mul_add(se, att),
        paired_t: paired_t_test(&y_treated, &y_control),
        wilcoxon: wilcoxon_signed_rank(&y_treated, &y_control),
        cohens_d,
    }
}

/// Summarise matched outcomes
#[must_use]
pub fn summarise_matched(match_set: &MatchSet, outcomes: &[f64]) -> MatchedOutcomes {
    let (y_treated, y_control) = matched_outcome_vectors(match_set, outcomes);
    let median_treated = median(&y_treated);
    let median_control = median(&y_control);
    MatchedOutcomes {
        mean_treated: mean(&y_treated),
        mean_control: mean(&y_control),
        median_treated,
        median_control,
        median_diff: median_treated - median_control,
        pct_treated_any_spend: percent_positive(&y_treated),
        pct_control_any_spend: percent_positive(&y_control),
    }
}

/// Compare all treated and all control outcomes without matching
#[must_use]
pub fn naive_comparison(treated: &[f64], control: &[f64]) -> UnmatchedComparison {
    let mean_treated = mean(treated);
    let mean_control = mean(control);
    UnmatchedComparison {
        mean_treated,
        mean_control,
        naive_diff: mean_treated - mean_control,
        mann_whitney: mann_whitney_u(treated, control),
    }
}
