//! Core matching algorithm implementation
//!
//! This module implements the Matcher struct which orchestrates the matching
//! process: covariates, pooled standardization, neighbour index, greedy
//! assignment, then effect estimation and balance diagnostics.

use log::debug;
use std::time::Instant;

use crate::algorithm::analysis::AnalysisResult;
use crate::algorithm::estimation::effect::{estimate_effect, naive_comparison, summarise_matched};
use crate::algorithm::matching::assigner::{assign_greedy, processing_order};
use crate::algorithm::matching::balance::BalanceTable;
use crate::algorithm::matching::covariates::{CovariateMatrix, build_covariate_matrix};
use crate::algorithm::matching::neighbor_index::{NeighborIndex, Neighbors};
use crate::algorithm::matching::standardize::{StandardizationParams, standardize};
use crate::algorithm::matching::types::{Match, MatchSet};
use crate::config::MatchingConfig;
use crate::error::{MatchError, Result};
use crate::models::Household;
use crate::utils::logging::{log_analysis_complete, log_analysis_start, log_insufficient_data};

/// Matching state for one scope, kept for estimation and balance
struct MatchingRun {
    match_set: MatchSet,
    /// Raw covariates of the scope, rows in scope order
    covariates: CovariateMatrix,
    /// Scope rows of treated units, in scope order
    treated_rows: Vec<usize>,
    /// Scope rows of control units, in scope order
    control_rows: Vec<usize>,
    /// Scope rows of matched treated and control units, in match order
    matched_rows: (Vec<usize>, Vec<usize>),
}

/// Matcher for pairing treated households with controls
#[derive(Debug, Clone)]
pub struct Matcher {
    /// Matching configuration
    config: MatchingConfig,
    /// Label used in log lines
    label: String,
    /// Log run milestones at debug level only
    quiet: bool,
}

impl Matcher {
    /// Create a new matcher with the given configuration
    #[must_use]
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            config,
            label: "analysis".to_string(),
            quiet: false,
        }
    }

    /// Set the label used in log lines
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Log run milestones at debug level only, for repeated runs
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Matching configuration in use
    #[must_use]
    pub const fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Pair treated households with controls inside `scope`
    ///
    /// # Arguments
    ///
    /// * `households` - All households of the run
    /// * `scope` - Distinct positions of the households to consider
    ///
    /// # Returns
    ///
    /// `Ok(None)` when either group or the number of matches falls short of
    /// the configured minimum; an error only for missing fields, bad
    /// positions or an invalid configuration.
    pub fn match_units(&self, households: &[Household], scope: &[usize]) -> Result<Option<MatchSet>> {
        Ok(self.run(households, scope)?.map(|run| run.match_set))
    }

    /// Match and estimate over every household
    pub fn analyse_all(&self, households: &[Household]) -> Result<Option<AnalysisResult>> {
        let scope: Vec<usize> = (0..households.len()).collect();
        self.analyse(households, &scope)
    }

    /// Match inside `scope`, then estimate effects and balance
    pub fn analyse(&self, households: &[Household], scope: &[usize]) -> Result<Option<AnalysisResult>> {
        let Some(run) = self.run(households, scope)? else {
            return Ok(None);
        };

        let mut outcomes = vec![f64::NAN; households.len()];
        let mut weights = vec![f64::NAN; households.len()];
        for &position in scope {
            let household = &households[position];
            outcomes[position] = household.outcome()?;
            weights[position] = household.sampling_weight()?;
        }

        let match_set = &run.match_set;
        let effect = estimate_effect(match_set, &outcomes, &weights);
        let matched = summarise_matched(match_set, &outcomes);

        let treated_outcomes: Vec<f64> = match_set.treated_pool.iter().map(|&p| outcomes[p]).collect();
        let control_outcomes: Vec<f64> = match_set.control_pool.iter().map(|&p| outcomes[p]).collect();
        let unmatched = naive_comparison(&treated_outcomes, &control_outcomes);

        let balance = BalanceTable::compute(
            &run.covariates.select_rows(&run.treated_rows),
            &run.covariates.select_rows(&run.control_rows),
            &run.covariates.select_rows(&run.matched_rows.0),
            &run.covariates.select_rows(&run.matched_rows.1),
        )?;

        debug!(
            "{}: ATT {:.2} (SE {:.2}) over {} pairs",
            self.label,
            effect.att,
            effect.se,
            match_set.n_matched()
        );

        Ok(Some(AnalysisResult {
            n_treated_total: match_set.n_treated(),
            n_control_total: match_set.n_control(),
            n_matched: match_set.n_matched(),
            match_rate: match_set.match_rate(),
            unmatched,
            matched,
            effect,
            balance,
            bootstrap: None,
        }))
    }

    fn run(&self, households: &[Household], scope: &[usize]) -> Result<Option<MatchingRun>> {
        self.config.validate()?;
        let start_time = Instant::now();

        let mut treated_rows = Vec::new();
        let mut control_rows = Vec::new();
        for (row, &position) in scope.iter().enumerate() {
            let household = households.get(position).ok_or(MatchError::IndexOutOfRange {
                index: position,
                len: households.len(),
            })?;
            if household.treated {
                treated_rows.push(row);
            } else {
                control_rows.push(row);
            }
        }

        if !self.quiet {
            log_analysis_start(&self.label, treated_rows.len(), control_rows.len());
        }

        let min_group = self.config.min_group_size;
        if treated_rows.len() < min_group || control_rows.len() < min_group {
            self.insufficient(&format!(
                "{} treated and {} control households, need at least {min_group} of each",
                treated_rows.len(),
                control_rows.len()
            ));
            return Ok(None);
        }

        // Standardize once over the pooled scope and apply to both groups
        let covariates = build_covariate_matrix(households, Some(scope))?;
        let params = StandardizationParams::fit(&covariates);
        let (treated_std, _) = standardize(&covariates.select_rows(&treated_rows), Some(&params))?;
        let (control_std, _) = standardize(&covariates.select_rows(&control_rows), Some(&params))?;

        let index = NeighborIndex::build(&control_std);
        let k = self.config.neighbours.min(control_rows.len());
        let candidates: Vec<Neighbors> = treated_std.iter_rows().map(|row| index.query(row, k)).collect();

        let threshold = self.config.caliper * covariates.cols() as f64;
        let order = processing_order(treated_rows.len(), self.config.random_seed);
        let metric = self.config.distance;
        let assignments = assign_greedy(&candidates, &order, threshold, |d| metric.convert_squared(d));

        let treated_pool: Vec<usize> = treated_rows.iter().map(|&r| scope[r]).collect();
        let control_pool: Vec<usize> = control_rows.iter().map(|&r| scope[r]).collect();

        let mut matched_treated_rows = Vec::with_capacity(assignments.len());
        let mut matched_control_rows = Vec::with_capacity(assignments.len());
        let matches: Vec<Match> = assignments
            .iter()
            .map(|a| {
                let treated_row = treated_rows[a.treated_row];
                let control_row = control_rows[a.control_row];
                matched_treated_rows.push(treated_row);
                matched_control_rows.push(control_row);
                let treated = scope[treated_row];
                let control = scope[control_row];
                Match {
                    treated,
                    control,
                    treated_id: households[treated].id.clone(),
                    control_id: households[control].id.clone(),
                    distance: a.distance,
                }
            })
            .collect();

        let match_set = MatchSet {
            matches,
            treated_pool,
            control_pool,
        };

        debug!(
            "{}: {} of {} treated households within threshold {threshold}",
            self.label,
            match_set.n_matched(),
            match_set.n_treated()
        );

        if match_set.n_matched() < self.config.min_matches {
            self.insufficient(&format!(
                "{} matched pairs, need at least {}",
                match_set.n_matched(),
                self.config.min_matches
            ));
            return Ok(None);
        }

        if !self.quiet {
            log_analysis_complete(
                &self.label,
                match_set.n_matched(),
                match_set.n_treated(),
                Some(start_time.elapsed()),
            );
        }

        Ok(Some(MatchingRun {
            match_set,
            covariates,
            treated_rows,
            control_rows,
            matched_rows: (matched_treated_rows, matched_control_rows),
        }))
    }

    fn insufficient(&self, reason: &str) {
        if self.quiet {
            debug!("{}: {reason}", self.label);
        } else {
            log_insufficient_data(&self.label, reason);
        }
    }
}
