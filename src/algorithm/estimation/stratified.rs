//! Per-province analyses and count-weighted pooling

use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::algorithm::analysis::AnalysisResult;
use crate::algorithm::estimation::effect::Z_95;
use crate::algorithm::matching::matcher::Matcher;
use crate::config::MatchingConfig;
use crate::error::{MatchError, Result};
use crate::models::{Household, province_name};

/// Analysis of one stratum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StratumResult {
    /// Province code of the stratum
    pub province: i32,
    /// Province name, when the code is known
    pub name: Option<&'static str>,
    /// Households of the stratum in scope
    pub n_households: usize,
    /// Analysis, or `None` when the stratum had insufficient data
    pub result: Option<AnalysisResult>,
}

/// ATT pooled across strata by matched-pair counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PooledEstimate {
    /// `Σ nₛ·ATTₛ / Σ nₛ`
    pub pooled_att: f64,
    /// `√Σ (nₛ/N)²·SEₛ²`
    pub pooled_se: f64,
    /// Lower bound of the normal 95% interval
    pub ci_lower: f64,
    /// Upper bound of the normal 95% interval
    pub ci_upper: f64,
    /// Matched pairs over all pooled strata
    pub total_matched: usize,
    /// Number of strata that contributed
    pub strata_used: usize,
}

/// Per-stratum results with their pooled estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StratifiedResult {
    /// One entry per requested stratum, in request order
    pub strata: Vec<StratumResult>,
    /// Pooled estimate; `None` when no stratum produced a result
    pub pooled: Option<PooledEstimate>,
}

impl StratifiedResult {
    /// Result for one province code
    #[must_use]
    pub fn stratum(&self, province: i32) -> Option<&StratumResult> {
        self.strata.iter().find(|s| s.province == province)
    }
}

/// Pool `(n_matched, att, se)` triples of successful strata
#[must_use]
pub fn pool_estimates(estimates: &[(usize, f64, f64)]) -> Option<PooledEstimate> {
    let total: usize = estimates.iter().map(|e| e.0).sum();
    if total == 0 {
        return None;
    }
    let n_total = total as f64;

    let pooled_att = estimates
        .iter()
        .map(|&(n, att, _)| n as f64 * att)
        .sum::<f64>()
        / n_total;
    let pooled_se = estimates
        .iter()
        .map(|&(n, _, se)| (n as f64 / n_total).powi(2) * se.powi(2))
        .sum::<f64>()
        .sqrt();

    Some(PooledEstimate {
        pooled_att,
        pooled_se,
        ci_lower: Z_95.mul_add(-pooled_se, pooled_att),
        ci_upper: Z_95.mul_add(pooled_se, pooled_att),
        total_matched: total,
        strata_used: estimates.len(),
    })
}

/// Run one analysis per province code inside `scope` and pool the successes
///
/// Every stratum uses `config` as given. Strata with insufficient data are
/// kept with `result: None` and left out of the pooled estimate.
pub fn run_stratified(
    households: &[Household],
    scope: &[usize],
    provinces: &[i32],
    config: &MatchingConfig,
) -> Result<StratifiedResult> {
    run_stratified_with_calipers(households, scope, provinces, config, &BTreeMap::new())
}

/// Like [`run_stratified`], with the caliper of listed provinces replaced
///
/// Provinces missing from `calipers` keep the caliper of `config`.
pub fn run_stratified_with_calipers(
    households: &[Household],
    scope: &[usize],
    provinces: &[i32],
    config: &MatchingConfig,
    calipers: &BTreeMap<i32, f64>,
) -> Result<StratifiedResult> {
    let codes = scope
        .iter()
        .map(|&p| {
            households
                .get(p)
                .ok_or(MatchError::IndexOutOfRange {
                    index: p,
                    len: households.len(),
                })?
                .province_code()
        })
        .collect::<Result<Vec<i32>>>()?;

    let mut strata = Vec::with_capacity(provinces.len());
    for &province in provinces {
        let stratum_scope: Vec<usize> = scope
            .iter()
            .zip(&codes)
            .filter(|&(_, &code)| code == province)
            .map(|(&p, _)| p)
            .collect();

        let name = province_name(province);
        let label = name.map_or_else(|| format!("province {province}"), str::to_string);
        debug!("Stratum {label}: {} households", stratum_scope.len());

        let stratum_config = calipers
            .get(&province)
            .map_or_else(|| config.clone(), |&caliper| config.with_caliper(caliper));
        let result = Matcher::new(stratum_config)
            .with_label(label)
            .analyse(households, &stratum_scope)?;

        strata.push(StratumResult {
            province,
            name,
            n_households: stratum_scope.len(),
            result,
        });
    }

    let estimates: Vec<(usize, f64, f64)> = strata
        .iter()
        .filter_map(|s| s.result.as_ref())
        .map(|r| (r.n_matched, r.effect.att, r.effect.se))
        .collect();
    let pooled = pool_estimates(&estimates);

    match &pooled {
        Some(p) => info!(
            "Pooled ATT over {} strata: {:.2} (SE {:.2})",
            p.strata_used, p.pooled_att, p.pooled_se
        ),
        None => info!("No stratum produced an estimate; pooled ATT unavailable"),
    }

    Ok(StratifiedResult { strata, pooled })
}
