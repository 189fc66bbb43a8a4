//! Percentile bootstrap interval for the ATT
//!
//! Resamples are drawn in replication order from a single seeded generator.
//! Replications may run on the rayon pool, but results are collected in
//! replication order, so the interval does not depend on the thread count.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::algorithm::estimation::statistics::{mean, quantile_linear_sorted};
use crate::algorithm::matching::matcher::Matcher;
use crate::config::{BootstrapConfig, MatchingConfig};
use crate::error::{MatchError, Result};
use crate::models::Household;
use crate::utils::logging::progress::create_hidden_progress_bar;
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar, log_insufficient_data};

/// Resamples materialised at once
const RESAMPLE_BATCH: usize = 64;

/// Empirical bootstrap distribution summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapInterval {
    /// Mean of the replication ATTs
    pub mean_att: f64,
    /// Lower percentile bound
    pub ci_lower: f64,
    /// Upper percentile bound
    pub ci_upper: f64,
    /// Replications that produced an ATT
    pub successful: usize,
    /// Replications attempted
    pub replications: usize,
}

/// Bootstrap the ATT over `scope`
///
/// Each replication draws `scope.len()` positions with replacement, keeps the
/// duplicates as separate households, and re-runs matching with
/// `bootstrap.caliper` and the matching seed of `matching`.
///
/// # Returns
///
/// `Ok(None)` when fewer than `bootstrap.min_successful` replications
/// produced an ATT.
pub fn bootstrap_att(
    households: &[Household],
    scope: &[usize],
    matching: &MatchingConfig,
    bootstrap: &BootstrapConfig,
) -> Result<Option<BootstrapInterval>> {
    bootstrap.validate()?;
    if let Some(&index) = scope.iter().find(|&&p| p >= households.len()) {
        return Err(MatchError::IndexOutOfRange {
            index,
            len: households.len(),
        });
    }
    let start_time = Instant::now();
    let matcher = Matcher::new(matching.with_caliper(bootstrap.caliper))
        .with_label("bootstrap")
        .quiet();

    info!(
        "Bootstrapping ATT: {} replications over {} households",
        bootstrap.replications,
        scope.len()
    );

    let pb = if bootstrap.show_progress {
        create_main_progress_bar(bootstrap.replications as u64, Some("Bootstrap replications"))
    } else {
        create_hidden_progress_bar(bootstrap.replications as u64)
    };

    let mut rng = StdRng::seed_from_u64(bootstrap.random_seed);
    let mut atts = Vec::with_capacity(bootstrap.replications);
    let mut remaining = bootstrap.replications;

    while remaining > 0 {
        let batch_len = remaining.min(RESAMPLE_BATCH);
        let batch: Vec<Vec<usize>> = (0..batch_len)
            .map(|_| draw_resample(&mut rng, scope))
            .collect();

        let results: Vec<Option<f64>> = if bootstrap.use_parallel {
            batch
                .par_iter()
                .map(|resample| {
                    let att = replicate(&matcher, households, resample);
                    pb.inc(1);
                    att
                })
                .collect::<Result<_>>()?
        } else {
            batch
                .iter()
                .map(|resample| {
                    let att = replicate(&matcher, households, resample);
                    pb.inc(1);
                    att
                })
                .collect::<Result<_>>()?
        };

        atts.extend(results.into_iter().flatten());
        remaining -= batch_len;
    }

    finish_progress_bar(&pb, Some("Bootstrap complete"));

    let successful = atts.len();
    if successful < bootstrap.min_successful {
        log_insufficient_data(
            "bootstrap",
            &format!(
                "{successful} usable replications, need at least {}",
                bootstrap.min_successful
            ),
        );
        return Ok(None);
    }

    let mean_att = mean(&atts);
    atts.sort_by(f64::total_cmp);
    let interval = BootstrapInterval {
        mean_att,
        ci_lower: quantile_linear_sorted(&atts, bootstrap.alpha / 2.0),
        ci_upper: quantile_linear_sorted(&atts, 1.0 - bootstrap.alpha / 2.0),
        successful,
        replications: bootstrap.replications,
    };

    info!(
        "Bootstrap complete in {:.2?}: {successful}/{} usable, CI [{:.2}, {:.2}]",
        start_time.elapsed(),
        bootstrap.replications,
        interval.ci_lower,
        interval.ci_upper
    );

    Ok(Some(interval))
}

fn draw_resample(rng: &mut StdRng, scope: &[usize]) -> Vec<usize> {
    if scope.is_empty() {
        return Vec::new();
    }
    (0..scope.len())
        .map(|_| scope[rng.random_range(0..scope.len())])
        .collect()
}

/// Match one resample and return its ATT
fn replicate(matcher: &Matcher, households: &[Household], resample: &[usize]) -> Result<Option<f64>> {
    let sample: Vec<Household> = resample.iter().map(|&p| households[p].clone()).collect();
    let positions: Vec<usize> = (0..sample.len()).collect();

    let Some(match_set) = matcher.match_units(&sample, &positions)? else {
        return Ok(None);
    };

    let diffs = match_set
        .matches
        .iter()
        .map(|m| Ok(sample[m.treated].outcome()? - sample[m.control].outcome()?))
        .collect::<Result<Vec<f64>>>()?;

    let att = mean(&diffs);
    debug!("Bootstrap replication: {} pairs, ATT {att:.2}", diffs.len());
    Ok(Some(att))
}
