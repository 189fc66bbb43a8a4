//! Result bundle of one matching analysis

use serde::Serialize;
use std::fmt;

use crate::algorithm::estimation::bootstrap::BootstrapInterval;
use crate::algorithm::estimation::effect::{EffectEstimate, MatchedOutcomes, UnmatchedComparison};
use crate::algorithm::matching::balance::BalanceTable;
use crate::error::Result;

/// Outcome of matching and estimation over one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Treated households considered
    pub n_treated_total: usize,
    /// Control households considered
    pub n_control_total: usize,
    /// Accepted pairs
    pub n_matched: usize,
    /// Percentage of treated households matched
    pub match_rate: f64,
    /// Comparison of all treated and control households
    pub unmatched: UnmatchedComparison,
    /// Outcome summary of the matched sample
    pub matched: MatchedOutcomes,
    /// Treatment effect on the treated
    pub effect: EffectEstimate,
    /// Covariate balance before and after matching
    pub balance: BalanceTable,
    /// Bootstrap interval, when one was requested and available
    pub bootstrap: Option<BootstrapInterval>,
}

impl AnalysisResult {
    /// Attach a bootstrap interval
    #[must_use]
    pub fn with_bootstrap(mut self, bootstrap: Option<BootstrapInterval>) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// JSON mapping of the result
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Matched {} of {} treated households ({:.1}%) against {} controls",
            self.n_matched, self.n_treated_total, self.match_rate, self.n_control_total
        )?;
        writeln!(
            f,
            "ATT: {:.2} (SE {:.2}, 95% CI {:.2} to {:.2})",
            self.effect.att, self.effect.se, self.effect.ci_lower, self.effect.ci_upper
        )?;
        writeln!(f, "Weighted ATT: {:.2}", self.effect.att_weighted)?;
        writeln!(f, "Naive difference: {:.2}", self.unmatched.naive_diff)?;
        if let Some(bootstrap) = &self.bootstrap {
            writeln!(
                f,
                "Bootstrap: mean {:.2}, CI {:.2} to {:.2} ({} of {} replications)",
                bootstrap.mean_att,
                bootstrap.ci_lower,
                bootstrap.ci_upper,
                bootstrap.successful,
                bootstrap.replications
            )?;
        }
        write!(f, "{}", self.balance)
    }
}
