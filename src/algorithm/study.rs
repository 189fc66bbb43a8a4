//! Full study run: national, provincial and sensitivity analyses
//!
//! The runner only sequences analyses. Each one receives its own scope and
//! configuration and none shares state with another.

use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::algorithm::analysis::AnalysisResult;
use crate::algorithm::estimation::bootstrap::bootstrap_att;
use crate::algorithm::estimation::stratified::{PooledEstimate, run_stratified_with_calipers};
use crate::algorithm::matching::matcher::Matcher;
use crate::algorithm::population::eligibility::{FilterCriteria, HouseholdFilter};
use crate::common::traits::RecordSource;
use crate::config::StudyConfig;
use crate::error::Result;
use crate::models::Household;

/// Results of every analysis in a study
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyReport {
    /// National analysis with its bootstrap interval attached
    pub national: Option<AnalysisResult>,
    /// Per-province analyses keyed by province name; `None` for insufficient strata
    pub provincial: BTreeMap<String, Option<AnalysisResult>>,
    /// National analysis restricted to households with any health spending
    pub sensitivity_nonzero: Option<AnalysisResult>,
    /// Province-exact matching pooled across provinces
    pub sensitivity_exact_province: Option<PooledEstimate>,
}

impl StudyReport {
    /// JSON mapping of the report
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &std::path::Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        info!("Study report written to {}", path.display());
        Ok(())
    }
}

/// Runner for the complete set of analyses
#[derive(Debug, Clone, Default)]
pub struct StudyRunner {
    config: StudyConfig,
}

impl StudyRunner {
    /// Create a runner with the given configuration
    #[must_use]
    pub const fn new(config: StudyConfig) -> Self {
        Self { config }
    }

    /// Study configuration in use
    #[must_use]
    pub const fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Load households from `source` and run the study
    pub fn run_source<S: RecordSource + ?Sized>(&self, source: &S) -> Result<StudyReport> {
        let households = source.households()?;
        self.run(&households)
    }

    /// Run every analysis over `households`
    pub fn run(&self, households: &[Household]) -> Result<StudyReport> {
        self.config.validate()?;
        let start_time = Instant::now();
        let scope: Vec<usize> = (0..households.len()).collect();
        let matching = &self.config.matching;

        info!("Starting study over {} households", households.len());

        let mut national = Matcher::new(matching.clone())
            .with_label("national")
            .analyse(households, &scope)?;
        if self.config.run_bootstrap {
            if let Some(result) = national.take() {
                let interval = bootstrap_att(households, &scope, matching, &self.config.bootstrap)?;
                national = Some(result.with_bootstrap(interval));
            }
        }

        let stratified = run_stratified_with_calipers(
            households,
            &scope,
            &self.config.provinces,
            &matching.with_caliper(self.config.provincial_caliper),
            &self.config.province_calipers,
        )?;
        let sensitivity_exact_province = stratified.pooled.clone();
        let provincial: BTreeMap<String, Option<AnalysisResult>> = stratified
            .strata
            .into_iter()
            .map(|s| {
                let key = s
                    .name
                    .map_or_else(|| format!("Province {}", s.province), str::to_string);
                (key, s.result)
            })
            .collect();

        let nonzero: Vec<usize> = scope
            .iter()
            .copied()
            .filter(|&p| HouseholdFilter::AnyHealthSpend.meets_criteria(&households[p]))
            .collect();
        let sensitivity_nonzero = Matcher::new(matching.clone())
            .with_label("health expenditure > 0")
            .analyse(households, &nonzero)?;

        info!("Study complete in {:.2?}", start_time.elapsed());

        Ok(StudyReport {
            national,
            provincial,
            sensitivity_nonzero,
            sensitivity_exact_province,
        })
    }
}
