//! Nearest-neighbour matching engine for estimating the effect of
//! medical-scheme membership on out-of-pocket health expenditure.

pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{BootstrapConfig, DistanceMetric, MatchingConfig, StudyConfig};
pub use error::{MatchError, Result};
pub use models::{Household, HouseholdBuilder};

// Record sources
pub use common::traits::{JsonRecordSource, RecordSource};

// Matching and estimation
pub use algorithm::estimation::{
    BootstrapInterval, PooledEstimate, StratifiedResult, bootstrap_att, run_stratified,
    run_stratified_with_calipers,
};
pub use algorithm::matching::{BalanceTable, Covariate, MatchSet, Matcher};
pub use algorithm::population::{EligibilityCriteria, filter_eligible};
pub use algorithm::{AnalysisResult, StudyReport, StudyRunner};

// Logging
pub use utils::logging::init_logging;
