//! Configuration for matching, bootstrap and study runs.
//!
//! All random state is driven by the seeds carried here. Every config struct
//! deserializes with field defaults, so a partial JSON document only overrides
//! what it names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{MatchError, Result};

/// Distance compared against the caliper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Sum of squared differences in standardized covariate space
    #[default]
    SquaredEuclidean,
    /// Square root of the squared Euclidean distance
    Euclidean,
}

impl DistanceMetric {
    /// Convert a squared Euclidean distance into this metric
    #[must_use]
    pub fn convert_squared(self, squared: f64) -> f64 {
        match self {
            Self::SquaredEuclidean => squared,
            Self::Euclidean => squared.sqrt(),
        }
    }
}

/// Configuration for one nearest-neighbour matching pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Caliper per covariate; the effective threshold is `caliper * covariate count`
    pub caliper: f64,
    /// Number of nearest control candidates retrieved per treated unit
    pub neighbours: usize,
    /// Minimum number of treated and of control units required
    pub min_group_size: usize,
    /// Minimum number of matched pairs required for estimation
    pub min_matches: usize,
    /// Seed for the treated processing order
    pub random_seed: u64,
    /// Distance compared against the caliper
    pub distance: DistanceMetric,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            caliper: 0.5,
            neighbours: 10,
            min_group_size: 5,
            min_matches: 5,
            random_seed: 42,
            distance: DistanceMetric::default(),
        }
    }
}

impl MatchingConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for constructing matching configuration
    #[must_use]
    pub fn builder() -> MatchingConfigBuilder {
        MatchingConfigBuilder::new()
    }

    /// Same configuration with a different caliper
    #[must_use]
    pub fn with_caliper(&self, caliper: f64) -> Self {
        Self {
            caliper,
            ..self.clone()
        }
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.caliper.is_finite() && self.caliper > 0.0) {
            return Err(MatchError::invalid_config(format!(
                "caliper must be a positive finite number, got {}",
                self.caliper
            )));
        }
        if self.neighbours == 0 {
            return Err(MatchError::invalid_config("neighbours must be at least 1"));
        }
        if self.min_matches == 0 {
            return Err(MatchError::invalid_config("min_matches must be at least 1"));
        }
        Ok(())
    }
}

impl fmt::Display for MatchingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matching Configuration:")?;
        writeln!(f, "  Caliper: {}", self.caliper)?;
        writeln!(f, "  Neighbour candidates: {}", self.neighbours)?;
        writeln!(f, "  Minimum group size: {}", self.min_group_size)?;
        writeln!(f, "  Minimum matches: {}", self.min_matches)?;
        writeln!(f, "  Random seed: {}", self.random_seed)?;
        writeln!(f, "  Distance: {:?}", self.distance)
    }
}

/// Builder for constructing matching configuration
#[derive(Debug, Clone, Default)]
pub struct MatchingConfigBuilder {
    config: MatchingConfig,
}

impl MatchingConfigBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the caliper
    #[must_use]
    pub const fn caliper(mut self, caliper: f64) -> Self {
        self.config.caliper = caliper;
        self
    }

    /// Set the number of neighbour candidates
    #[must_use]
    pub const fn neighbours(mut self, neighbours: usize) -> Self {
        self.config.neighbours = neighbours;
        self
    }

    /// Set the minimum group size
    #[must_use]
    pub const fn min_group_size(mut self, size: usize) -> Self {
        self.config.min_group_size = size;
        self
    }

    /// Set the minimum number of matches
    #[must_use]
    pub const fn min_matches(mut self, matches: usize) -> Self {
        self.config.min_matches = matches;
        self
    }

    /// Set the random seed
    #[must_use]
    pub const fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    /// Set the distance metric
    #[must_use]
    pub const fn distance(mut self, distance: DistanceMetric) -> Self {
        self.config.distance = distance;
        self
    }

    /// Build the matching configuration
    #[must_use]
    pub fn build(self) -> MatchingConfig {
        self.config
    }
}

/// Configuration for the bootstrap confidence interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of bootstrap replications
    pub replications: usize,
    /// Significance level of the percentile interval
    pub alpha: f64,
    /// Caliper used when re-matching each resample
    pub caliper: f64,
    /// Seed for drawing resamples, independent of the matching seed
    pub random_seed: u64,
    /// Minimum number of usable replications for an interval
    pub min_successful: usize,
    /// Whether to run replications on the rayon thread pool
    pub use_parallel: bool,
    /// Whether to show a progress bar
    pub show_progress: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            replications: 500,
            alpha: 0.05,
            caliper: 0.5,
            random_seed: 123,
            min_successful: 50,
            use_parallel: false,
            show_progress: false,
        }
    }
}

impl BootstrapConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of replications
    #[must_use]
    pub const fn with_replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    /// Set the significance level
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the resampling seed
    #[must_use]
    pub const fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Set the minimum number of usable replications
    #[must_use]
    pub const fn with_min_successful(mut self, min_successful: usize) -> Self {
        self.min_successful = min_successful;
        self
    }

    /// Set whether to run replications in parallel
    #[must_use]
    pub const fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.replications == 0 {
            return Err(MatchError::invalid_config("replications must be at least 1"));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(MatchError::invalid_config(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(self.caliper.is_finite() && self.caliper > 0.0) {
            return Err(MatchError::invalid_config(format!(
                "bootstrap caliper must be a positive finite number, got {}",
                self.caliper
            )));
        }
        Ok(())
    }
}

/// Configuration for a complete study run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Matching parameters for the national and sensitivity analyses
    pub matching: MatchingConfig,
    /// Caliper for per-province matching
    pub provincial_caliper: f64,
    /// Caliper overrides for individual provinces, keyed by province code
    pub province_calipers: BTreeMap<i32, f64>,
    /// Bootstrap parameters for the national estimate
    pub bootstrap: BootstrapConfig,
    /// Whether to compute the national bootstrap interval
    pub run_bootstrap: bool,
    /// Province codes to analyse as strata
    pub provinces: Vec<i32>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            provincial_caliper: 0.75,
            province_calipers: BTreeMap::new(),
            bootstrap: BootstrapConfig::default(),
            run_bootstrap: true,
            provinces: (1..=9).collect(),
        }
    }
}

impl StudyConfig {
    /// Parse a configuration from JSON, filling unspecified fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        self.matching.validate()?;
        self.matching.with_caliper(self.provincial_caliper).validate()?;
        for (province, &caliper) in &self.province_calipers {
            self.matching.with_caliper(caliper).validate().map_err(|_| {
                MatchError::invalid_config(format!(
                    "caliper for province {province} must be a positive finite number, got {caliper}"
                ))
            })?;
        }
        if self.run_bootstrap {
            self.bootstrap.validate()?;
        }
        Ok(())
    }
}
