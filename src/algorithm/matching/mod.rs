//! Nearest-neighbour covariate matching
//!
//! This module implements matching of treated households to control
//! households as a pipeline of small steps:
//!
//! 1. Covariate extraction into a dense matrix
//! 2. Pooled standardization with explicit parameters
//! 3. k-d tree neighbour candidates per treated unit
//! 4. Greedy assignment without replacement under a caliper
//! 5. Covariate balance assessment of the matched sample

pub mod assigner;
pub mod balance;
pub mod covariates;
pub mod matcher;
pub mod neighbor_index;
pub mod standardize;
pub mod types;

// Re-export key types
pub use balance::{BalanceCalculator, BalanceMetric, BalanceSummary, BalanceTable};
pub use covariates::{Covariate, CovariateMatrix, build_covariate_matrix};
pub use matcher::Matcher;
pub use neighbor_index::{Neighbor, NeighborIndex};
pub use standardize::{StandardizationParams, standardize};
pub use types::{Match, MatchSet};
