//! Treatment effect estimation on matched samples

pub mod bootstrap;
pub mod effect;
pub mod significance;
pub mod statistics;
pub mod stratified;

pub use bootstrap::{BootstrapInterval, bootstrap_att};
pub use effect::{EffectEstimate, MatchedOutcomes, UnmatchedComparison, estimate_effect};
pub use significance::TestResult;
pub use stratified::{PooledEstimate, StratifiedResult, StratumResult, run_stratified, run_stratified_with_calipers};
