//! Study population selection

pub mod eligibility;

pub use eligibility::{EligibilityCriteria, FilterCriteria, HouseholdFilter, filter_eligible};
