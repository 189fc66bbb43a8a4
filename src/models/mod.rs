//! Domain models for the matching engine

pub mod household;

pub use household::{Household, HouseholdBuilder, PROVINCES, province_name};
