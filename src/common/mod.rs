//! Common utilities and traits
//!
//! This module provides shared interfaces used across the crate.

pub mod traits;

// Re-export common traits for easier imports
pub use traits::*;
