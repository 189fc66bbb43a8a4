//! Logging utilities
//!
//! This module provides standardized log lines for analysis runs.

use std::time::Duration;

/// Log the start of an analysis with consistent format
///
/// # Arguments
/// * `label` - Name of the analysis (e.g. "national", a province name)
/// * `treated` - Number of treated units in scope
/// * `control` - Number of control units in scope
pub fn log_analysis_start(label: &str, treated: usize, control: usize) {
    log::info!("Matching {label}: {treated} treated, {control} control households");
}

/// Log the completion of an analysis with consistent format
///
/// # Arguments
/// * `label` - Name of the analysis
/// * `matched` - Number of matched pairs
/// * `treated` - Number of treated units considered
/// * `elapsed` - Optional elapsed time
pub fn log_analysis_complete(label: &str, matched: usize, treated: usize, elapsed: Option<Duration>) {
    let rate = if treated > 0 {
        100.0 * matched as f64 / treated as f64
    } else {
        0.0
    };
    if let Some(duration) = elapsed {
        log::info!("Matched {matched}/{treated} treated households ({rate:.1}%) for {label} in {duration:.2?}");
    } else {
        log::info!("Matched {matched}/{treated} treated households ({rate:.1}%) for {label}");
    }
}

/// Log an insufficient-data outcome with consistent format
///
/// # Arguments
/// * `label` - Name of the analysis
/// * `reason` - What fell short
pub fn log_insufficient_data(label: &str, reason: &str) {
    log::warn!("Insufficient data for {label}: {reason}");
}
