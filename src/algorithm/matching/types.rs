//! Type definitions for the matching algorithm
//!
//! This module contains common types used throughout the matching algorithm.

use serde::Serialize;

/// Pair of matched treated and control households
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Position of the treated household in the analysed collection
    pub treated: usize,
    /// Position of the control household in the analysed collection
    pub control: usize,
    /// Treated household identifier
    pub treated_id: String,
    /// Control household identifier
    pub control_id: String,
    /// Distance that produced the match
    pub distance: f64,
}

/// Result of one assignment pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSet {
    /// Accepted matches, in processing order
    pub matches: Vec<Match>,
    /// Positions of every treated household considered
    pub treated_pool: Vec<usize>,
    /// Positions of every control household considered
    pub control_pool: Vec<usize>,
}

impl MatchSet {
    /// Number of treated households considered
    #[must_use]
    pub fn n_treated(&self) -> usize {
        self.treated_pool.len()
    }

    /// Number of control households considered
    #[must_use]
    pub fn n_control(&self) -> usize {
        self.control_pool.len()
    }

    /// Number of matched pairs
    #[must_use]
    pub fn n_matched(&self) -> usize {
        self.matches.len()
    }

    /// Check if no pairs were matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Share of treated households that found a match, in percent
    #[must_use]
    pub fn match_rate(&self) -> f64 {
        if self.treated_pool.is_empty() {
            0.0
        } else {
            100.0 * self.matches.len() as f64 / self.treated_pool.len() as f64
        }
    }

    /// Positions of matched treated households, in match order
    #[must_use]
    pub fn matched_treated(&self) -> Vec<usize> {
        self.matches.iter().map(|m| m.treated).collect()
    }

    /// Positions of matched control households, in match order
    #[must_use]
    pub fn matched_controls(&self) -> Vec<usize> {
        self.matches.iter().map(|m| m.control).collect()
    }
}
