//! Algorithm implementations for matching studies
//!
//! This module contains the matching pipeline, the estimators built on top
//! of it, population eligibility and the full study runner.

pub mod analysis;
pub mod estimation;
pub mod matching;
pub mod population;
pub mod study;

pub use analysis::AnalysisResult;
pub use study::{StudyReport, StudyRunner};
