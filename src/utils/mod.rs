//! Utility functions shared by the matching engine

pub mod logging;
