//! Logging utilities for output and progress tracking
//!
//! This module provides logger initialisation, consistent log lines for
//! analysis runs, and progress bars for bootstrap replications.

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use log::{log_analysis_complete, log_analysis_start, log_insufficient_data};
pub use progress::{create_main_progress_bar, finish_progress_bar};

/// Initialise `env_logger` with `info` as the default level
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
