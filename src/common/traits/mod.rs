//! Common traits used across the codebase

pub mod source;

pub use source::{JsonRecordSource, RecordSource};
