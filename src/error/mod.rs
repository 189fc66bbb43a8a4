//! Error handling for the matching engine.
//!
//! Only structural problems are errors: a household missing a field the
//! engine needs, or a configuration that cannot be used. Insufficient data and
//! degenerate statistics are ordinary values (`None`) on the result types.

/// Specialized error type for the matching engine
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A required raw field is absent from a household record
    #[error("Missing field '{field}' for household {household}")]
    MissingField {
        /// Identifier of the offending household
        household: String,
        /// Name of the absent field
        field: &'static str,
    },

    /// Configuration value outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Matrix or vector shapes that do not line up
    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch {
        /// Expected column count
        expected: usize,
        /// Actual column count
        actual: usize,
    },

    /// A position outside the household collection
    #[error("Index {index} out of range for {len} households")]
    IndexOutOfRange {
        /// Offending position
        index: usize,
        /// Number of households available
        len: usize,
    },

    /// Error converting configuration or results to and from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error while reading records or configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MatchError {
    /// Create a missing field error
    pub fn missing_field(household: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            household: household.into(),
            field,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type for matching engine operations
pub type Result<T> = std::result::Result<T, MatchError>;
