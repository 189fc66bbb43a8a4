//! Record source abstraction
//!
//! The engine does not ingest survey files itself. Anything that can produce
//! household records (a database adapter, a JSON export, a test fixture)
//! implements [`RecordSource`].

use std::path::Path;

use crate::error::Result;
use crate::models::Household;

/// Supplier of household records for one analysis run
pub trait RecordSource {
    /// Load all household records
    fn households(&self) -> Result<Vec<Household>>;
}

impl RecordSource for Vec<Household> {
    fn households(&self) -> Result<Vec<Household>> {
        Ok(self.clone())
    }
}

impl RecordSource for [Household] {
    fn households(&self) -> Result<Vec<Household>> {
        Ok(self.to_vec())
    }
}

/// Households stored as a JSON array
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    content: String,
}

impl JsonRecordSource {
    /// Wrap an in-memory JSON document
    #[must_use]
    pub fn from_json(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Read a JSON document from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        log::info!("Read household records from {}", path.display());
        Ok(Self { content })
    }
}

impl RecordSource for JsonRecordSource {
    fn households(&self) -> Result<Vec<Household>> {
        let households: Vec<Household> = serde_json::from_str(&self.content)?;
        log::info!("Loaded {} households", households.len());
        Ok(households)
    }
}
