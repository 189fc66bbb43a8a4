//! Household survey records
//!
//! A household is the unit of analysis: one row per household with the
//! treatment indicator (medical-aid membership), the outcome (annual health
//! expenditure), the sampling weight and the raw covariates used for matching.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// One household as supplied by the record source
///
/// Raw fields are optional so that a malformed population can be reported
/// precisely: the engine never imputes, it fails with
/// [`MatchError::MissingField`] when it needs a value that is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    /// Unique household identifier
    pub id: String,
    /// Whether any household member belongs to a medical scheme
    pub treated: bool,
    /// Annualised out-of-pocket health expenditure
    pub health_expenditure: Option<f64>,
    /// Household sampling weight
    pub weight: Option<f64>,
    /// Total household income
    pub income: Option<f64>,
    /// Total household consumption expenditure
    pub expenditure: Option<f64>,
    /// Number of household members
    pub household_size: Option<f64>,
    /// Age of the household head in years
    pub head_age: Option<f64>,
    /// Sex code of the household head
    pub head_sex: Option<i32>,
    /// Population group code of the household head
    pub head_population_group: Option<i32>,
    /// Raw education code of the household head
    pub head_education: Option<String>,
    /// Province code (1-9)
    pub province: Option<i32>,
    /// Settlement type code
    pub settlement_type: Option<i32>,
}

impl Household {
    /// Create a household with only identity and treatment set
    #[must_use]
    pub fn new(id: impl Into<String>, treated: bool) -> Self {
        Self {
            id: id.into(),
            treated,
            health_expenditure: None,
            weight: None,
            income: None,
            expenditure: None,
            household_size: None,
            head_age: None,
            head_sex: None,
            head_population_group: None,
            head_education: None,
            province: None,
            settlement_type: None,
        }
    }

    /// Create a new builder for a household
    #[must_use]
    pub fn builder(id: impl Into<String>, treated: bool) -> HouseholdBuilder {
        HouseholdBuilder {
            household: Self::new(id, treated),
        }
    }

    /// Outcome value, failing if absent
    pub fn outcome(&self) -> Result<f64> {
        self.health_expenditure
            .ok_or_else(|| MatchError::missing_field(&self.id, "health_expenditure"))
    }

    /// Sampling weight, failing if absent
    pub fn sampling_weight(&self) -> Result<f64> {
        self.weight
            .ok_or_else(|| MatchError::missing_field(&self.id, "weight"))
    }

    /// Province code, failing if absent
    pub fn province_code(&self) -> Result<i32> {
        self.province
            .ok_or_else(|| MatchError::missing_field(&self.id, "province"))
    }

    /// Get a raw numeric field by name, failing if absent
    pub(crate) fn require(&self, value: Option<f64>, field: &'static str) -> Result<f64> {
        value.ok_or_else(|| MatchError::missing_field(&self.id, field))
    }

    /// Get a raw code field by name, failing if absent
    pub(crate) fn require_code(&self, value: Option<i32>, field: &'static str) -> Result<f64> {
        value
            .map(f64::from)
            .ok_or_else(|| MatchError::missing_field(&self.id, field))
    }
}

/// Builder for constructing households, mainly for fixtures and adapters
#[derive(Debug, Clone)]
pub struct HouseholdBuilder {
    household: Household,
}

impl HouseholdBuilder {
    /// Set the health expenditure outcome
    #[must_use]
    pub const fn health_expenditure(mut self, value: f64) -> Self {
        self.household.health_expenditure = Some(value);
        self
    }

    /// Set the sampling weight
    #[must_use]
    pub const fn weight(mut self, value: f64) -> Self {
        self.household.weight = Some(value);
        self
    }

    /// Set the household income
    #[must_use]
    pub const fn income(mut self, value: f64) -> Self {
        self.household.income = Some(value);
        self
    }

    /// Set the household consumption expenditure
    #[must_use]
    pub const fn expenditure(mut self, value: f64) -> Self {
        self.household.expenditure = Some(value);
        self
    }

    /// Set the household size
    #[must_use]
    pub const fn household_size(mut self, value: f64) -> Self {
        self.household.household_size = Some(value);
        self
    }

    /// Set the age of the household head
    #[must_use]
    pub const fn head_age(mut self, value: f64) -> Self {
        self.household.head_age = Some(value);
        self
    }

    /// Set the sex code of the household head
    #[must_use]
    pub const fn head_sex(mut self, code: i32) -> Self {
        self.household.head_sex = Some(code);
        self
    }

    /// Set the population group code of the household head
    #[must_use]
    pub const fn head_population_group(mut self, code: i32) -> Self {
        self.household.head_population_group = Some(code);
        self
    }

    /// Set the raw education code of the household head
    #[must_use]
    pub fn head_education(mut self, code: impl Into<String>) -> Self {
        self.household.head_education = Some(code.into());
        self
    }

    /// Set the province code
    #[must_use]
    pub const fn province(mut self, code: i32) -> Self {
        self.household.province = Some(code);
        self
    }

    /// Set the settlement type code
    #[must_use]
    pub const fn settlement_type(mut self, code: i32) -> Self {
        self.household.settlement_type = Some(code);
        self
    }

    /// Build the household
    #[must_use]
    pub fn build(self) -> Household {
        self.household
    }
}

/// Names of the nine provinces keyed by province code
pub const PROVINCES: [(i32, &str); 9] = [
    (1, "Western Cape"),
    (2, "Eastern Cape"),
    (3, "Northern Cape"),
    (4, "Free State"),
    (5, "KwaZulu-Natal"),
    (6, "North West"),
    (7, "Gauteng"),
    (8, "Mpumalanga"),
    (9, "Limpopo"),
];

/// Look up a province name by code
#[must_use]
pub fn province_name(code: i32) -> Option<&'static str> {
    PROVINCES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
