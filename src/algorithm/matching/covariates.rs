//! Covariate extraction for matching
//!
//! This module turns raw household fields into the fixed, ordered set of
//! numeric matching covariates. Every row of a [`CovariateMatrix`] has the
//! same eight columns in the order of [`Covariate::ALL`].

use serde::Serialize;

use crate::error::{MatchError, Result};
use crate::models::Household;

/// Matching covariate, in matrix column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Covariate {
    /// `ln(expenditure + 1)`
    LogExpenditure,
    /// `ln(income + 1)`
    LogIncome,
    /// Household size
    HouseholdSize,
    /// Age of the household head
    HeadAge,
    /// Sex code of the household head
    HeadSex,
    /// Population group code of the household head
    HeadPopulation,
    /// Ordinal education bucket 0-4
    EducationGroup,
    /// Settlement type code
    SettlementType,
}

impl Covariate {
    /// All covariates in column order
    pub const ALL: [Self; 8] = [
        Self::LogExpenditure,
        Self::LogIncome,
        Self::HouseholdSize,
        Self::HeadAge,
        Self::HeadSex,
        Self::HeadPopulation,
        Self::EducationGroup,
        Self::SettlementType,
    ];

    /// Number of covariates
    pub const COUNT: usize = Self::ALL.len();

    /// Column name of the covariate
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LogExpenditure => "log_expenditure",
            Self::LogIncome => "log_income",
            Self::HouseholdSize => "hsize",
            Self::HeadAge => "head_age",
            Self::HeadSex => "head_sex",
            Self::HeadPopulation => "head_population",
            Self::EducationGroup => "education_group",
            Self::SettlementType => "settlement_type",
        }
    }

    /// Ordered list of covariate names
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }

    /// Derive this covariate's value for one household
    fn extract(self, household: &Household) -> Result<f64> {
        match self {
            Self::LogExpenditure => household
                .require(household.expenditure, "expenditure")
                .map(f64::ln_1p),
            Self::LogIncome => household.require(household.income, "income").map(f64::ln_1p),
            Self::HouseholdSize => household.require(household.household_size, "household_size"),
            Self::HeadAge => household.require(household.head_age, "head_age"),
            Self::HeadSex => household.require_code(household.head_sex, "head_sex"),
            Self::HeadPopulation => {
                household.require_code(household.head_population_group, "head_population_group")
            }
            Self::EducationGroup => household
                .head_education
                .as_deref()
                .map(|code| f64::from(education_group(code)))
                .ok_or_else(|| MatchError::missing_field(&household.id, "head_education")),
            Self::SettlementType => {
                household.require_code(household.settlement_type, "settlement_type")
            }
        }
    }
}

/// Bucket a raw education code into five ordinal groups
///
/// 0 → 0, 1-7 → 1, 8-12 → 2, 13-20 → 3, 21-27 → 4. Codes that do not parse
/// as an integer or fall outside 0-27 map to 0.
#[must_use]
pub fn education_group(code: &str) -> u8 {
    match code.trim().parse::<i64>() {
        Ok(1..=7) => 1,
        Ok(8..=12) => 2,
        Ok(13..=20) => 3,
        Ok(21..=27) => 4,
        _ => 0,
    }
}

/// Dense row-major matrix of covariate values
#[derive(Debug, Clone, PartialEq)]
pub struct CovariateMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl CovariateMatrix {
    /// Create a matrix from row-major values
    pub fn from_rows(data: Vec<f64>, cols: usize) -> Result<Self> {
        if cols == 0 || data.len() % cols != 0 {
            return Err(MatchError::DimensionMismatch {
                expected: cols,
                actual: if cols == 0 { 0 } else { data.len() % cols },
            });
        }
        Ok(Self {
            rows: data.len() / cols,
            data,
            cols,
        })
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Check if the matrix has no rows
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow one row
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over the values of one column
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().skip(col).step_by(self.cols).copied()
    }

    /// Iterate over all rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// Raw row-major values
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy of the selected rows, in the given order
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * self.cols);
        for &row in rows {
            data.extend_from_slice(self.row(row));
        }
        Self {
            data,
            rows: rows.len(),
            cols: self.cols,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Build the covariate matrix for a set of households
///
/// # Arguments
///
/// * `households` - All households of the run
/// * `indices` - Optional subset of positions; rows follow this order. `None`
///   selects every household in collection order.
///
/// # Returns
///
/// A matrix with one row per selected household and [`Covariate::COUNT`]
/// columns, or [`MatchError::MissingField`] for the first absent raw field.
pub fn build_covariate_matrix(
    households: &[Household],
    indices: Option<&[usize]>,
) -> Result<CovariateMatrix> {
    let rows = indices.map_or(households.len(), <[usize]>::len);
    let mut data = Vec::with_capacity(rows * Covariate::COUNT);

    let mut push_row = |household: &Household| -> Result<()> {
        for covariate in Covariate::ALL {
            data.push(covariate.extract(household)?);
        }
        Ok(())
    };

    match indices {
        Some(indices) => {
            for &index in indices {
                let household = households.get(index).ok_or(MatchError::IndexOutOfRange {
                    index,
                    len: households.len(),
                })?;
                push_row(household)?;
            }
        }
        None => {
            for household in households {
                push_row(household)?;
            }
        }
    }

    Ok(CovariateMatrix {
        data,
        rows,
        cols: Covariate::COUNT,
    })
}
