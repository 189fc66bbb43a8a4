//! Eligibility filtering of the survey population
//!
//! The engine analyses whatever it is given; callers that start from the raw
//! survey apply [`EligibilityCriteria`] first to reproduce the usual study
//! population.

use log::info;

use crate::models::Household;

/// Education code marking an unspecified answer
pub const UNSPECIFIED_EDUCATION: &str = "98";

/// Defines a criterion for filtering records
pub trait FilterCriteria<T> {
    /// Determine if an entity meets the filter criteria
    fn meets_criteria(&self, entity: &T) -> bool;
}

/// Filter applicable to a single household
#[derive(Debug, Clone, PartialEq)]
pub enum HouseholdFilter {
    /// Consumption expenditure strictly above zero
    PositiveExpenditure,
    /// Head age strictly above zero
    PositiveHeadAge,
    /// Population group code in the given set
    PopulationGroup(Vec<i32>),
    /// Education code different from the given code
    EducationNot(String),
    /// Province code equal to the given code
    Province(i32),
    /// Health expenditure strictly above zero
    AnyHealthSpend,
    /// Combined filter that requires all criteria to be met
    All(Vec<HouseholdFilter>),
}

impl FilterCriteria<Household> for HouseholdFilter {
    fn meets_criteria(&self, household: &Household) -> bool {
        match self {
            Self::PositiveExpenditure => household.expenditure.is_some_and(|v| v > 0.0),
            Self::PositiveHeadAge => household.head_age.is_some_and(|v| v > 0.0),
            Self::PopulationGroup(groups) => household
                .head_population_group
                .is_some_and(|g| groups.contains(&g)),
            Self::EducationNot(code) => household
                .head_education
                .as_deref()
                .is_some_and(|e| e.trim() != code),
            Self::Province(code) => household.province == Some(*code),
            Self::AnyHealthSpend => household.health_expenditure.is_some_and(|v| v > 0.0),
            Self::All(filters) => filters.iter().all(|f| f.meets_criteria(household)),
        }
    }
}

/// Standard study population: positive expenditure, positive head age,
/// population groups 1-4 and a specified education level
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityCriteria {
    filter: HouseholdFilter,
}

impl Default for EligibilityCriteria {
    fn default() -> Self {
        Self {
            filter: HouseholdFilter::All(vec![
                HouseholdFilter::PositiveExpenditure,
                HouseholdFilter::PositiveHeadAge,
                HouseholdFilter::PopulationGroup(vec![1, 2, 3, 4]),
                HouseholdFilter::EducationNot(UNSPECIFIED_EDUCATION.to_string()),
            ]),
        }
    }
}

impl EligibilityCriteria {
    /// Create the standard criteria
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a further filter on top of the current criteria
    #[must_use]
    pub fn and(self, filter: HouseholdFilter) -> Self {
        Self {
            filter: HouseholdFilter::All(vec![self.filter, filter]),
        }
    }
}

impl FilterCriteria<Household> for EligibilityCriteria {
    fn meets_criteria(&self, household: &Household) -> bool {
        self.filter.meets_criteria(household)
    }
}

/// Keep the households that meet `criteria`
#[must_use]
pub fn filter_eligible<C: FilterCriteria<Household>>(
    households: &[Household],
    criteria: &C,
) -> Vec<Household> {
    let eligible: Vec<Household> = households
        .iter()
        .filter(|h| criteria.meets_criteria(h))
        .cloned()
        .collect();
    info!(
        "{} of {} households meet the eligibility criteria",
        eligible.len(),
        households.len()
    );
    eligible
}

/// Positions within `scope` of households that meet `criteria`
#[must_use]
pub fn eligible_positions<C: FilterCriteria<Household>>(
    households: &[Household],
    scope: &[usize],
    criteria: &C,
) -> Vec<usize> {
    scope
        .iter()
        .copied()
        .filter(|&p| households.get(p).is_some_and(|h| criteria.meets_criteria(h)))
        .collect()
}
