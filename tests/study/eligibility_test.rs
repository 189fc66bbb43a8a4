//! Eligibility filter tests

use copay_match::algorithm::population::{FilterCriteria, HouseholdFilter};
use copay_match::{EligibilityCriteria, filter_eligible};

use crate::utils::twin_population;

#[test]
fn test_study_population_rules() {
    let mut households = twin_population(5, 100.0);
    households[0].expenditure = Some(0.0);
    households[1].head_age = Some(0.0);
    households[2].head_population_group = Some(5);
    households[3].head_education = Some("98".to_string());

    let eligible = filter_eligible(&households, &EligibilityCriteria::new());
    assert_eq!(eligible.len(), 6);
    assert!(eligible.iter().all(|h| !["t0", "c0", "t1", "c1"].contains(&h.id.as_str())));
}

#[test]
fn test_unparseable_education_is_kept() {
    let mut households = twin_population(1, 100.0);
    households[0].head_education = Some("unknown".to_string());
    assert_eq!(filter_eligible(&households, &EligibilityCriteria::new()).len(), 2);
}

#[test]
fn test_any_health_spend_filter() {
    let mut households = twin_population(2, 100.0);
    households[1].health_expenditure = Some(0.0);
    let spending = households
        .iter()
        .filter(|h| HouseholdFilter::AnyHealthSpend.meets_criteria(h))
        .count();
    assert_eq!(spending, 3);
}
