//! Balance diagnostics on matched samples

use copay_match::{Covariate, Matcher, MatchingConfig};

use crate::utils::{synthetic_household, twin_population};

#[test]
fn test_identical_distributions_are_balanced() {
    let households = twin_population(15, 100.0);
    let result = Matcher::new(MatchingConfig::builder().caliper(2.0).build())
        .analyse_all(&households)
        .unwrap()
        .unwrap();

    assert_eq!(result.balance.metrics.len(), Covariate::COUNT);
    for metric in &result.balance.metrics {
        assert!(metric.smd_before.abs() < 1e-9, "{}", metric.covariate);
        assert!(metric.smd_after.abs() < 1e-9, "{}", metric.covariate);
    }
    assert_eq!(result.balance.summary.imbalanced_covariates, 0);
}

#[test]
fn test_matching_reduces_imbalance() {
    // Treated households are older on average; some controls mirror them
    let mut households = twin_population(10, 100.0);
    for i in 0..10 {
        households.push(synthetic_household(&format!("y{i}"), false, 0, 400.0));
    }
    let result = Matcher::new(MatchingConfig::builder().caliper(2.0).build())
        .analyse_all(&households)
        .unwrap()
        .unwrap();

    let age = result.balance.metric(Covariate::HeadAge).unwrap();
    assert!(age.smd_before > 0.0);
    assert!(age.smd_after.abs() < age.smd_before.abs());
    assert!(age.reduction_pct > 0.0);
}
