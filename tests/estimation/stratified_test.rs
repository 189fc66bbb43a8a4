//! Per-province analyses and pooling

use copay_match::{MatchError, MatchingConfig, run_stratified, run_stratified_with_calipers};
use std::collections::BTreeMap;

use crate::utils::{full_scope, provincial_population};

fn config() -> MatchingConfig {
    MatchingConfig::builder().caliper(0.75).build()
}

#[test]
fn test_insufficient_strata_are_skipped() {
    let mut households = provincial_population(1, 0, 8, 100.0);
    households.extend(provincial_population(2, 8, 3, 100.0));

    let result = run_stratified(&households, &full_scope(&households), &[1, 2, 3], &config()).unwrap();

    assert_eq!(result.strata.len(), 3);
    let western_cape = result.stratum(1).unwrap();
    assert_eq!(western_cape.name, Some("Western Cape"));
    assert_eq!(western_cape.n_households, 16);
    assert!(western_cape.result.is_some());
    assert!(result.stratum(2).unwrap().result.is_none());
    assert_eq!(result.stratum(3).unwrap().n_households, 0);

    let pooled = result.pooled.unwrap();
    assert_eq!(pooled.strata_used, 1);
    assert_eq!(pooled.total_matched, 8);
    assert!((pooled.pooled_att - 100.0).abs() < 1e-9);
}

#[test]
fn test_pooling_weights_by_matches() {
    let mut households = provincial_population(1, 0, 6, 100.0);
    households.extend(provincial_population(7, 6, 12, 40.0));

    let result = run_stratified(&households, &full_scope(&households), &[1, 7], &config()).unwrap();
    let pooled = result.pooled.as_ref().unwrap();
    assert_eq!(pooled.total_matched, 18);
    assert!((pooled.pooled_att - (6.0 * 100.0 + 12.0 * 40.0) / 18.0).abs() < 1e-9);
    assert_eq!(result.stratum(7).unwrap().name, Some("Gauteng"));
}

#[test]
fn test_province_caliper_override_applies_to_that_stratum_only() {
    // Controls one year older than their twin: close, but never at distance zero
    let mut households: Vec<_> = provincial_population(1, 0, 8, 100.0)
        .into_iter()
        .map(|mut h| {
            if !h.treated {
                h.head_age = h.head_age.map(|age| age + 1.0);
            }
            h
        })
        .collect();
    households.extend(provincial_population(7, 8, 8, 40.0));
    let scope = full_scope(&households);

    let shared = run_stratified(&households, &scope, &[1, 7], &config()).unwrap();
    assert!(shared.stratum(1).unwrap().result.is_some());
    assert!(shared.stratum(7).unwrap().result.is_some());

    let calipers = BTreeMap::from([(1, 1e-9)]);
    let overridden = run_stratified_with_calipers(&households, &scope, &[1, 7], &config(), &calipers).unwrap();
    assert!(overridden.stratum(1).unwrap().result.is_none());
    assert!(overridden.stratum(7).unwrap().result.is_some());

    let pooled = overridden.pooled.unwrap();
    assert_eq!(pooled.strata_used, 1);
    assert!((pooled.pooled_att - 40.0).abs() < 1e-9);
}

#[test]
fn test_no_successful_stratum_gives_no_pooled_estimate() {
    let households = provincial_population(4, 0, 3, 100.0);
    let result = run_stratified(&households, &full_scope(&households), &[4, 5], &config()).unwrap();
    assert!(result.pooled.is_none());
    assert!(result.strata.iter().all(|s| s.result.is_none()));
}

#[test]
fn test_missing_province_is_an_error() {
    let mut households = provincial_population(1, 0, 6, 100.0);
    households[2].province = None;
    assert!(matches!(
        run_stratified(&households, &full_scope(&households), &[1], &config()),
        Err(MatchError::MissingField { field: "province", .. })
    ));
}
