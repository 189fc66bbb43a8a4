//! Bootstrap interval tests

use copay_match::{BootstrapConfig, Household, MatchingConfig, bootstrap_att};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::{constant_outcome_population, full_scope, synthetic_household, twin_population};

fn quick() -> BootstrapConfig {
    BootstrapConfig::new()
        .with_replications(60)
        .with_min_successful(10)
}

#[test]
fn test_interval_contains_true_effect() {
    let households = constant_outcome_population(20, 600.0, 500.0);
    let interval = bootstrap_att(&households, &full_scope(&households), &MatchingConfig::default(), &quick())
        .unwrap()
        .expect("resamples should match");

    assert!(interval.successful >= 10);
    assert_eq!(interval.replications, 60);
    assert!((interval.mean_att - 100.0).abs() < 1e-9);
    assert!(interval.ci_lower <= 100.0 + 1e-9);
    assert!(interval.ci_upper >= 100.0 - 1e-9);
}

/// Twins whose outcomes follow the profile plus uniform noise, treated +`effect`
fn noisy_twin_population(n: usize, effect: f64, seed: u64) -> Vec<Household> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut households = Vec::with_capacity(2 * n);
    for profile in 0..n {
        let base = 500.0 + 10.0 * profile as f64;
        let treated_noise: f64 = rng.random_range(-50.0..50.0);
        let control_noise: f64 = rng.random_range(-50.0..50.0);
        households.push(synthetic_household(
            &format!("t{profile}"),
            true,
            profile,
            base + effect + treated_noise,
        ));
        households.push(synthetic_household(
            &format!("c{profile}"),
            false,
            profile,
            base + control_noise,
        ));
    }
    households
}

#[test]
fn test_interval_covers_true_effect_across_trials() {
    let trials: u64 = 40;
    let mut covered: u32 = 0;
    let mut widths = Vec::new();

    for trial in 0..trials {
        let households = noisy_twin_population(30, 100.0, 1_000 + trial);
        let config = BootstrapConfig::new()
            .with_replications(200)
            .with_min_successful(50)
            .with_random_seed(trial)
            .with_parallel(true);
        let interval = bootstrap_att(&households, &full_scope(&households), &MatchingConfig::default(), &config)
            .unwrap()
            .expect("noisy twins should bootstrap");

        if interval.ci_lower <= 100.0 && 100.0 <= interval.ci_upper {
            covered += 1;
        }
        widths.push(interval.ci_upper - interval.ci_lower);
    }

    let coverage = f64::from(covered) / trials as f64;
    assert!(coverage >= 0.8, "coverage {covered}/{trials}");
    assert!(widths.iter().all(|&w| w > 0.0));
}

#[test]
fn test_interval_is_ordered() {
    let households = twin_population(20, 100.0);
    let interval = bootstrap_att(&households, &full_scope(&households), &MatchingConfig::default(), &quick())
        .unwrap()
        .unwrap();
    assert!(interval.ci_lower <= interval.ci_upper);
    assert!(interval.successful <= interval.replications);
}

#[test]
fn test_same_seed_same_interval() {
    let households = twin_population(15, 80.0);
    let scope = full_scope(&households);
    let config = MatchingConfig::default();
    let first = bootstrap_att(&households, &scope, &config, &quick()).unwrap();
    let second = bootstrap_att(&households, &scope, &config, &quick()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parallel_matches_sequential() {
    let households = twin_population(15, 80.0);
    let scope = full_scope(&households);
    let config = MatchingConfig::default();
    let sequential = bootstrap_att(&households, &scope, &config, &quick()).unwrap();
    let parallel = bootstrap_att(&households, &scope, &config, &quick().with_parallel(true)).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_too_few_successes_is_unavailable() {
    let households = twin_population(20, 100.0);
    let config = quick().with_min_successful(61);
    let interval = bootstrap_att(&households, &full_scope(&households), &MatchingConfig::default(), &config).unwrap();
    assert!(interval.is_none());
}

#[test]
fn test_invalid_alpha_is_rejected() {
    let households = twin_population(10, 100.0);
    let config = quick().with_alpha(1.5);
    assert!(bootstrap_att(&households, &full_scope(&households), &MatchingConfig::default(), &config).is_err());
}
