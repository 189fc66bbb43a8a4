//! Property tests for the assignment invariants

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use copay_match::{DistanceMetric, Household, Matcher, MatchingConfig};

use crate::utils::full_scope;

type Profile = (bool, f64, f64, f64, u8, u8, u8, u8);

fn profile() -> impl Strategy<Value = Profile> {
    (
        any::<bool>(),
        18.0..90.0f64,
        1_000.0..200_000.0f64,
        500.0..150_000.0f64,
        1..10u8,
        1..3u8,
        1..5u8,
        0..30u8,
    )
}

fn household(i: usize, p: &Profile) -> Household {
    let (treated, age, income, expenditure, size, sex, group, education) = *p;
    Household::builder(format!("h{i}"), treated)
        .health_expenditure(income / 100.0)
        .weight(1.0)
        .income(income)
        .expenditure(expenditure)
        .household_size(f64::from(size))
        .head_age(age)
        .head_sex(i32::from(sex))
        .head_population_group(i32::from(group))
        .head_education(education.to_string())
        .province(1)
        .settlement_type(1 + (i % 3) as i32)
        .build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_no_reuse_and_caliper_respected(
        profiles in prop::collection::vec(profile(), 10..80),
        caliper in 0.05..3.0f64,
        euclidean in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let households: Vec<Household> = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| household(i, p))
            .collect();
        let distance = if euclidean {
            DistanceMetric::Euclidean
        } else {
            DistanceMetric::SquaredEuclidean
        };
        let config = MatchingConfig::builder()
            .caliper(caliper)
            .random_seed(seed)
            .distance(distance)
            .min_group_size(1)
            .min_matches(1)
            .build();

        let result = Matcher::new(config)
            .quiet()
            .match_units(&households, &full_scope(&households))
            .unwrap();

        if let Some(match_set) = result {
            let mut treated = FxHashSet::default();
            let mut controls = FxHashSet::default();
            for m in &match_set.matches {
                prop_assert!(households[m.treated].treated);
                prop_assert!(!households[m.control].treated);
                prop_assert!(treated.insert(m.treated));
                prop_assert!(controls.insert(m.control));
                prop_assert!(m.distance <= caliper * 8.0);
            }
            prop_assert!(match_set.n_matched() <= match_set.n_treated());
            prop_assert!(match_set.n_matched() <= match_set.n_control());
        }
    }

    #[test]
    fn prop_same_seed_same_matches(
        profiles in prop::collection::vec(profile(), 10..50),
        seed in any::<u64>(),
    ) {
        let households: Vec<Household> = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| household(i, p))
            .collect();
        let config = MatchingConfig::builder()
            .random_seed(seed)
            .min_group_size(1)
            .min_matches(1)
            .build();
        let matcher = Matcher::new(config).quiet();
        let scope = full_scope(&households);
        prop_assert_eq!(
            matcher.match_units(&households, &scope).unwrap(),
            matcher.match_units(&households, &scope).unwrap()
        );
    }
}
