//! Synthetic household fixtures

use copay_match::Household;

/// Household with covariates derived deterministically from `profile`
///
/// Distinct profiles give distinct covariate vectors; equal profiles give
/// identical ones.
#[must_use]
pub fn synthetic_household(id: &str, treated: bool, profile: usize, outcome: f64) -> Household {
    let p = profile as f64;
    Household::builder(id, treated)
        .health_expenditure(outcome)
        .weight(100.0 + p)
        .income(20_000.0 + 1_500.0 * p)
        .expenditure(15_000.0 + 1_000.0 * p)
        .household_size(1.0 + (profile % 6) as f64)
        .head_age(25.0 + 2.0 * p)
        .head_sex(1 + (profile % 2) as i32)
        .head_population_group(1 + (profile % 4) as i32)
        .head_education((profile % 28).to_string())
        .province(1)
        .settlement_type(1 + (profile % 3) as i32)
        .build()
}

/// `n` treated households each with a control twin of identical covariates
///
/// Treated outcomes exceed their twin's outcome by exactly `gap`.
#[must_use]
pub fn twin_population(n: usize, gap: f64) -> Vec<Household> {
    twin_population_from(0, n, gap)
}

/// Twin population whose profiles start at `first_profile`
#[must_use]
pub fn twin_population_from(first_profile: usize, n: usize, gap: f64) -> Vec<Household> {
    let mut households = Vec::with_capacity(2 * n);
    for profile in first_profile..first_profile + n {
        let base = 500.0 + 10.0 * profile as f64;
        households.push(synthetic_household(
            &format!("t{profile}"),
            true,
            profile,
            base + gap,
        ));
        households.push(synthetic_household(
            &format!("c{profile}"),
            false,
            profile,
            base,
        ));
    }
    households
}

/// Twin population placed in one province
#[must_use]
pub fn provincial_population(province: i32, first_profile: usize, n: usize, gap: f64) -> Vec<Household> {
    twin_population_from(first_profile, n, gap)
        .into_iter()
        .map(|mut h| {
            h.province = Some(province);
            h
        })
        .collect()
}

/// Every treated household spends `treated_outcome`, every control `control_outcome`
#[must_use]
pub fn constant_outcome_population(n: usize, treated_outcome: f64, control_outcome: f64) -> Vec<Household> {
    twin_population(n, 0.0)
        .into_iter()
        .map(|mut h| {
            h.health_expenditure = Some(if h.treated {
                treated_outcome
            } else {
                control_outcome
            });
            h
        })
        .collect()
}

/// Positions of every household
#[must_use]
pub fn full_scope(households: &[Household]) -> Vec<usize> {
    (0..households.len()).collect()
}
