//! Descriptive statistics shared by the estimators
//!
//! Empty input yields `NaN` for location statistics and 0 for spread, so
//! callers never divide by a zero-length slice.

use itertools::Itertools;

/// Arithmetic mean
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with the given delta degrees of freedom (`0` population, `1` sample)
#[must_use]
pub fn variance(values: &[f64], ddof: usize) -> f64 {
    if values.len() <= ddof {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / (values.len() - ddof) as f64
}

/// Standard deviation with the given delta degrees of freedom
#[must_use]
pub fn std_dev(values: &[f64], ddof: usize) -> f64 {
    variance(values, ddof).sqrt()
}

/// Weighted mean; falls back to the plain mean when weights sum to 0
#[must_use]
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total == 0.0 || values.len() != weights.len() {
        return mean(values);
    }
    values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total
}

/// Median (average of the two middle values for even lengths)
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let sorted = values.iter().copied().sorted_by(f64::total_cmp).collect_vec();
    quantile_linear_sorted(&sorted, 0.5)
}

/// Quantile of sorted data via linear interpolation
///
/// - `q=0` returns min
/// - `q=1` returns max
/// - empty input returns `NaN`
#[must_use]
pub fn quantile_linear_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let i = pos.floor() as usize;
    let j = pos.ceil() as usize;
    if i == j {
        return sorted[i];
    }
    let t = pos - i as f64;
    (1.0 - t) * sorted[i] + t * sorted[j]
}

/// Percentage of values strictly above zero
#[must_use]
pub fn percent_positive(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    100.0 * values.iter().filter(|&&v| v > 0.0).count() as f64 / values.len() as f64
}

/// Average ranks (1-based) with ties sharing their mean rank
///
/// Also returns the tie correction term `Σ (t³ - t)` over tie groups.
#[must_use]
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let order = (0..values.len())
        .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
        .collect_vec();

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end share ranks start+1..=end
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        let t = (end - start) as f64;
        tie_term += t.powi(3) - t;
        start = end;
    }

    (ranks, tie_term)
}
