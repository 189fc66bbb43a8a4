//! Two-sided significance tests for matched and unmatched comparisons
//!
//! Each test returns `None` when its statistic cannot be computed for the
//! given data (too few observations, all values tied, no non-zero
//! differences). A `None` here never invalidates the other statistics of a
//! result.

use log::warn;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::algorithm::estimation::statistics::{average_ranks, mean, std_dev};

/// Largest sample size for which exact null distributions are enumerated
const EXACT_WILCOXON_MAX_N: usize = 50;
const EXACT_MANN_WHITNEY_MAX_N: usize = 8;

/// Test statistic with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    /// Test statistic
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

fn standard_normal_sf(z: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.sf(z),
        Err(_) => f64::NAN,
    }
}

/// Paired t-test on `treated - control`
///
/// Differences with zero variance give `t = 0, p = 1` when they are all 0 and
/// an infinite statistic with `p = 0` otherwise.
#[must_use]
pub fn paired_t_test(treated: &[f64], control: &[f64]) -> Option<TestResult> {
    if treated.len() != control.len() || treated.len() < 2 {
        return None;
    }
    let diffs: Vec<f64> = treated.iter().zip(control).map(|(t, c)| t - c).collect();
    let n = diffs.len() as f64;
    let m = mean(&diffs);
    let sd = std_dev(&diffs, 1);

    if sd == 0.0 {
        return Some(if m == 0.0 {
            TestResult {
                statistic: 0.0,
                p_value: 1.0,
            }
        } else {
            TestResult {
                statistic: m.signum() * f64::INFINITY,
                p_value: 0.0,
            }
        });
    }

    let t = m / (sd / n.sqrt());
    let dist = StudentsT::new(0.0, 1.0, n - 1.0).ok()?;
    let p_value = (2.0 * dist.sf(t.abs())).min(1.0);
    Some(TestResult {
        statistic: t,
        p_value,
    })
}

/// Wilcoxon signed-rank test on `treated - control`
///
/// Zero differences are discarded. With at most 50 non-zero differences and
/// no ties or zeros the exact null distribution is used, otherwise the normal
/// approximation with tie correction. The statistic is `min(W+, W-)`.
#[must_use]
pub fn wilcoxon_signed_rank(treated: &[f64], control: &[f64]) -> Option<TestResult> {
    if treated.len() != control.len() {
        return None;
    }
    let diffs: Vec<f64> = treated.iter().zip(control).map(|(t, c)| t - c).collect();
    let nonzero: Vec<f64> = diffs.iter().copied().filter(|&d| d != 0.0).collect();
    let had_zeros = nonzero.len() < diffs.len();

    if nonzero.is_empty() {
        warn!("Wilcoxon signed-rank test unavailable: all paired differences are zero");
        return None;
    }

    let magnitudes: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let (ranks, tie_term) = average_ranks(&magnitudes);
    let r_plus: f64 = nonzero
        .iter()
        .zip(&ranks)
        .filter(|&(&d, _)| d > 0.0)
        .map(|(_, &r)| r)
        .sum();
    let n = nonzero.len();
    let total = (n * (n + 1)) as f64 / 2.0;
    let statistic = r_plus.min(total - r_plus);

    if n <= EXACT_WILCOXON_MAX_N && tie_term == 0.0 && !had_zeros {
        let p_value = (2.0 * signed_rank_cdf(n, statistic)).min(1.0);
        return Some(TestResult { statistic, p_value });
    }

    let nf = n as f64;
    let mn = nf * (nf + 1.0) / 4.0;
    let var = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_term / 48.0;
    if var <= 0.0 {
        warn!("Wilcoxon signed-rank test unavailable: zero variance after tie correction");
        return None;
    }
    let z = (statistic - mn) / var.sqrt();
    let p_value = (2.0 * standard_normal_sf(z.abs())).min(1.0);
    Some(TestResult { statistic, p_value })
}

/// `P(W+ <= w)` under the null for `n` untied non-zero differences
fn signed_rank_cdf(n: usize, w: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    // counts[s] = number of rank subsets summing to s
    let mut counts = vec![0.0_f64; max_sum + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        for s in (rank..=max_sum).rev() {
            counts[s] += counts[s - rank];
        }
    }
    let limit = w.floor() as usize;
    let below: f64 = counts.iter().take(limit.min(max_sum) + 1).sum();
    below / 2f64.powi(n as i32)
}

/// Mann-Whitney U test comparing two independent samples
///
/// The statistic is `U` of the first sample. Small untied samples (both at
/// most 8) use the exact distribution; otherwise the normal approximation
/// with tie and continuity correction.
#[must_use]
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Option<TestResult> {
    let n1 = first.len();
    let n2 = second.len();
    if n1 == 0 || n2 == 0 {
        return None;
    }

    let pooled: Vec<f64> = first.iter().chain(second).copied().collect();
    let (ranks, tie_term) = average_ranks(&pooled);
    let r1: f64 = ranks[..n1].iter().sum();
    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;
    let u_max = u1.max(u2);

    if n1 <= EXACT_MANN_WHITNEY_MAX_N && n2 <= EXACT_MANN_WHITNEY_MAX_N && tie_term == 0.0 {
        let p_value = (2.0 * mann_whitney_sf(n1, n2, u_max)).min(1.0);
        return Some(TestResult {
            statistic: u1,
            p_value,
        });
    }

    let n = n1f + n2f;
    let mu = n1f * n2f / 2.0;
    let sigma_sq = n1f * n2f / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if !(sigma_sq > 0.0) {
        warn!("Mann-Whitney U test unavailable: all outcome values are tied");
        return None;
    }
    let z = (u_max - mu - 0.5) / sigma_sq.sqrt();
    let p_value = (2.0 * standard_normal_sf(z)).clamp(0.0, 1.0);
    Some(TestResult {
        statistic: u1,
        p_value,
    })
}

/// `P(U >= u)` under the null for sample sizes `n1`, `n2` without ties
fn mann_whitney_sf(n1: usize, n2: usize, u: f64) -> f64 {
    let max_u = n1 * n2;
    // table[m][k] = frequencies of U for sizes (m, k)
    let mut table: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); n2 + 1]; n1 + 1];
    for m in 0..=n1 {
        for k in 0..=n2 {
            let mut freq = vec![0.0; m * k + 1];
            if m == 0 || k == 0 {
                freq[0] = 1.0;
            } else {
                // Largest value in the first sample: it beats all k or it does not
                for (value, slot) in freq.iter_mut().enumerate() {
                    let with_first = if value >= k {
                        table[m - 1][k].get(value - k).copied().unwrap_or(0.0)
                    } else {
                        0.0
                    };
                    let with_second = table[m][k - 1].get(value).copied().unwrap_or(0.0);
                    *slot = with_first + with_second;
                }
            }
            table[m][k] = freq;
        }
    }

    let freq = &table[n1][n2];
    let total: f64 = freq.iter().sum();
    let start = u.ceil() as usize;
    let upper: f64 = freq.iter().skip(start.min(max_u + 1)).sum();
    upper / total
}
