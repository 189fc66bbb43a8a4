//! Greedy caliper assignment without replacement
//!
//! Treated units are visited in a seeded random order. Each takes the
//! nearest candidate control that is still unused and within the caliper;
//! a unit with no such candidate stays unmatched.

use log::debug;
use rand::prelude::*;
use rustc_hash::FxHashSet;

use crate::algorithm::matching::neighbor_index::Neighbors;

/// One accepted pair, in local row numbers of the treated and control matrices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    /// Row of the treated unit
    pub treated_row: usize,
    /// Row of the control unit
    pub control_row: usize,
    /// Distance of the pair in the caliper metric
    pub distance: f64,
}

/// Seeded permutation of `0..n`
///
/// The same seed always yields the same order.
#[must_use]
pub fn processing_order(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);
    order
}

/// Assign controls to treated units greedily
///
/// # Arguments
///
/// * `candidates` - Per treated row, control candidates sorted nearest first
/// * `order` - Order in which treated rows are processed
/// * `threshold` - Largest acceptable distance
/// * `distance` - Maps a candidate's squared distance to the caliper metric
///
/// # Returns
///
/// Accepted pairs in processing order. No control row appears twice.
pub fn assign_greedy<F>(
    candidates: &[Neighbors],
    order: &[usize],
    threshold: f64,
    distance: F,
) -> Vec<Assignment>
where
    F: Fn(f64) -> f64,
{
    let mut used_controls = FxHashSet::default();
    let mut assignments = Vec::with_capacity(order.len());

    for &treated_row in order {
        let Some(neighbours) = candidates.get(treated_row) else {
            continue;
        };

        let accepted = neighbours.iter().find_map(|neighbour| {
            let d = distance(neighbour.distance);
            (!used_controls.contains(&neighbour.index) && d <= threshold)
                .then_some((neighbour.index, d))
        });

        match accepted {
            Some((control_row, d)) => {
                used_controls.insert(control_row);
                assignments.push(Assignment {
                    treated_row,
                    control_row,
                    distance: d,
                });
            }
            None => debug!("Treated row {treated_row} left unmatched"),
        }
    }

    assignments
}
