//! Spatial index over standardized control covariates
//!
//! This module implements a k-d tree for exact k-nearest-neighbour queries.
//! Points are stored once in a flat row-major array; tree nodes only hold row
//! numbers, which keeps the structure compact and cache friendly.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::algorithm::matching::covariates::CovariateMatrix;

/// Candidate returned by a nearest-neighbour query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row of the neighbour in the indexed matrix
    pub index: usize,
    /// Squared Euclidean distance to the query point
    pub distance: f64,
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Candidate list sized for the default neighbour count without allocating
pub type Neighbors = SmallVec<[Neighbor; 16]>;

#[derive(Debug, Clone)]
struct Node {
    row: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// k-d tree over the rows of a covariate matrix
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    points: Vec<f64>,
    dims: usize,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl NeighborIndex {
    /// Build an index over every row of `matrix`
    #[must_use]
    pub fn build(matrix: &CovariateMatrix) -> Self {
        let mut index = Self {
            points: matrix.as_slice().to_vec(),
            dims: matrix.cols(),
            nodes: Vec::with_capacity(matrix.rows()),
            root: None,
        };
        let mut rows: Vec<usize> = (0..matrix.rows()).collect();
        index.root = index.build_subtree(&mut rows);
        index
    }

    /// Number of indexed points
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the index holds no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dimensionality of the indexed points
    #[must_use]
    pub const fn dims(&self) -> usize {
        self.dims
    }

    fn coord(&self, row: usize, axis: usize) -> f64 {
        self.points[row * self.dims + axis]
    }

    fn point(&self, row: usize) -> &[f64] {
        &self.points[row * self.dims..(row + 1) * self.dims]
    }

    /// Split on the axis with the widest spread, at the median row
    fn build_subtree(&mut self, rows: &mut [usize]) -> Option<usize> {
        if rows.is_empty() {
            return None;
        }

        let axis = self.widest_axis(rows);
        let median = rows.len() / 2;
        rows.select_nth_unstable_by(median, |&a, &b| {
            self.coord(a, axis)
                .total_cmp(&self.coord(b, axis))
                .then_with(|| a.cmp(&b))
        });
        let row = rows[median];

        let (lower, rest) = rows.split_at_mut(median);
        let upper = &mut rest[1..];
        let left = self.build_subtree(lower);
        let right = self.build_subtree(upper);

        self.nodes.push(Node {
            row,
            axis,
            left,
            right,
        });
        Some(self.nodes.len() - 1)
    }

    fn widest_axis(&self, rows: &[usize]) -> usize {
        let mut best_axis = 0;
        let mut best_spread = f64::NEG_INFINITY;
        for axis in 0..self.dims {
            let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                let v = self.coord(r, axis);
                (lo.min(v), hi.max(v))
            });
            if hi - lo > best_spread {
                best_spread = hi - lo;
                best_axis = axis;
            }
        }
        best_axis
    }

    /// Find the `k` nearest indexed rows to `query`
    ///
    /// Results are sorted by ascending squared distance; equal distances are
    /// ordered by row number so the output is deterministic. Fewer than `k`
    /// results are returned only when the index holds fewer points.
    #[must_use]
    pub fn query(&self, query: &[f64], k: usize) -> Neighbors {
        let k = k.min(self.len());
        let mut heap = BinaryHeap::with_capacity(k + 1);
        if k > 0 && query.len() == self.dims {
            if let Some(root) = self.root {
                self.search(root, query, k, &mut heap);
            }
        }
        heap.into_sorted_vec().into_iter().collect()
    }

    fn search(&self, node_id: usize, query: &[f64], k: usize, heap: &mut BinaryHeap<Neighbor>) {
        let node = &self.nodes[node_id];
        let candidate = Neighbor {
            index: node.row,
            distance: squared_distance(query, self.point(node.row)),
        };
        if heap.len() < k {
            heap.push(candidate);
        } else if heap.peek().is_some_and(|worst| candidate < *worst) {
            heap.pop();
            heap.push(candidate);
        }

        let diff = query[node.axis] - self.coord(node.row, node.axis);
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.search(near, query, k, heap);
        }
        if let Some(far) = far {
            // Ties on the splitting plane must still be visited for index ordering
            let must_visit =
                heap.len() < k || heap.peek().is_some_and(|worst| diff * diff <= worst.distance);
            if must_visit {
                self.search(far, query, k, heap);
            }
        }
    }
}

/// Squared Euclidean distance between two points of equal length
#[must_use]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
