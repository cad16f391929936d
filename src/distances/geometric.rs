//! Distances between frequency vectors: Euclidean, L1 and Hellinger.

use super::distance::{normalise, DistanceMetric, Orientation};
use crate::core::Distribution;

/// Sums `term(a, b)` over the union of both key sets, weights normalised.
fn sum_over_union(
    a: &Distribution,
    size_a: usize,
    b: &Distribution,
    size_b: usize,
    relative_freq: bool,
    term: impl Fn(f64, f64) -> f64,
) -> f64 {
    a.union(b)
        .map(|(_, wa, wb)| {
            term(
                normalise(wa, size_a, relative_freq),
                normalise(wb, size_b, relative_freq),
            )
        })
        .sum()
}

/// [Euclidean Distance](https://en.wikipedia.org/wiki/Euclidean_distance)
#[derive(Debug, Clone, Copy)]
pub struct EuclideanDistance {
    relative_freq: bool,
}

impl EuclideanDistance {
    pub fn new(relative_freq: bool) -> Self {
        Self { relative_freq }
    }
}

impl DistanceMetric for EuclideanDistance {
    fn name(&self) -> &'static str {
        "Euclidean"
    }

    fn orientation(&self) -> Orientation {
        Orientation::LowerIsCloser
    }

    fn relative_freq(&self) -> bool {
        self.relative_freq
    }

    #[inline]
    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64 {
        sum_over_union(a, size_a, b, size_b, self.relative_freq, |x, y| {
            (x - y).powi(2)
        })
        .sqrt()
    }
}

/// [Manhattan Distance](https://en.wikipedia.org/wiki/Taxicab_geometry), the L1 norm of the difference
#[derive(Debug, Clone, Copy)]
pub struct ManhattanDistance {
    relative_freq: bool,
}

impl ManhattanDistance {
    pub fn new(relative_freq: bool) -> Self {
        Self { relative_freq }
    }
}

impl DistanceMetric for ManhattanDistance {
    fn name(&self) -> &'static str {
        "L1"
    }

    fn orientation(&self) -> Orientation {
        Orientation::LowerIsCloser
    }

    fn relative_freq(&self) -> bool {
        self.relative_freq
    }

    #[inline]
    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64 {
        sum_over_union(a, size_a, b, size_b, self.relative_freq, |x, y| (x - y).abs())
    }
}

/// Hellinger function: Σ(√a − √b)², without the usual square root and ½ factor
#[derive(Debug, Clone, Copy)]
pub struct HellingerDistance {
    relative_freq: bool,
}

impl HellingerDistance {
    pub fn new(relative_freq: bool) -> Self {
        Self { relative_freq }
    }
}

impl DistanceMetric for HellingerDistance {
    fn name(&self) -> &'static str {
        "Hellinger"
    }

    fn orientation(&self) -> Orientation {
        Orientation::LowerIsCloser
    }

    fn relative_freq(&self) -> bool {
        self.relative_freq
    }

    #[inline]
    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64 {
        sum_over_union(a, size_a, b, size_b, self.relative_freq, |x, y| {
            (x.sqrt() - y.sqrt()).powi(2)
        })
    }
}
