use super::distance::{normalise, DistanceMetric, Orientation};
use crate::core::Distribution;

/// [Cosine Similarity](https://en.wikipedia.org/wiki/Cosine_similarity)
///
/// 1 for identical direction, 0 for disjoint vocabularies. A zero-length
/// vector scores 0 against everything.
#[derive(Debug, Clone, Copy)]
pub struct CosineSimilarity {
    relative_freq: bool,
}

impl CosineSimilarity {
    pub fn new(relative_freq: bool) -> Self {
        Self { relative_freq }
    }
}

impl DistanceMetric for CosineSimilarity {
    fn name(&self) -> &'static str {
        "Cosine"
    }

    fn orientation(&self) -> Orientation {
        Orientation::HigherIsCloser
    }

    fn relative_freq(&self) -> bool {
        self.relative_freq
    }

    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64 {
        let (mut dot, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
        for (_, wa, wb) in a.union(b) {
            let x = normalise(wa, size_a, self.relative_freq);
            let y = normalise(wb, size_b, self.relative_freq);
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }

        let denominator = norm_a.sqrt() * norm_b.sqrt();
        if denominator == 0.0 {
            return 0.0;
        }
        dot / denominator
    }
}

/// Weighted Jaccard coefficient: Σmin(a, b) / Σmax(a, b).
#[derive(Debug, Clone, Copy)]
pub struct JaccardCoefficient {
    relative_freq: bool,
}

impl JaccardCoefficient {
    pub fn new(relative_freq: bool) -> Self {
        Self { relative_freq }
    }
}

impl DistanceMetric for JaccardCoefficient {
    fn name(&self) -> &'static str {
        "Jaccard"
    }

    fn orientation(&self) -> Orientation {
        Orientation::HigherIsCloser
    }

    fn relative_freq(&self) -> bool {
        self.relative_freq
    }

    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64 {
        let (intersection, union) =
            a.union(b)
                .fold((0.0, 0.0), |(intersection, union), (_, wa, wb)| {
                    let x = normalise(wa, size_a, self.relative_freq);
                    let y = normalise(wb, size_b, self.relative_freq);
                    (intersection + x.min(y), union + x.max(y))
                });

        if union == 0.0 {
            return 0.0;
        }
        intersection / union
    }
}
