use crate::clustering::Cluster;
use crate::core::Distribution;
use crate::representation::Document;
use std::fmt::Debug;

/// Which end of a metric's range means "closer".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Distances and divergences.
    LowerIsCloser,
    /// Similarities such as Cosine and Jaccard.
    HigherIsCloser,
}

impl Orientation {
    #[inline]
    pub fn is_better(self, candidate: f64, best: f64) -> bool {
        match self {
            Orientation::LowerIsCloser => candidate < best,
            Orientation::HigherIsCloser => candidate > best,
        }
    }
}

/// Trait defining the interface for distribution comparison metrics
pub trait DistanceMetric: Debug + Send + Sync {
    /// Short name used in configuration and output file names.
    fn name(&self) -> &'static str;

    fn orientation(&self) -> Orientation;

    /// True when weights are already relative frequencies or probabilities.
    /// Otherwise weights are counts and get divided by their corpus size.
    fn relative_freq(&self) -> bool;

    /// Scores `a` (of `size_a` tokens) against `b` (of `size_b` tokens).
    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64;

    /// Scores two documents. Used when filling a pairwise score matrix.
    fn compute_documents(&self, a: &Document, b: &Document) -> f64 {
        self.compute(
            a.distribution(),
            a.corpus_size(),
            b.distribution(),
            b.corpus_size(),
        )
    }

    /// Value compared when ranking clusters; the raw score by default.
    fn ranking_score(&self, score: f64) -> f64 {
        score
    }

    /// Indices of every cluster tied at the best score for `document`.
    fn closest_candidates(&self, document: &Document, clusters: &[Cluster]) -> Vec<usize> {
        let orientation = self.orientation();
        let mut best: Option<f64> = None;
        let mut candidates = Vec::new();

        for (idx, cluster) in clusters.iter().enumerate() {
            let score = self.ranking_score(self.compute(
                &cluster.centroid.distribution,
                cluster.centroid.distribution_size,
                document.distribution(),
                document.corpus_size(),
            ));
            if score.is_nan() {
                continue;
            }
            match best {
                Some(b) if score == b => candidates.push(idx),
                Some(b) if !orientation.is_better(score, b) => {}
                _ => {
                    candidates.clear();
                    candidates.push(idx);
                    best = Some(score);
                }
            }
        }
        candidates
    }

    /// The best cluster for `document`. Ties go to the cluster with the fewest members.
    fn closest_cluster(&self, document: &Document, clusters: &[Cluster]) -> usize {
        self.closest_candidates(document, clusters)
            .into_iter()
            .min_by_key(|&c| clusters[c].member_count())
            .unwrap_or(0)
    }
}

/// A weight as a relative frequency. An empty corpus yields 0.
#[inline]
pub(crate) fn normalise(weight: f64, corpus_size: usize, relative_freq: bool) -> f64 {
    if relative_freq {
        weight
    } else if corpus_size == 0 {
        0.0
    } else {
        weight / corpus_size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::{Centroid, Cluster};
    use crate::representation::WeightMode;

    /// Scores every centroid by its first weight, lower is closer.
    #[derive(Debug)]
    struct FirstWeight;

    impl DistanceMetric for FirstWeight {
        fn name(&self) -> &'static str {
            "FirstWeight"
        }
        fn orientation(&self) -> Orientation {
            Orientation::LowerIsCloser
        }
        fn relative_freq(&self) -> bool {
            true
        }
        fn compute(&self, a: &Distribution, _: usize, _: &Distribution, _: usize) -> f64 {
            a.iter().next().map_or(0.0, |(_, w)| w)
        }
    }

    fn cluster(score: f64, members: usize) -> Cluster {
        let distribution: Distribution = [("t", score)].into_iter().collect();
        let mut cluster = Cluster::new(Centroid::new(distribution));
        for m in 0..members {
            cluster.add_member(m);
        }
        cluster
    }

    fn document() -> Document {
        Document::from_parts("doc", Distribution::new(), 0, WeightMode::Relative)
    }

    #[test]
    fn test_candidates_collect_exact_ties() {
        let clusters = vec![cluster(0.5, 0), cluster(0.2, 0), cluster(0.2, 0)];
        assert_eq!(FirstWeight.closest_candidates(&document(), &clusters), vec![1, 2]);
    }

    #[test]
    fn test_tie_goes_to_smaller_cluster() {
        let clusters = vec![cluster(0.2, 3), cluster(0.2, 1)];
        assert_eq!(FirstWeight.closest_cluster(&document(), &clusters), 1);
    }

    #[test]
    fn test_equal_sizes_keep_first_candidate() {
        let clusters = vec![cluster(0.9, 0), cluster(0.2, 2), cluster(0.2, 2)];
        assert_eq!(FirstWeight.closest_cluster(&document(), &clusters), 1);
    }

    #[test]
    fn test_no_clusters_falls_back_to_zero() {
        assert_eq!(FirstWeight.closest_cluster(&document(), &[]), 0);
    }
}
