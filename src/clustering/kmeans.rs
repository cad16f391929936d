use crate::clustering::cluster::{Centroid, Cluster};
use crate::clustering::utils::{compute_mean, get_rng};
use crate::clustering::{ClusteringParams, InitializationMethod};
use crate::core::Distribution;
use crate::error::{Error, Result};
use crate::representation::Corpus;
use log::{debug, info, warn};
use rand::Rng;

/// Summary of a finished K-means run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmeansOutcome {
    /// Assignment rounds performed.
    pub iterations: usize,
    /// False when the iteration cap stopped the loop.
    pub converged: bool,
    /// 1-based round whose membership turned out to be final.
    pub stable_round: Option<usize>,
    /// Number of clusters after capping `k` to the corpus size.
    pub effective_k: usize,
}

/// Draws two distinct document indices per cluster without replacement.
///
/// The pool refills once fewer than two candidates remain, so `k` may
/// exceed `n / 2`. A single-document corpus yields `(0, 0)` pairs.
pub fn draw_seed_pairs(n: usize, k: usize, seed: Option<u64>) -> Vec<(usize, usize)> {
    if n <= 1 {
        return vec![(0, 0); k];
    }
    let mut rng = get_rng(seed);
    let mut pool: Vec<usize> = (0..n).collect();
    let mut pairs = Vec::with_capacity(k);

    for _ in 0..k {
        if pool.len() < 2 {
            pool = (0..n).collect();
        }
        let first = pool.swap_remove(rng.random_range(0..pool.len()));
        let second = pool.swap_remove(rng.random_range(0..pool.len()));
        pairs.push((first, second));
    }
    pairs
}

/// K-means over document distributions with a pluggable metric.
pub struct Kmeans<'a> {
    pub clusters: Vec<Cluster>,
    pub corpus: &'a Corpus,
    pub params: ClusteringParams,
    template: Distribution,
}

impl<'a> Kmeans<'a> {
    /// `template` holds every token of the corpus at weight 0, as built by a
    /// Forgy [`CentroidAccumulator`](crate::representation::CentroidAccumulator).
    pub fn new(params: ClusteringParams, corpus: &'a Corpus, template: Distribution) -> Self {
        Self {
            clusters: Vec::new(),
            corpus,
            params,
            template,
        }
    }

    pub fn fit(&mut self) -> Result<KmeansOutcome> {
        if self.corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let documents = self.corpus.len();
        if self.params.k == 0 {
            return Err(Error::InvalidClusterCount {
                requested: 0,
                documents,
            });
        }
        let mut k = self.params.k;
        if k > documents {
            warn!(
                "k = {} exceeds the {} documents, reducing k to {}",
                k, documents, documents
            );
            k = documents;
        }

        info!(
            "Running K-means with k = {}, metric {}, {} documents",
            k,
            self.params.distance_metric.name(),
            documents
        );
        self.initialize_clusters(k);

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.params.max_iterations {
            self.assign_members();
            self.reestimate_centroids();

            let changed = iterations == 0 || self.clusters.iter().any(Cluster::has_changed);
            info!("Iteration {}", iterations);
            for (idx, cluster) in self.clusters.iter().enumerate() {
                debug!("cluster {}: {:?}", idx, cluster.history().last());
            }
            iterations += 1;

            if !changed {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                "K-means stopped after {} iterations without converging",
                iterations
            );
        }

        Ok(KmeansOutcome {
            iterations,
            converged,
            stable_round: converged.then(|| iterations - 1),
            effective_k: k,
        })
    }

    /// Initializes clusters using the specified method.
    fn initialize_clusters(&mut self, k: usize) {
        self.clusters = match self.params.initialization_method {
            InitializationMethod::ForgyPairs => self.forgy_pair_centroids(k),
            InitializationMethod::Random => self.random_centroids(k),
        }
        .into_iter()
        .map(|distribution| Cluster::new(Centroid::new(distribution)))
        .collect();
    }

    /// Every centroid is the template plus half of each of two seed documents.
    fn forgy_pair_centroids(&self, k: usize) -> Vec<Distribution> {
        draw_seed_pairs(self.corpus.len(), k, self.params.rng_seed)
            .into_iter()
            .filter_map(|(a, b)| {
                let first = self.corpus.get(a)?;
                let second = self.corpus.get(b)?;
                debug!("Seeding centroid from {} and {}", first.name(), second.name());

                let mut distribution = self.template.clone();
                for (token, weight) in first.distribution().iter() {
                    distribution.add(token, 0.5 * weight);
                }
                for (token, weight) in second.distribution().iter() {
                    distribution.add(token, 0.5 * weight);
                }
                Some(distribution)
            })
            .collect()
    }

    fn random_centroids(&self, k: usize) -> Vec<Distribution> {
        let mut rng = get_rng(self.params.rng_seed);
        let mut centroids = vec![Distribution::with_capacity(self.template.len()); k];
        for token in self.template.keys() {
            for centroid in centroids.iter_mut() {
                centroid.insert(token, rng.random::<f64>());
            }
        }
        centroids
    }

    /// Assigns each document to its closest cluster, in corpus order.
    fn assign_members(&mut self) {
        for cluster in self.clusters.iter_mut() {
            cluster.clear_members();
        }

        let metric = &self.params.distance_metric;
        for (idx, document) in self.corpus.documents().iter().enumerate() {
            let best = metric.closest_cluster(document, &self.clusters);
            self.clusters[best].add_member(idx);
        }

        for cluster in self.clusters.iter_mut() {
            cluster.update_distribution_size(self.corpus);
            cluster.update_history(self.corpus);
        }
    }

    fn reestimate_centroids(&mut self) {
        for cluster in self.clusters.iter_mut() {
            cluster.centroid.distribution =
                compute_mean(&cluster.centroid.distribution, self.corpus, cluster.members());
        }
    }

    /// The cluster index of every document, in corpus order.
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0usize; self.corpus.len()];
        for (c_idx, cluster) in self.clusters.iter().enumerate() {
            for &member in cluster.members() {
                labels[member] = c_idx;
            }
        }
        labels
    }

    /// Sum over all members of the squared difference to their centroid.
    pub fn sum_of_squared_error(&self) -> f64 {
        self.clusters
            .iter()
            .flat_map(|cluster| {
                cluster
                    .members()
                    .iter()
                    .filter_map(|&m| self.corpus.get(m))
                    .map(move |document| {
                        document
                            .distribution()
                            .union(&cluster.centroid.distribution)
                            .map(|(_, member, mean)| (member - mean).powi(2))
                            .sum::<f64>()
                    })
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distances::{EuclideanDistance, KlDivergence};
    use crate::representation::{Document, WeightMode};
    use std::sync::Arc;

    fn create_test_corpus() -> (Corpus, Distribution) {
        let docs = vec![
            ("a", vec![("x", 0.9), ("y", 0.1)]),
            ("b", vec![("x", 0.8), ("y", 0.2)]),
            ("c", vec![("z", 0.9), ("w", 0.1)]),
            ("d", vec![("z", 0.7), ("w", 0.3)]),
        ];
        let mut template = Distribution::new();
        let documents = docs
            .into_iter()
            .map(|(name, entries)| {
                let distribution: Distribution = entries.into_iter().collect();
                for token in distribution.keys() {
                    template.insert(token, 0.0);
                }
                Document::from_parts(name, distribution, 10, WeightMode::Relative)
            })
            .collect();
        (Corpus::from_documents(documents), template)
    }

    #[test]
    fn test_draw_seed_pairs_distinct_and_reproducible() {
        let pairs = draw_seed_pairs(6, 3, Some(42));
        assert_eq!(pairs, draw_seed_pairs(6, 3, Some(42)));

        let mut seen: Vec<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_draw_seed_pairs_refills_pool() {
        let pairs = draw_seed_pairs(3, 3, Some(1));
        assert_eq!(pairs.len(), 3);
        for (a, b) in pairs {
            assert_ne!(a, b);
            assert!(a < 3 && b < 3);
        }
        assert_eq!(draw_seed_pairs(1, 2, Some(1)), vec![(0, 0), (0, 0)]);
    }

    #[test]
    fn test_forgy_centroid_blends_seed_documents() {
        let (corpus, template) = create_test_corpus();
        let params = ClusteringParams::new(Arc::new(EuclideanDistance::new(true)), 1).with_seed(3);
        let mut kmeans = Kmeans::new(params, &corpus, template);
        kmeans.initialize_clusters(1);

        let centroid = &kmeans.clusters[0].centroid;
        assert_eq!(centroid.distribution.len(), 4);
        assert!((centroid.distribution.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_separates_two_topics() {
        let (corpus, template) = create_test_corpus();
        let params = ClusteringParams::new(Arc::new(EuclideanDistance::new(true)), 2).with_seed(42);
        let mut kmeans = Kmeans::new(params, &corpus, template);
        let outcome = kmeans.fit().unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.effective_k, 2);
        let labels = kmeans.labels();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_random_initialization_covers_template() {
        let (corpus, template) = create_test_corpus();
        let params = ClusteringParams::new(Arc::new(KlDivergence::new(true, None)), 2)
            .with_seed(9)
            .with_initialization(InitializationMethod::Random);
        let mut kmeans = Kmeans::new(params, &corpus, template);
        kmeans.initialize_clusters(2);

        for cluster in &kmeans.clusters {
            assert_eq!(cluster.centroid.distribution.len(), 4);
            assert!(cluster
                .centroid
                .distribution
                .iter()
                .all(|(_, w)| (0.0..1.0).contains(&w)));
        }
    }

    #[test]
    fn test_zero_k_is_rejected() {
        let (corpus, template) = create_test_corpus();
        let params = ClusteringParams::new(Arc::new(EuclideanDistance::new(true)), 0);
        let result = Kmeans::new(params, &corpus, template).fit();
        assert!(matches!(result, Err(Error::InvalidClusterCount { requested: 0, documents: 4 })));
    }

    #[test]
    fn test_sum_of_squared_error_single_cluster() {
        let (corpus, template) = create_test_corpus();
        let params = ClusteringParams::new(Arc::new(EuclideanDistance::new(true)), 1).with_seed(5);
        let mut kmeans = Kmeans::new(params, &corpus, template);
        kmeans.fit().unwrap();

        // centroid = mean of the four documents: x .425, y .075, z .4, w .1
        let expected: f64 = [
            [0.9f64, 0.1, 0.0, 0.0],
            [0.8, 0.2, 0.0, 0.0],
            [0.0, 0.0, 0.9, 0.1],
            [0.0, 0.0, 0.7, 0.3],
        ]
        .iter()
        .map(|row| {
            row.iter()
                .zip([0.425f64, 0.075, 0.4, 0.1])
                .map(|(v, m): (&f64, f64)| (v - m).powi(2))
                .sum::<f64>()
        })
        .sum();
        assert!((kmeans.sum_of_squared_error() - expected).abs() < 1e-9);
    }
}
