//! Soft divisive clustering by deterministic annealing.
//!
//! Every document belongs to every centroid with probability proportional to
//! `exp(-beta * KL(document ‖ centroid))`. The run starts from a single
//! centroid, the corpus mean. At each `beta` every centroid gets a perturbed
//! twin, centroids and twins are re-estimated from the memberships, and a
//! twin that ends up the most probable cluster for some documents (while its
//! centroid keeps others) splits off as a cluster of its own. Raising `beta`
//! sharpens the memberships until `beta_max` or `max_clusters` is reached.

use crate::clustering::utils::get_rng;
use crate::core::Distribution;
use crate::distances::kl_divergence;
use crate::error::{Error, Result};
use crate::representation::Corpus;
use log::{debug, info};
use rand::Rng;

pub const DEFAULT_INITIAL_BETA: f64 = 0.5;
pub const DEFAULT_BETA_MAX: f64 = 8.0;
pub const DEFAULT_MAX_CLUSTERS: usize = 5;
pub const DEFAULT_ROUNDS_PER_BETA: usize = 4;
pub const DEFAULT_BETA_STEP_UP: f64 = 0.5;
pub const DEFAULT_BETA_STEP_DOWN: f64 = 0.25;

/// Below this divergence a twin has collapsed onto its centroid.
const TWIN_COLLAPSE_DIVERGENCE: f64 = 1e-6;

/// Annealing schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftDivisiveParams {
    pub initial_beta: f64,
    pub beta_max: f64,
    pub max_clusters: usize,
    /// Re-estimation rounds between two split checks.
    pub rounds_per_beta: usize,
    /// Added to `beta` after a step with at most one split.
    pub beta_step_up: f64,
    /// Subtracted from `beta` after a step with several splits.
    pub beta_step_down: f64,
    pub rng_seed: Option<u64>,
}

impl Default for SoftDivisiveParams {
    fn default() -> Self {
        Self {
            initial_beta: DEFAULT_INITIAL_BETA,
            beta_max: DEFAULT_BETA_MAX,
            max_clusters: DEFAULT_MAX_CLUSTERS,
            rounds_per_beta: DEFAULT_ROUNDS_PER_BETA,
            beta_step_up: DEFAULT_BETA_STEP_UP,
            beta_step_down: DEFAULT_BETA_STEP_DOWN,
            rng_seed: None,
        }
    }
}

impl SoftDivisiveParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        self.max_clusters = max_clusters;
        self
    }

    pub fn with_beta(mut self, initial_beta: f64, beta_max: f64) -> Self {
        self.initial_beta = initial_beta;
        self.beta_max = beta_max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Err(Error::InvalidConfig(message.to_string()));
        if !(self.initial_beta.is_finite() && self.initial_beta >= 0.0) {
            return invalid("initial_beta must be a non-negative number");
        }
        if !self.beta_max.is_finite() {
            return invalid("beta_max must be finite");
        }
        if self.max_clusters == 0 {
            return invalid("max_clusters must be greater than 0");
        }
        if self.rounds_per_beta == 0 {
            return invalid("rounds_per_beta must be greater than 0");
        }
        if !(self.beta_step_up.is_finite() && self.beta_step_up > 0.0) {
            return invalid("beta_step_up must be a positive number");
        }
        if !(self.beta_step_down.is_finite() && self.beta_step_down >= 0.0) {
            return invalid("beta_step_down must be a non-negative number");
        }
        Ok(())
    }
}

/// Summary of a finished annealing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftDivisiveOutcome {
    /// Number of `beta` values visited.
    pub beta_steps: usize,
    /// `beta` after the last step.
    pub final_beta: f64,
    pub clusters: usize,
}

/// Copy of `centroid` with a few random keys set to fresh weights in `(0, 1]`.
///
/// Between 1 and `len / 5` keys are drawn (at least 1), with repetition.
pub fn create_twin<R: Rng + ?Sized>(centroid: &Distribution, rng: &mut R) -> Distribution {
    let mut twin = centroid.clone();
    let tokens: Vec<&str> = centroid.keys().collect();
    if tokens.is_empty() {
        return twin;
    }
    let places = rng.random_range(0..(tokens.len() / 5).max(1)) + 1;
    for _ in 0..places {
        let token = tokens[rng.random_range(0..tokens.len())];
        twin.insert(token, 1.0 - rng.random::<f64>());
    }
    twin
}

/// Membership probabilities of `document` in each of `centroids` at
/// inverse temperature `beta`. The result sums to 1 unless `centroids` is empty.
pub fn membership_probabilities(
    document: &Distribution,
    centroids: &[&Distribution],
    beta: f64,
) -> Vec<f64> {
    let divergences: Vec<f64> = centroids
        .iter()
        .map(|c| kl_divergence(document, document.len(), c, c.len(), true))
        .collect();

    // measured from the nearest centroid, so at least one weight is exactly 1
    let nearest = divergences
        .iter()
        .copied()
        .filter(|d| d.is_finite())
        .fold(f64::INFINITY, f64::min);
    let weights: Vec<f64> = divergences
        .iter()
        .map(|&d| {
            if d.is_finite() {
                (-beta * (d - nearest)).exp()
            } else {
                0.0
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        let uniform = 1.0 / centroids.len().max(1) as f64;
        return vec![uniform; centroids.len()];
    }
    weights.into_iter().map(|w| w / total).collect()
}

/// Index of the largest probability; the first one wins ties.
pub fn most_probable(row: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &p) in row.iter().enumerate() {
        if p > row[best] {
            best = idx;
        }
    }
    best
}

/// Bayes-inverse re-estimation: every key of `current` becomes the
/// membership-weighted mean of the documents' weights. Under a uniform
/// document prior `p(x | c)` is `p(c | x) / Σ p(c | x')`.
fn reestimate(current: &Distribution, profiles: &[Distribution], responsibilities: &[f64]) -> Distribution {
    let total: f64 = responsibilities.iter().sum();
    if !(total > 0.0) {
        return current.clone();
    }
    current
        .keys()
        .map(|token| {
            let weight: f64 = profiles
                .iter()
                .zip(responsibilities)
                .map(|(profile, r)| r / total * profile.weight(token))
                .sum();
            (token, weight)
        })
        .collect()
}

pub struct SoftDivisiveClustering<'a> {
    pub corpus: &'a Corpus,
    pub params: SoftDivisiveParams,
    pub centroids: Vec<Distribution>,
    /// Per document, the probability of each centroid at `beta_max`.
    pub memberships: Vec<Vec<f64>>,
    initial: Distribution,
}

impl<'a> SoftDivisiveClustering<'a> {
    /// `initial` is the corpus mean, as built by a soft
    /// [`CentroidAccumulator`](crate::representation::CentroidAccumulator).
    pub fn new(params: SoftDivisiveParams, corpus: &'a Corpus, initial: Distribution) -> Self {
        Self {
            corpus,
            params,
            centroids: Vec::new(),
            memberships: Vec::new(),
            initial,
        }
    }

    pub fn fit(&mut self) -> Result<SoftDivisiveOutcome> {
        if self.corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        self.params.validate()?;

        let profiles: Vec<Distribution> = self
            .corpus
            .documents()
            .iter()
            .map(|document| {
                document
                    .distribution()
                    .keys()
                    .map(|token| (token, document.relative_weight(token)))
                    .collect()
            })
            .collect();
        let max_clusters = self.params.max_clusters.min(self.corpus.len());
        let mut rng = get_rng(self.params.rng_seed);
        let mut beta = self.params.initial_beta;
        let mut beta_steps = 0;
        self.centroids = vec![self.initial.clone()];

        info!(
            "Running soft divisive clustering on {} documents, beta {} to {}, at most {} clusters",
            profiles.len(),
            self.params.initial_beta,
            self.params.beta_max,
            max_clusters
        );

        while beta < self.params.beta_max && self.centroids.len() < max_clusters {
            let mut twins: Vec<Distribution> = self
                .centroids
                .iter()
                .map(|centroid| create_twin(centroid, &mut rng))
                .collect();
            let n = self.centroids.len();

            for _ in 0..self.params.rounds_per_beta {
                let rows = joint_memberships(&profiles, &self.centroids, &twins, beta);
                let column = |c: usize| -> Vec<f64> { rows.iter().map(|row| row[c]).collect() };
                let centroids: Vec<Distribution> = (0..n)
                    .map(|i| reestimate(&self.centroids[i], &profiles, &column(i)))
                    .collect();
                twins = (0..n)
                    .map(|i| reestimate(&twins[i], &profiles, &column(n + i)))
                    .collect();
                self.centroids = centroids;
            }

            let rows = joint_memberships(&profiles, &self.centroids, &twins, beta);
            let mut wins = vec![0usize; 2 * n];
            for row in &rows {
                wins[most_probable(row)] += 1;
            }

            let mut accepted = 0;
            for (i, twin) in twins.into_iter().enumerate() {
                if self.centroids.len() >= max_clusters {
                    break;
                }
                let divergence = kl_divergence(
                    &self.centroids[i],
                    self.centroids[i].len(),
                    &twin,
                    twin.len(),
                    true,
                )
                .abs();
                if wins[i] > 0 && wins[n + i] > 0 && divergence > TWIN_COLLAPSE_DIVERGENCE {
                    debug!("Twin of cluster {} split off (divergence {:.6})", i, divergence);
                    self.centroids.push(twin);
                    accepted += 1;
                }
            }

            info!(
                "beta {:.3}: {} split(s), {} cluster(s)",
                beta,
                accepted,
                self.centroids.len()
            );
            beta = if accepted > 1 {
                beta - self.params.beta_step_down
            } else {
                beta + self.params.beta_step_up
            };
            beta_steps += 1;
        }

        let centroids: Vec<&Distribution> = self.centroids.iter().collect();
        self.memberships = profiles
            .iter()
            .map(|profile| membership_probabilities(profile, &centroids, self.params.beta_max))
            .collect();
        for (document, row) in self.corpus.documents().iter().zip(&self.memberships) {
            debug!("{}: {:?}", document.name(), row);
        }

        Ok(SoftDivisiveOutcome {
            beta_steps,
            final_beta: beta,
            clusters: self.centroids.len(),
        })
    }

    /// Most probable cluster of every document, in corpus order.
    pub fn labels(&self) -> Vec<usize> {
        self.memberships.iter().map(|row| most_probable(row)).collect()
    }
}

/// Memberships over the centroids followed by their twins.
fn joint_memberships(
    profiles: &[Distribution],
    centroids: &[Distribution],
    twins: &[Distribution],
    beta: f64,
) -> Vec<Vec<f64>> {
    let all: Vec<&Distribution> = centroids.iter().chain(twins).collect();
    profiles
        .iter()
        .map(|profile| membership_probabilities(profile, &all, beta))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::{AccumulatorMode, CentroidAccumulator, Document, WeightMode};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn dist(entries: &[(&str, f64)]) -> Distribution {
        entries.iter().copied().collect()
    }

    fn corpus_with_mean(texts: &[&[(&str, f64)]]) -> (Corpus, Distribution) {
        let mut accumulator = CentroidAccumulator::new(AccumulatorMode::Soft);
        let documents: Vec<Document> = texts
            .iter()
            .enumerate()
            .map(|(i, entries)| {
                let document = Document::from_parts(format!("doc{i}"), dist(entries), 10, WeightMode::Relative);
                accumulator.absorb(&document);
                document
            })
            .collect();
        (Corpus::from_documents(documents), accumulator.mean())
    }

    #[test]
    fn test_twin_perturbs_few_keys() {
        let centroid: Distribution = (0..20).map(|i| (format!("w{i}"), 0.05)).collect();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..20 {
            let twin = create_twin(&centroid, &mut rng);
            let keys: Vec<&str> = twin.keys().collect();
            assert_eq!(keys, centroid.keys().collect::<Vec<_>>());

            let changed = twin.iter().filter(|&(_, w)| w != 0.05).count();
            assert!((1..=4).contains(&changed), "{} keys changed", changed);
            assert!(twin.iter().all(|(_, w)| w > 0.0 && w <= 1.0));
        }

        assert!(create_twin(&Distribution::new(), &mut rng).is_empty());
    }

    #[test]
    fn test_memberships_sum_to_one_and_favour_the_closer_centroid() {
        let document = dist(&[("x", 0.8), ("y", 0.2)]);
        let close = dist(&[("x", 0.7), ("y", 0.3), ("z", 0.0)]);
        let far = dist(&[("x", 0.1), ("y", 0.1), ("z", 0.8)]);

        let probabilities = membership_probabilities(&document, &[&close, &far], 1.0);
        assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(probabilities[0] > probabilities[1]);

        // a huge beta must not underflow every weight to 0
        let sharp = membership_probabilities(&document, &[&close, &far], 1e6);
        assert_eq!(sharp, vec![1.0, 0.0]);

        assert!(membership_probabilities(&document, &[], 1.0).is_empty());
    }

    #[test]
    fn test_most_probable_keeps_first_on_ties() {
        assert_eq!(most_probable(&[0.25, 0.5, 0.25]), 1);
        assert_eq!(most_probable(&[0.5, 0.5]), 0);
    }

    #[test]
    fn test_reestimate_weights_documents_by_membership() {
        let profiles = vec![dist(&[("x", 1.0)]), dist(&[("y", 1.0)])];
        let current = dist(&[("x", 0.5), ("y", 0.5)]);

        let updated = reestimate(&current, &profiles, &[0.3, 0.1]);
        assert!((updated.weight("x") - 0.75).abs() < 1e-12);
        assert!((updated.weight("y") - 0.25).abs() < 1e-12);

        assert_eq!(reestimate(&current, &profiles, &[0.0, 0.0]), current);
    }

    #[test]
    fn test_two_topics_split_into_two_clusters() {
        let (corpus, mean) = corpus_with_mean(&[
            &[("apple", 0.5), ("pear", 1.0 / 3.0), ("plum", 1.0 / 6.0)],
            &[("apple", 0.4), ("pear", 0.2), ("plum", 0.4)],
            &[("car", 0.4), ("bus", 0.4), ("truck", 0.2)],
            &[("car", 0.25), ("bus", 0.25), ("truck", 0.5)],
        ]);

        for seed in 0..5 {
            let params = SoftDivisiveParams::default().with_max_clusters(2).with_seed(seed);
            let mut soft = SoftDivisiveClustering::new(params, &corpus, mean.clone());
            let outcome = soft.fit().unwrap();

            assert_eq!(outcome.clusters, 2, "seed {}", seed);
            let labels = soft.labels();
            assert_eq!(labels[0], labels[1], "seed {}", seed);
            assert_eq!(labels[2], labels[3], "seed {}", seed);
            assert_ne!(labels[0], labels[2], "seed {}", seed);
            for row in &soft.memberships {
                assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_identical_documents_never_split() {
        let entries: &[(&str, f64)] = &[("a", 0.5), ("b", 0.25), ("c", 0.25)];
        let (corpus, mean) = corpus_with_mean(&[entries, entries, entries]);

        let params = SoftDivisiveParams::default().with_seed(3);
        let mut soft = SoftDivisiveClustering::new(params, &corpus, mean);
        let outcome = soft.fit().unwrap();

        assert_eq!(outcome.clusters, 1);
        assert!(outcome.final_beta >= DEFAULT_BETA_MAX);
        assert_eq!(soft.labels(), vec![0, 0, 0]);
        assert_eq!(soft.memberships, vec![vec![1.0]; 3]);
    }

    #[test]
    fn test_single_document_and_bad_params() {
        let (corpus, mean) = corpus_with_mean(&[&[("a", 1.0)]]);
        let mut soft = SoftDivisiveClustering::new(SoftDivisiveParams::default(), &corpus, mean.clone());
        let outcome = soft.fit().unwrap();
        assert_eq!(outcome.clusters, 1);
        assert_eq!(outcome.beta_steps, 0);

        let params = SoftDivisiveParams::default().with_max_clusters(0);
        let mut soft = SoftDivisiveClustering::new(params, &corpus, mean);
        assert!(matches!(soft.fit(), Err(Error::InvalidConfig(_))));

        let empty = Corpus::default();
        let mut soft = SoftDivisiveClustering::new(SoftDivisiveParams::default(), &empty, Distribution::new());
        assert!(matches!(soft.fit(), Err(Error::EmptyCorpus)));
    }
}
