use crate::core::Distribution;
use crate::representation::Corpus;
use rand::rngs::SmallRng;
use rand::{rng, SeedableRng};

/// Per-key mean of the members' weights over the keys of `current`.
///
/// A key a member lacks counts as 0. With no members `current` is returned
/// unchanged.
pub fn compute_mean(current: &Distribution, corpus: &Corpus, members: &[usize]) -> Distribution {
    if members.is_empty() {
        return current.clone();
    }
    let documents: Vec<_> = members.iter().filter_map(|&m| corpus.get(m)).collect();
    let count = members.len() as f64;

    current
        .keys()
        .map(|token| {
            let sum: f64 = documents
                .iter()
                .map(|d| d.distribution().weight(token))
                .sum();
            (token, sum / count)
        })
        .collect()
}

/// Returns a random number generator based on the seed (or entropy).
pub fn get_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::{Document, WeightMode};
    use rand::Rng;

    #[test]
    fn test_compute_mean() {
        let docs = vec![
            Document::from_parts("a", [("x", 0.2), ("y", 0.8)].into_iter().collect(), 5, WeightMode::Relative),
            Document::from_parts("b", [("y", 0.4)].into_iter().collect(), 5, WeightMode::Relative),
            Document::from_parts("c", [("x", 1.0)].into_iter().collect(), 5, WeightMode::Relative),
        ];
        let corpus = Corpus::from_documents(docs);
        let template: Distribution = [("x", 0.0), ("y", 0.0), ("z", 0.0)].into_iter().collect();

        let mean = compute_mean(&template, &corpus, &[0, 1]);
        assert!((mean.weight("x") - 0.1).abs() < 1e-12, "Expected 0.1, got {}", mean.weight("x"));
        assert!((mean.weight("y") - 0.6).abs() < 1e-12, "Expected 0.6, got {}", mean.weight("y"));
        assert_eq!(mean.weight("z"), 0.0);
        assert_eq!(mean.len(), 3);
    }

    #[test]
    fn test_compute_mean_without_members_keeps_centroid() {
        let corpus = Corpus::default();
        let current: Distribution = [("x", 0.3)].into_iter().collect();
        assert_eq!(compute_mean(&current, &corpus, &[]), current);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let (mut first, mut second) = (get_rng(Some(7)), get_rng(Some(7)));
        let a: Vec<u32> = (0..4).map(|_| first.random()).collect();
        let b: Vec<u32> = (0..4).map(|_| second.random()).collect();
        assert_eq!(a, b);
    }
}
