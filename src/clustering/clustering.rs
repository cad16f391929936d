use crate::distances::DistanceMetric;
use crate::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Upper bound on assignment rounds unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: usize = 2500;

/// How the initial centroids of K-means are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializationMethod {
    /// Each centroid blends two distinct randomly drawn documents.
    #[default]
    ForgyPairs,
    /// Each centroid gets a uniform random weight for every known token.
    Random,
}

impl FromStr for InitializationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forgypairs" | "forgy" => Ok(InitializationMethod::ForgyPairs),
            "random" => Ok(InitializationMethod::Random),
            _ => Err(Error::InvalidConfig(format!(
                "unsupported initialization method: {s}"
            ))),
        }
    }
}

impl fmt::Display for InitializationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitializationMethod::ForgyPairs => write!(f, "ForgyPairs"),
            InitializationMethod::Random => write!(f, "Random"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClusteringParams {
    pub distance_metric: Arc<dyn DistanceMetric>,
    pub initialization_method: InitializationMethod,
    pub k: usize,
    pub max_iterations: usize,
    pub rng_seed: Option<u64>,
}

impl ClusteringParams {
    /// Forgy-pair seeding, the default iteration cap and no fixed seed.
    pub fn new(distance_metric: Arc<dyn DistanceMetric>, k: usize) -> Self {
        Self {
            distance_metric,
            initialization_method: InitializationMethod::default(),
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_initialization(mut self, method: InitializationMethod) -> Self {
        self.initialization_method = method;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization_method_parsing() {
        assert_eq!(
            "ForgyPairs".parse::<InitializationMethod>().unwrap(),
            InitializationMethod::ForgyPairs
        );
        assert_eq!(
            "random".parse::<InitializationMethod>().unwrap(),
            InitializationMethod::Random
        );
        assert!("KMeansPlusPlus".parse::<InitializationMethod>().is_err());
    }
}
