use super::distance::{DistanceMetric, Orientation};
use super::divergence::{ChiSquare, Combination, JsDivergence, KlDivergence};
use super::geometric::{EuclideanDistance, HellingerDistance, ManhattanDistance};
use super::overlap::{CosineSimilarity, JaccardCoefficient};
use crate::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The metrics selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Euclidean,
    Manhattan,
    Hellinger,
    Jaccard,
    Cosine,
    ChiSquare,
    KlDivergence,
    JsDivergence,
}

impl MetricKind {
    pub const ALL: [MetricKind; 8] = [
        MetricKind::Euclidean,
        MetricKind::Manhattan,
        MetricKind::Hellinger,
        MetricKind::Jaccard,
        MetricKind::Cosine,
        MetricKind::ChiSquare,
        MetricKind::KlDivergence,
        MetricKind::JsDivergence,
    ];

    /// Canonical name, also used for output file names.
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Euclidean => "Euclidean",
            MetricKind::Manhattan => "L1",
            MetricKind::Hellinger => "Hellinger",
            MetricKind::Jaccard => "Jaccard",
            MetricKind::Cosine => "Cosine",
            MetricKind::ChiSquare => "ChiSquare",
            MetricKind::KlDivergence => "KL",
            MetricKind::JsDivergence => "JS",
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            MetricKind::Cosine | MetricKind::Jaccard => Orientation::HigherIsCloser,
            _ => Orientation::LowerIsCloser,
        }
    }

    /// True when a low score means two documents are alike.
    pub fn low_score_is_similar(self) -> bool {
        self.orientation() == Orientation::LowerIsCloser
    }

    /// Instantiates the metric. `combination` only affects KL and Chi-square,
    /// `chi_square_top_n` only Chi-square.
    pub fn build(
        self,
        relative_freq: bool,
        combination: Option<Combination>,
        chi_square_top_n: usize,
    ) -> Arc<dyn DistanceMetric> {
        match self {
            MetricKind::Euclidean => Arc::new(EuclideanDistance::new(relative_freq)),
            MetricKind::Manhattan => Arc::new(ManhattanDistance::new(relative_freq)),
            MetricKind::Hellinger => Arc::new(HellingerDistance::new(relative_freq)),
            MetricKind::Jaccard => Arc::new(JaccardCoefficient::new(relative_freq)),
            MetricKind::Cosine => Arc::new(CosineSimilarity::new(relative_freq)),
            MetricKind::ChiSquare => Arc::new(
                ChiSquare::new(relative_freq)
                    .with_top_n(chi_square_top_n)
                    .with_combination(combination),
            ),
            MetricKind::KlDivergence => Arc::new(KlDivergence::new(relative_freq, combination)),
            MetricKind::JsDivergence => Arc::new(JsDivergence::new(relative_freq)),
        }
    }
}

impl FromStr for MetricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "euclidean" => MetricKind::Euclidean,
            "l1" | "l1norm" | "manhattan" => MetricKind::Manhattan,
            "hellinger" => MetricKind::Hellinger,
            "jaccard" => MetricKind::Jaccard,
            "cosine" => MetricKind::Cosine,
            "chisquare" | "chi-square" => MetricKind::ChiSquare,
            "kl" | "kldivergence" => MetricKind::KlDivergence,
            "js" | "jsdivergence" => MetricKind::JsDivergence,
            _ => return Err(Error::UnknownMetric(s.to_owned())),
        };
        Ok(kind)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distances::DEFAULT_CHI_SQUARE_TOP_N;

    #[test]
    fn test_names_round_trip_through_parsing() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.name().parse::<MetricKind>().unwrap(), kind);
        }
        assert_eq!("manhattan".parse::<MetricKind>().unwrap(), MetricKind::Manhattan);
    }

    #[test]
    fn test_unknown_metric() {
        let err = "bhattacharyya".parse::<MetricKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownMetric(name) if name == "bhattacharyya"));
    }

    #[test]
    fn test_built_metric_matches_kind() {
        for kind in MetricKind::ALL {
            let metric = kind.build(true, None, DEFAULT_CHI_SQUARE_TOP_N);
            assert_eq!(metric.name(), kind.name());
            assert_eq!(metric.orientation(), kind.orientation());
            assert!(metric.relative_freq());
        }
        assert!(!MetricKind::Cosine.low_score_is_similar());
        assert!(MetricKind::KlDivergence.low_score_is_similar());
    }
}
