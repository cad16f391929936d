pub mod distance;
pub mod divergence;
pub mod geometric;
pub mod kind;
pub mod overlap;

pub use distance::{DistanceMetric, Orientation};
pub use divergence::{
    chi_square, kl_divergence, ChiSquare, Combination, JsDivergence, KlDivergence,
    DEFAULT_CHI_SQUARE_TOP_N,
};
pub use geometric::{EuclideanDistance, HellingerDistance, ManhattanDistance};
pub use kind::MetricKind;
pub use overlap::{CosineSimilarity, JaccardCoefficient};
