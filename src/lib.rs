/// docsim: document similarity from word distributions
///
/// Documents are reduced to token frequency distributions and compared with one
/// of eight metrics. The scores drive K-means clustering directly, or
/// single-link hierarchical clustering through a lower-triangular score matrix.
///
/// # Modules
/// - `representation`: Turns text and bilingual lexicon files into distributions.
/// - `distances`: The `DistanceMetric` trait and its implementations.
/// - `clustering`: K-means, the adjacency matrix and single-link clustering.
pub mod clustering;
pub mod config;
pub mod core;
pub mod distances;
pub mod error;
pub mod io;
pub mod representation;
pub mod similarity;
pub mod visualization;
pub mod vocabulary;

pub use error::{Error, Result};
