pub mod adjacency;
pub mod cluster;
pub mod clustering;
pub mod dendrogram;
pub mod hierarchical;
pub mod kmeans;
pub mod soft_divisive;
pub mod utils;

pub use adjacency::AdjacencyMatrix;
pub use cluster::{Centroid, Cluster};
pub use clustering::{ClusteringParams, InitializationMethod, DEFAULT_MAX_ITERATIONS};
pub use dendrogram::{default_output_path, write_dendrogram, Dendrogram};
pub use hierarchical::{HierarchicalCluster, SingleLinkClustering};
pub use kmeans::{draw_seed_pairs, Kmeans, KmeansOutcome};
pub use soft_divisive::{SoftDivisiveClustering, SoftDivisiveOutcome, SoftDivisiveParams};
