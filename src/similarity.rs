//! Pairwise scoring of a whole corpus.

use crate::clustering::adjacency::{triangle_len, AdjacencyMatrix};
use crate::distances::DistanceMetric;
use crate::error::Result;
use crate::representation::Corpus;
use log::{debug, info};

/// Scores every document against every earlier one.
///
/// Row `r` compares document `r` (first argument) with documents `0..r`,
/// matching the [`AdjacencyMatrix`] layout.
pub fn score_matrix(corpus: &Corpus, metric: &dyn DistanceMetric) -> Result<AdjacencyMatrix> {
    let documents = corpus.documents();
    let mut scores = Vec::with_capacity(triangle_len(documents.len()));

    for (row, document) in documents.iter().enumerate().skip(1) {
        for other in &documents[..row] {
            scores.push(metric.compute_documents(document, other));
        }
        debug!("Scored row {} ({})", row, document.name());
    }
    info!(
        "Computed {} {} scores for {} documents",
        scores.len(),
        metric.name(),
        documents.len()
    );

    AdjacencyMatrix::from_parts(scores, corpus.names())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Distribution;
    use crate::distances::ManhattanDistance;
    use crate::representation::{Document, WeightMode};

    #[test]
    fn test_score_matrix_layout() {
        let docs = [
            ("a", vec![("x", 1.0)]),
            ("b", vec![("x", 0.5), ("y", 0.5)]),
            ("c", vec![("y", 1.0)]),
        ]
        .into_iter()
        .map(|(name, entries)| {
            let distribution: Distribution = entries.into_iter().collect();
            Document::from_parts(name, distribution, 2, WeightMode::Relative)
        })
        .collect();
        let corpus = Corpus::from_documents(docs);

        let matrix = score_matrix(&corpus, &ManhattanDistance::new(true)).unwrap();
        // (b,a) = 1.0, (c,a) = 2.0, (c,b) = 1.0
        assert_eq!(matrix.scores(), &[1.0, 2.0, 1.0]);
        assert_eq!(matrix.documents(), &["a", "b", "c"]);
    }
}
