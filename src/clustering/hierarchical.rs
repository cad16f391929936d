use crate::clustering::adjacency::AdjacencyMatrix;
use crate::error::{Error, Result};
use log::{debug, info};

/// Node of the single-link merge tree.
#[derive(Debug, Clone, PartialEq)]
pub enum HierarchicalCluster {
    /// A single document.
    Unary { name: String, index: usize },
    /// Two clusters merged at `min_distance`.
    Binary {
        left: Box<HierarchicalCluster>,
        right: Box<HierarchicalCluster>,
        min_distance: f64,
    },
}

impl HierarchicalCluster {
    /// Score at which this cluster was formed; a leaf was never merged.
    pub fn min_distance(&self) -> f64 {
        match self {
            HierarchicalCluster::Unary { .. } => f64::INFINITY,
            HierarchicalCluster::Binary { min_distance, .. } => *min_distance,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, HierarchicalCluster::Binary { .. })
    }

    /// Document names below this node, left subtree first.
    pub fn members(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.visit_leaves(&mut |name, _| names.push(name));
        names
    }

    /// Document indices below this node, left subtree first.
    pub fn indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        self.visit_leaves(&mut |_, index| indices.push(index));
        indices
    }

    pub fn size(&self) -> usize {
        match self {
            HierarchicalCluster::Unary { .. } => 1,
            HierarchicalCluster::Binary { left, right, .. } => left.size() + right.size(),
        }
    }

    fn visit_leaves<'a>(&'a self, f: &mut impl FnMut(&'a str, usize)) {
        match self {
            HierarchicalCluster::Unary { name, index } => f(name.as_str(), *index),
            HierarchicalCluster::Binary { left, right, .. } => {
                left.visit_leaves(f);
                right.visit_leaves(f);
            }
        }
    }
}

/// Single-link agglomerative clustering over a precomputed score matrix.
pub struct SingleLinkClustering {
    pub matrix: AdjacencyMatrix,
    pub low_score_is_similar: bool,
}

impl SingleLinkClustering {
    pub fn new(matrix: AdjacencyMatrix, low_score_is_similar: bool) -> Self {
        Self {
            matrix,
            low_score_is_similar,
        }
    }

    /// Merges clusters pair by pair, most similar pair first, until one root remains.
    pub fn fit(&self) -> Result<HierarchicalCluster> {
        let documents = self.matrix.documents();
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        info!(
            "Single-link clustering of {} documents over {} scores",
            documents.len(),
            self.matrix.len()
        );

        let mut slots: Vec<Option<HierarchicalCluster>> = documents
            .iter()
            .enumerate()
            .map(|(index, name)| {
                Some(HierarchicalCluster::Unary {
                    name: name.clone(),
                    index,
                })
            })
            .collect();
        // owner[d] is the slot currently holding document d
        let mut owner: Vec<usize> = (0..documents.len()).collect();
        let mut slot_members: Vec<Vec<usize>> = (0..documents.len()).map(|d| vec![d]).collect();

        for entry in self.matrix.ranking(self.low_score_is_similar) {
            let (row, column) = AdjacencyMatrix::index_to_pair(entry);
            let (first, second) = (owner[row], owner[column]);
            if first == second {
                continue;
            }
            let (Some(left), Some(right)) = (slots[first].take(), slots[second].take()) else {
                continue;
            };
            let min_distance = self.matrix.scores()[entry];
            debug!(
                "Merging {} and {} documents at {}",
                left.size(),
                right.size(),
                min_distance
            );

            slots[first] = Some(HierarchicalCluster::Binary {
                left: Box::new(left),
                right: Box::new(right),
                min_distance,
            });
            let moved = std::mem::take(&mut slot_members[second]);
            for &d in &moved {
                owner[d] = first;
            }
            slot_members[first].extend(moved);
        }

        let root = slots
            .into_iter()
            .flatten()
            .next()
            .ok_or(Error::EmptyCorpus)?;
        info!("Clustering finished, root merged at {}", root.min_distance());
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("doc{i}")).collect()
    }

    #[test]
    fn test_single_document_is_a_leaf() {
        let matrix = AdjacencyMatrix::from_parts(Vec::new(), names(1)).unwrap();
        let root = SingleLinkClustering::new(matrix, true).fit().unwrap();
        assert_eq!(
            root,
            HierarchicalCluster::Unary {
                name: "doc1".into(),
                index: 0
            }
        );
    }

    #[test]
    fn test_empty_matrix_is_rejected() {
        let matrix = AdjacencyMatrix::from_parts(Vec::new(), Vec::new()).unwrap();
        let result = SingleLinkClustering::new(matrix, true).fit();
        assert!(matches!(result, Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_similarity_scores_merge_highest_first() {
        // cosine-like: doc1/doc3 are the most alike
        let matrix = AdjacencyMatrix::from_parts(vec![0.2, 0.9, 0.5], names(3)).unwrap();
        let root = SingleLinkClustering::new(matrix, false).fit().unwrap();

        assert_eq!(root.min_distance(), 0.5);
        match &root {
            HierarchicalCluster::Binary { left, right, .. } => {
                assert_eq!(left.members(), vec!["doc3", "doc1"]);
                assert_eq!(right.members(), vec!["doc2"]);
            }
            other => panic!("expected a binary root, got {other:?}"),
        }
    }

    #[test]
    fn test_root_covers_every_document() {
        let scores = vec![0.3, 0.8, 0.1, 0.6, 0.2, 0.9];
        let matrix = AdjacencyMatrix::from_parts(scores, names(4)).unwrap();
        let root = SingleLinkClustering::new(matrix, true).fit().unwrap();

        let mut indices = root.indices();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(root.size(), 4);
    }
}
