use crate::core::Distribution;
use crate::representation::Corpus;

/// Corpus size a fresh centroid pretends to have until it gets members.
pub const INITIAL_DISTRIBUTION_SIZE: usize = 10_000;

/// Mean distribution of a cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Centroid {
    pub distribution: Distribution,
    /// Average corpus size of the current members.
    pub distribution_size: usize,
}

impl Centroid {
    pub fn new(distribution: Distribution) -> Self {
        Self {
            distribution,
            distribution_size: INITIAL_DISTRIBUTION_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cluster {
    pub centroid: Centroid,
    members: Vec<usize>,           // Indices into the corpus, in assignment order
    history: Vec<Vec<String>>,     // Member names after every assignment round
}

impl Cluster {
    pub fn new(centroid: Centroid) -> Self {
        Self {
            centroid,
            members: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn add_member(&mut self, document: usize) {
        self.members.push(document);
    }

    pub fn clear_members(&mut self) {
        self.members.clear();
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sets the centroid's size to the mean corpus size of the members.
    /// A cluster without members keeps its previous size.
    pub fn update_distribution_size(&mut self, corpus: &Corpus) {
        if self.members.is_empty() {
            return;
        }
        let total: usize = self
            .members
            .iter()
            .filter_map(|&m| corpus.get(m))
            .map(|d| d.corpus_size())
            .sum();
        self.centroid.distribution_size = total / self.members.len();
    }

    /// Appends a snapshot of the current member names.
    pub fn update_history(&mut self, corpus: &Corpus) {
        let snapshot = self
            .members
            .iter()
            .filter_map(|&m| corpus.get(m))
            .map(|d| d.name().to_owned())
            .collect();
        self.history.push(snapshot);
    }

    pub fn history(&self) -> &[Vec<String>] {
        &self.history
    }

    /// True when the last two snapshots differ in size or content.
    /// With fewer than two snapshots the cluster counts as changed.
    pub fn has_changed(&self) -> bool {
        match self.history.as_slice() {
            [.., previous, latest] => {
                previous.len() != latest.len() || latest.iter().any(|name| !previous.contains(name))
            }
            _ => true,
        }
    }
}
