use crate::core::Distribution;
use crate::error::{Error, Result};
use crate::representation::bilingual::load_bilingual;
use crate::representation::document::{Document, DocumentLoader};
use log::info;
use std::path::PathBuf;

/// How documents contribute to the running centroid while a corpus loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorMode {
    /// Every token is registered with weight 0; the result is a key template.
    Forgy,
    /// Relative frequencies are summed per token.
    Soft,
}

/// Running centroid built up document by document.
#[derive(Debug, Clone)]
pub struct CentroidAccumulator {
    mode: AccumulatorMode,
    distribution: Distribution,
    documents: usize,
}

impl CentroidAccumulator {
    pub fn new(mode: AccumulatorMode) -> Self {
        Self {
            mode,
            distribution: Distribution::new(),
            documents: 0,
        }
    }

    pub fn absorb(&mut self, document: &Document) {
        match self.mode {
            AccumulatorMode::Forgy => {
                for token in document.distribution().keys() {
                    self.distribution.insert(token, 0.0);
                }
            }
            AccumulatorMode::Soft => {
                for token in document.distribution().keys() {
                    self.distribution
                        .add(token, document.relative_weight(token));
                }
            }
        }
        self.documents += 1;
    }

    pub fn mode(&self) -> AccumulatorMode {
        self.mode
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn into_distribution(self) -> Distribution {
        self.distribution
    }

    /// Accumulated weights divided by the number of absorbed documents.
    pub fn mean(&self) -> Distribution {
        if self.documents == 0 {
            return self.distribution.clone();
        }
        self.distribution.scaled(1.0 / self.documents as f64)
    }
}

/// The fixed, ordered set of documents a run works on.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Loads every path; the first unreadable file fails the whole corpus.
    pub fn load(paths: &[PathBuf], loader: &DocumentLoader) -> Result<Self> {
        Self::load_inner(paths, loader, None)
    }

    /// Loads every path and feeds each document into `accumulator`.
    pub fn load_with_accumulator(
        paths: &[PathBuf],
        loader: &DocumentLoader,
        accumulator: &mut CentroidAccumulator,
    ) -> Result<Self> {
        Self::load_inner(paths, loader, Some(accumulator))
    }

    fn load_inner(
        paths: &[PathBuf],
        loader: &DocumentLoader,
        mut accumulator: Option<&mut CentroidAccumulator>,
    ) -> Result<Self> {
        if paths.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let document = loader.load(path)?;
            if let Some(acc) = accumulator.as_deref_mut() {
                acc.absorb(&document);
            }
            documents.push(document);
        }
        info!("Loaded {} documents", documents.len());
        Ok(Self { documents })
    }

    /// Loads bilingual lexicons and returns the vocabulary shared by all of them.
    pub fn load_bilingual(paths: &[PathBuf]) -> Result<(Self, Distribution)> {
        if paths.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let mut vocabulary = Distribution::new();
        let documents = paths
            .iter()
            .map(|path| load_bilingual(path, &mut vocabulary))
            .collect::<Result<Vec<_>>>()?;
        info!(
            "Loaded {} bilingual documents covering {} word pairs",
            documents.len(),
            vocabulary.len()
        );
        Ok((Self { documents }, vocabulary))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.name().to_owned()).collect()
    }
}
