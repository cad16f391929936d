use crate::core::{Distribution, TopN};
use crate::error::{Error, Result};
use crate::representation::tokenizer::tokenize;
use crate::vocabulary::StopwordList;
use log::debug;
use std::path::Path;

/// What a document's weights hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightMode {
    /// Raw occurrence counts.
    #[default]
    Count,
    /// Counts divided by the corpus size, or probabilities for bilingual input.
    Relative,
}

/// A single input file turned into a weighted distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    name: String,
    distribution: Distribution,
    corpus_size: usize,
    limit_list: usize,
    mode: WeightMode,
}

impl Document {
    /// Builds a document from an existing distribution; `limit_list` is its length.
    pub fn from_parts(
        name: impl Into<String>,
        distribution: Distribution,
        corpus_size: usize,
        mode: WeightMode,
    ) -> Self {
        let limit_list = distribution.len();
        Self {
            name: name.into(),
            distribution,
            corpus_size,
            limit_list,
            mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus_size
    }

    /// Number of entries kept after top-N truncation.
    pub fn limit_list(&self) -> usize {
        self.limit_list
    }

    pub fn mode(&self) -> WeightMode {
        self.mode
    }

    /// Relative frequency of `token`, whatever the stored mode.
    pub fn relative_weight(&self, token: &str) -> f64 {
        let weight = self.distribution.weight(token);
        match self.mode {
            WeightMode::Relative => weight,
            WeightMode::Count if self.corpus_size == 0 => 0.0,
            WeightMode::Count => weight / self.corpus_size as f64,
        }
    }
}

/// Builds monolingual documents from text files.
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    stopwords: Option<StopwordList>,
    top_n: TopN,
    mode: WeightMode,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every token found in `stopwords`.
    pub fn with_stopwords(mut self, stopwords: StopwordList) -> Self {
        self.stopwords = Some(stopwords);
        self
    }

    pub fn with_top_n(mut self, top_n: TopN) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_mode(mut self, mode: WeightMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> WeightMode {
        self.mode
    }

    /// Reads and parses `path`. The path string becomes the document name.
    pub fn load(&self, path: &Path) -> Result<Document> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let document = self.parse(path.to_string_lossy(), &text);
        debug!(
            "Parsed {} ({} tokens, {} kept)",
            document.name(),
            document.corpus_size(),
            document.limit_list()
        );
        Ok(document)
    }

    /// Counts the tokens of `text`, then sorts by descending weight and truncates.
    pub fn parse(&self, name: impl Into<String>, text: &str) -> Document {
        let mut counts = Distribution::new();
        let mut corpus_size = 0usize;

        for token in tokenize(text) {
            if self
                .stopwords
                .as_ref()
                .is_some_and(|list| list.contains(&token))
            {
                continue;
            }
            corpus_size += 1;
            counts.add(&token, 1.0);
        }

        let weighted = match self.mode {
            WeightMode::Count => counts,
            WeightMode::Relative => counts.to_relative(corpus_size),
        };
        let distribution = weighted.sorted_descending(self.top_n);

        Document::from_parts(name, distribution, corpus_size, self.mode)
    }
}
