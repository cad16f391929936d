//! Stopword shortlists.
//!
//! A shortlist holds the highly frequent, non-representative tokens of a
//! language. Tokens found in it are left out of a document's distribution and
//! do not count towards its corpus size.

use crate::error::{Error, Result};
use crate::representation::tokenizer;
use fxhash::FxHashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Languages that ship with a shortlist file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Dutch,
    German,
}

impl Language {
    /// File name of the shortlist inside a shortlist directory.
    pub fn shortlist_file(self) -> &'static str {
        match self {
            Language::English => "englishShortlist.txt",
            Language::Dutch => "dutchShortlist.txt",
            Language::German => "germanShortlist.txt",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "english" => Ok(Language::English),
            "dutch" => Ok(Language::Dutch),
            "german" => Ok(Language::German),
            other => Err(Error::InvalidConfig(format!(
                "no shortlist for language {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::English => "english",
            Language::Dutch => "dutch",
            Language::German => "german",
        };
        write!(f, "{name}")
    }
}

/// Read-only set of stopwords.
#[derive(Debug, Clone, Default)]
pub struct StopwordList {
    words: FxHashSet<String>,
}

impl StopwordList {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a shortlist file. Entries are split like document text but kept verbatim.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_words(tokenizer::split_raw(&text)))
    }

    /// Loads the shortlist of `language` from `dir`.
    pub fn for_language(language: Language, dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_file(dir.as_ref().join(language.shortlist_file()))
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
