//! Error types for docsim

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record in {path} at line {line}: {message}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("malformed matrix value {value:?} at line {line}")]
    MalformedMatrix { line: usize, value: String },

    #[error("matrix holds {found} scores but {documents} documents need {expected}")]
    MatrixSizeMismatch {
        documents: usize,
        expected: usize,
        found: usize,
    },

    #[error("corpus contains no documents")]
    EmptyCorpus,

    #[error("cannot create {requested} clusters from {documents} documents")]
    InvalidClusterCount { requested: usize, documents: usize },

    #[error("unsupported distance metric: {0}")]
    UnknownMetric(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Wraps an I/O failure together with the file it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
