//! Turning input files into word (or word-pair) distributions.

pub mod bilingual;
pub mod corpus;
pub mod document;
pub mod tokenizer;

pub use bilingual::{load_bilingual, parse_bilingual};
pub use corpus::{AccumulatorMode, CentroidAccumulator, Corpus};
pub use document::{Document, DocumentLoader, WeightMode};
