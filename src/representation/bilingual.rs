//! Bilingual lexicon representation.
//!
//! A lexicon file lists `source target probability` triples. Each word pair
//! becomes the token `source-target` and keeps its probability verbatim.

use crate::core::Distribution;
use crate::error::{Error, Result};
use crate::representation::document::{Document, WeightMode};
use std::path::Path;

/// Reads a lexicon file; every pair is also registered in `vocabulary` with weight 0.
pub fn load_bilingual(path: &Path, vocabulary: &mut Distribution) -> Result<Document> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_bilingual(path, &text, vocabulary)
}

/// Parses lexicon `text` greedily, three whitespace-separated fields at a time.
pub fn parse_bilingual(
    path: &Path,
    text: &str,
    vocabulary: &mut Distribution,
) -> Result<Document> {
    let mut fields = text
        .lines()
        .enumerate()
        .flat_map(|(line, content)| content.split_whitespace().map(move |f| (line + 1, f)));

    let mut distribution = Distribution::new();
    let mut records = 0usize;

    while let Some((_, source)) = fields.next() {
        let malformed = |line: usize, message: String| Error::MalformedRecord {
            path: path.to_path_buf(),
            line,
            message,
        };
        let (_, target) = fields
            .next()
            .ok_or_else(|| malformed(text.lines().count(), format!("missing target for {source:?}")))?;
        let (line, raw_probability) = fields.next().ok_or_else(|| {
            malformed(
                text.lines().count(),
                format!("missing probability for {source:?} {target:?}"),
            )
        })?;
        let probability: f64 = raw_probability
            .parse()
            .map_err(|_| malformed(line, format!("invalid probability {raw_probability:?}")))?;
        if probability.is_nan() {
            return Err(malformed(line, format!("invalid probability {raw_probability:?}")));
        }
        if probability < 0.0 {
            return Err(malformed(line, format!("negative probability {probability}")));
        }

        let pair = format!("{source}-{target}");
        distribution.insert(&pair, probability);
        vocabulary.insert(&pair, 0.0);
        records += 1;
    }

    Ok(Document::from_parts(
        path.to_string_lossy(),
        distribution,
        records,
        WeightMode::Relative,
    ))
}
