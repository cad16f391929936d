//! Strict lower-triangular store of pairwise document scores.
//!
//! Entry `i` of the flat score vector belongs to exactly one pair
//! `(row, column)` with `column < row`. Rows are laid out one after the other,
//! row `r` holding `r` entries, so document 0 has no row of its own:
//!
//! ```text
//! index:  0 | 1 2 | 3 4 5 | ...
//! row:    1 | 2 2 | 3 3 3 | ...
//! column: 0 | 0 1 | 0 1 2 | ...
//! ```

use crate::error::{Error, Result};
use crate::io::read_lines;
use ndarray::{Array2, ArrayView2};
use std::cmp::Ordering;
use std::path::Path;

/// Number of entries in the strict lower triangle of an `n × n` matrix.
pub fn triangle_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Keeps the values strictly below the diagonal of a square matrix, row by row.
pub fn lower_triangle(square: ArrayView2<f64>) -> Vec<f64> {
    let mut scores = Vec::with_capacity(triangle_len(square.nrows()));
    for (row, values) in square.rows().into_iter().enumerate().skip(1) {
        scores.extend(values.iter().take(row).copied());
    }
    scores
}

/// Parses comma-separated scores. Empty fields and blank lines are skipped.
pub fn parse_scores(text: &str) -> Result<Vec<f64>> {
    let mut scores = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        for field in line.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let value = field.parse::<f64>().map_err(|_| Error::MalformedMatrix {
                line: line_no + 1,
                value: field.to_owned(),
            })?;
            scores.push(value);
        }
    }
    Ok(scores)
}

/// Parses a lower-triangle score file: the `r`-th non-blank row must hold
/// exactly `r` values.
pub fn parse_lower_triangle(text: &str) -> Result<Vec<f64>> {
    let mut scores = Vec::new();
    let mut row = 0;
    for (line_no, line) in text.lines().enumerate() {
        let values = parse_scores(line).map_err(|e| match e {
            Error::MalformedMatrix { value, .. } => Error::MalformedMatrix {
                line: line_no + 1,
                value,
            },
            other => other,
        })?;
        if values.is_empty() {
            continue;
        }
        row += 1;
        if values.len() != row {
            return Err(Error::MalformedMatrix {
                line: line_no + 1,
                value: format!("row {} holds {} values, expected {}", row, values.len(), row),
            });
        }
        scores.extend(values);
    }
    Ok(scores)
}

/// Parses a full square matrix written as comma-separated rows.
pub fn parse_square_matrix(text: &str) -> Result<Array2<f64>> {
    let mut values = Vec::new();
    let mut rows = 0;
    let mut width = None;

    for (line_no, line) in text.lines().enumerate() {
        let row = parse_scores(line).map_err(|e| match e {
            Error::MalformedMatrix { value, .. } => Error::MalformedMatrix {
                line: line_no + 1,
                value,
            },
            other => other,
        })?;
        if row.is_empty() {
            continue;
        }
        match width {
            None => width = Some(row.len()),
            Some(w) if w != row.len() => {
                return Err(Error::MalformedMatrix {
                    line: line_no + 1,
                    value: format!("row of {} values, expected {}", row.len(), w),
                })
            }
            Some(_) => {}
        }
        values.extend(row);
        rows += 1;
    }

    let width = width.unwrap_or(0);
    if width != rows {
        return Err(Error::MatrixSizeMismatch {
            documents: rows,
            expected: rows * rows,
            found: rows * width,
        });
    }
    Array2::from_shape_vec((rows, width), values).map_err(|e| Error::MalformedMatrix {
        line: rows,
        value: e.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    scores: Vec<f64>,
    documents: Vec<String>,
}

impl AdjacencyMatrix {
    /// Pairs a flat score vector with its document names.
    pub fn from_parts(scores: Vec<f64>, documents: Vec<String>) -> Result<Self> {
        let expected = triangle_len(documents.len());
        if scores.len() != expected {
            return Err(Error::MatrixSizeMismatch {
                documents: documents.len(),
                expected,
                found: scores.len(),
            });
        }
        Ok(Self { scores, documents })
    }

    /// Reads a lower-triangle score file and a file of document names.
    pub fn from_files(matrix_path: &Path, names_path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(matrix_path).map_err(|e| Error::io(matrix_path, e))?;
        let scores = parse_lower_triangle(&text)?;
        let documents = read_lines(names_path)?
            .into_iter()
            .map(|line| line.trim().to_owned())
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_parts(scores, documents)
    }

    /// Builds the matrix from a full square score matrix.
    pub fn from_square(square: ArrayView2<f64>, documents: Vec<String>) -> Result<Self> {
        if square.nrows() != square.ncols() {
            return Err(Error::MatrixSizeMismatch {
                documents: documents.len(),
                expected: square.nrows() * square.nrows(),
                found: square.len(),
            });
        }
        Self::from_parts(lower_triangle(square), documents)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn score(&self, index: usize) -> Option<f64> {
        self.scores.get(index).copied()
    }

    /// The `(row, column)` pair of flat entry `index`, with `column < row`.
    pub fn index_to_pair(index: usize) -> (usize, usize) {
        // row r starts at r(r-1)/2; solve for the largest such r <= index
        let estimate = ((1.0 + (1.0 + 8.0 * index as f64).sqrt()) / 2.0) as usize;
        let mut row = estimate.max(1);
        while triangle_len(row) > index {
            row -= 1;
        }
        while triangle_len(row + 1) <= index {
            row += 1;
        }
        (row, index - triangle_len(row))
    }

    /// Flat index of the pair `(a, b)`; order does not matter. `a != b`.
    pub fn pair_to_index(a: usize, b: usize) -> usize {
        debug_assert_ne!(a, b, "the diagonal is not stored");
        let (row, column) = if a > b { (a, b) } else { (b, a) };
        triangle_len(row) + column
    }

    /// Names of the two documents compared by entry `index`.
    pub fn document_names(&self, index: usize) -> Option<(&str, &str)> {
        let (row, column) = Self::index_to_pair(index);
        let first = self.documents.get(row)?;
        let second = self.documents.get(column)?;
        Some((first.as_str(), second.as_str()))
    }

    /// Entry indices from most to least similar.
    ///
    /// Ascending scores when `low_score_is_similar`, descending otherwise.
    /// Equal scores keep index order and NaN scores come last.
    pub fn ranking(&self, low_score_is_similar: bool) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.scores.len()).collect();
        order.sort_by(|&i, &j| {
            let (a, b) = (self.scores[i], self.scores[j]);
            match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) if low_score_is_similar => a.total_cmp(&b),
                (false, false) => b.total_cmp(&a),
            }
        });
        order
    }
}
