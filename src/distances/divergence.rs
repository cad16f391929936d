//! Asymmetric scores: Chi-square and Kullback-Leibler, plus the symmetric
//! Jensen-Shannon divergence built on top of KL.
//!
//! The directional scores can be folded into one value with a [`Combination`]
//! of the `a → b` and `b → a` directions.

use super::distance::{normalise, DistanceMetric, Orientation};
use crate::core::Distribution;
use crate::error::Error;
use crate::representation::Document;
use std::fmt;
use std::str::FromStr;

/// Chi-square looks at this many of the heaviest keys unless configured otherwise.
pub const DEFAULT_CHI_SQUARE_TOP_N: usize = 500;

/// How the two directions of an asymmetric score are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combination {
    Average,
    Minimum,
}

impl Combination {
    pub fn combine(self, forward: f64, backward: f64) -> f64 {
        match self {
            Combination::Average => 0.5 * forward + 0.5 * backward,
            Combination::Minimum => forward.min(backward),
        }
    }
}

impl FromStr for Combination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "average" => Ok(Combination::Average),
            "minimum" | "min" => Ok(Combination::Minimum),
            other => Err(Error::InvalidConfig(format!(
                "unknown combination method {other:?}, expected \"average\" or \"minimum\""
            ))),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combination::Average => write!(f, "average"),
            Combination::Minimum => write!(f, "minimum"),
        }
    }
}

/// Chi-square over the `window` heaviest keys of `a`.
///
/// A key missing from `b` contributes its weight in `a`; a shared key
/// contributes `(a - b)² / a`, or `b` when `a` is 0.
pub fn chi_square(
    a: &Distribution,
    size_a: usize,
    b: &Distribution,
    size_b: usize,
    relative_freq: bool,
    window: usize,
) -> f64 {
    a.top(window)
        .into_iter()
        .map(|(token, weight)| {
            let x = normalise(weight, size_a, relative_freq);
            match b.get(token) {
                None => x,
                Some(other) => {
                    let y = normalise(other, size_b, relative_freq);
                    if x == 0.0 {
                        y
                    } else {
                        (x - y).powi(2) / x
                    }
                }
            }
        })
        .sum()
}

/// Directional KL divergence `D(q ‖ r)` with add-one style smoothing of `r`.
///
/// Only keys of `q` are visited. In count mode a zero `q` weight adds
/// nothing; in relative mode it is lifted to `1 / (size_q + 1)`. A missing
/// or zero `r` weight becomes `1 / (size_r + 1)` in both modes.
pub fn kl_divergence(
    q: &Distribution,
    size_q: usize,
    r: &Distribution,
    size_r: usize,
    relative_freq: bool,
) -> f64 {
    let smoothed_r = 1.0 / (size_r as f64 + 1.0);
    let smoothed_q = 1.0 / (size_q as f64 + 1.0);
    let mut total = 0.0;

    for (token, weight) in q.iter() {
        let mut qi = normalise(weight, size_q, relative_freq);
        if qi == 0.0 {
            if !relative_freq {
                continue;
            }
            qi = smoothed_q;
        }
        let ri = match r.get(token) {
            Some(w) if w != 0.0 => {
                let ri = normalise(w, size_r, relative_freq);
                if ri == 0.0 {
                    smoothed_r
                } else {
                    ri
                }
            }
            _ => smoothed_r,
        };
        total += qi * (qi / ri).ln();
    }
    total
}

/// Chi-square distance. The window is the configured `top_n`, narrowed to
/// the shorter of the two documents' kept lists when scoring document pairs.
#[derive(Debug, Clone, Copy)]
pub struct ChiSquare {
    relative_freq: bool,
    top_n: usize,
    combination: Option<Combination>,
}

impl ChiSquare {
    pub fn new(relative_freq: bool) -> Self {
        Self {
            relative_freq,
            top_n: DEFAULT_CHI_SQUARE_TOP_N,
            combination: None,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_combination(mut self, combination: Option<Combination>) -> Self {
        self.combination = combination;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    fn windowed(
        &self,
        a: &Distribution,
        size_a: usize,
        b: &Distribution,
        size_b: usize,
        window: usize,
    ) -> f64 {
        let forward = chi_square(a, size_a, b, size_b, self.relative_freq, window);
        match self.combination {
            None => forward,
            Some(combination) => {
                let backward = chi_square(b, size_b, a, size_a, self.relative_freq, window);
                combination.combine(forward, backward)
            }
        }
    }
}

impl DistanceMetric for ChiSquare {
    fn name(&self) -> &'static str {
        "ChiSquare"
    }

    fn orientation(&self) -> Orientation {
        Orientation::LowerIsCloser
    }

    fn relative_freq(&self) -> bool {
        self.relative_freq
    }

    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64 {
        self.windowed(a, size_a, b, size_b, self.top_n)
    }

    fn compute_documents(&self, a: &Document, b: &Document) -> f64 {
        let window = a.limit_list().min(b.limit_list()).min(self.top_n);
        self.windowed(
            a.distribution(),
            a.corpus_size(),
            b.distribution(),
            b.corpus_size(),
            window,
        )
    }
}

/// [Kullback-Leibler divergence](https://en.wikipedia.org/wiki/Kullback%E2%80%93Leibler_divergence)
#[derive(Debug, Clone, Copy)]
pub struct KlDivergence {
    relative_freq: bool,
    combination: Option<Combination>,
}

impl KlDivergence {
    pub fn new(relative_freq: bool, combination: Option<Combination>) -> Self {
        Self {
            relative_freq,
            combination,
        }
    }

    pub fn combination(&self) -> Option<Combination> {
        self.combination
    }
}

impl DistanceMetric for KlDivergence {
    fn name(&self) -> &'static str {
        "KL"
    }

    fn orientation(&self) -> Orientation {
        Orientation::LowerIsCloser
    }

    fn relative_freq(&self) -> bool {
        self.relative_freq
    }

    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64 {
        let forward = kl_divergence(a, size_a, b, size_b, self.relative_freq);
        match self.combination {
            None => forward,
            Some(combination) => {
                let backward = kl_divergence(b, size_b, a, size_a, self.relative_freq);
                combination.combine(forward, backward)
            }
        }
    }

    /// Smoothing can push the raw divergence below zero, so clusters are
    /// ranked by magnitude.
    fn ranking_score(&self, score: f64) -> f64 {
        score.abs()
    }
}

/// [Jensen-Shannon divergence](https://en.wikipedia.org/wiki/Jensen%E2%80%93Shannon_divergence)
#[derive(Debug, Clone, Copy)]
pub struct JsDivergence {
    relative_freq: bool,
}

impl JsDivergence {
    pub fn new(relative_freq: bool) -> Self {
        Self { relative_freq }
    }
}

impl DistanceMetric for JsDivergence {
    fn name(&self) -> &'static str {
        "JS"
    }

    fn orientation(&self) -> Orientation {
        Orientation::LowerIsCloser
    }

    fn relative_freq(&self) -> bool {
        self.relative_freq
    }

    fn compute(&self, a: &Distribution, size_a: usize, b: &Distribution, size_b: usize) -> f64 {
        let mixture: Distribution = a
            .union(b)
            .map(|(token, wa, wb)| (token, 0.5 * wa + 0.5 * wb))
            .collect();
        let size_mixture = (size_a + size_b) / 2;

        let from_a = kl_divergence(a, size_a, &mixture, size_mixture, self.relative_freq);
        let from_b = kl_divergence(b, size_b, &mixture, size_mixture, self.relative_freq);
        0.5 * (from_a + from_b)
    }
}
