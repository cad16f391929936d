use fxhash::FxHashMap;
use std::cmp::Ordering;

/// How many entries of a sorted frequency list are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopN {
    /// Keep every entry.
    #[default]
    All,
    /// Keep at most this many entries.
    Limit(usize),
}

impl TopN {
    /// Number of entries kept out of `available`.
    pub fn window(self, available: usize) -> usize {
        match self {
            TopN::All => available,
            TopN::Limit(n) => n.min(available),
        }
    }
}

impl From<Option<usize>> for TopN {
    fn from(value: Option<usize>) -> Self {
        value.map_or(TopN::All, TopN::Limit)
    }
}

/// Token to weight mapping that remembers insertion order.
///
/// Weights are raw counts or relative frequencies and are never negative.
/// Looking up a token that is not present yields a weight of 0.
#[derive(Debug, Clone, Default)]
pub struct Distribution {
    entries: Vec<(String, f64)>,
    index: FxHashMap<String, usize>,
}

impl PartialEq for Distribution {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.index.get(token).map(|&pos| self.entries[pos].1)
    }

    /// Weight of `token`, 0 when absent.
    #[inline]
    pub fn weight(&self, token: &str) -> f64 {
        self.get(token).unwrap_or(0.0)
    }

    /// Sets the weight of `token`. An existing token keeps its position.
    pub fn insert(&mut self, token: &str, weight: f64) {
        debug_assert!(weight >= 0.0, "negative weight {weight} for {token:?}");
        match self.index.get(token) {
            Some(&pos) => self.entries[pos].1 = weight,
            None => {
                self.index.insert(token.to_owned(), self.entries.len());
                self.entries.push((token.to_owned(), weight));
            }
        }
    }

    /// Adds `delta` to the weight of `token`, inserting it when absent.
    pub fn add(&mut self, token: &str, delta: f64) {
        match self.index.get(token) {
            Some(&pos) => self.entries[pos].1 += delta,
            None => self.insert(token, delta),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Every weight multiplied by `factor`, order preserved.
    pub fn scaled(&self, factor: f64) -> Distribution {
        self.iter().map(|(k, w)| (k.to_owned(), w * factor)).collect()
    }

    /// Counts turned into relative frequencies over `corpus_size`.
    pub fn to_relative(&self, corpus_size: usize) -> Distribution {
        if corpus_size == 0 {
            return self.zeroed();
        }
        self.scaled(1.0 / corpus_size as f64)
    }

    /// Same keys, every weight set to 0.
    pub fn zeroed(&self) -> Distribution {
        self.iter().map(|(k, _)| (k.to_owned(), 0.0)).collect()
    }

    /// Entries sorted by descending weight, first `n` only.
    ///
    /// The sort is stable, so equal weights keep their insertion order.
    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        let mut sorted: Vec<(&str, f64)> = self.iter().collect();
        sorted.sort_by(|a, b| descending(a.1, b.1));
        sorted.truncate(n);
        sorted
    }

    /// A new distribution holding the top entries in descending order.
    pub fn sorted_descending(&self, top_n: TopN) -> Distribution {
        let keep = top_n.window(self.len());
        self.top(keep)
            .into_iter()
            .map(|(k, w)| (k.to_owned(), w))
            .collect()
    }

    /// Iterates the union of both key sets as `(token, self weight, other weight)`.
    ///
    /// Tokens of `self` come first in `self`'s order, followed by the tokens
    /// only `other` holds. A side lacking the token reports 0.
    pub fn union<'a>(
        &'a self,
        other: &'a Distribution,
    ) -> impl Iterator<Item = (&'a str, f64, f64)> + 'a {
        self.iter()
            .map(move |(k, w)| (k, w, other.weight(k)))
            .chain(
                other
                    .iter()
                    .filter(move |(k, _)| !self.contains(k))
                    .map(|(k, w)| (k, 0.0, w)),
            )
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

impl FromIterator<(String, f64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut distribution = Distribution::new();
        distribution.extend(iter);
        distribution
    }
}

impl<'a> FromIterator<(&'a str, f64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut distribution = Distribution::new();
        for (k, w) in iter {
            distribution.insert(k, w);
        }
        distribution
    }
}

impl Extend<(String, f64)> for Distribution {
    fn extend<I: IntoIterator<Item = (String, f64)>>(&mut self, iter: I) {
        for (k, w) in iter {
            match self.index.get(&k) {
                Some(&pos) => self.entries[pos].1 = w,
                None => {
                    self.index.insert(k.clone(), self.entries.len());
                    self.entries.push((k, w));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut d = Distribution::new();
        d.insert("a", 1.0);
        d.insert("b", 2.0);
        d.insert("a", 5.0);

        let keys: Vec<&str> = d.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(d.weight("a"), 5.0);
        assert_eq!(d.weight("missing"), 0.0);
    }

    #[test]
    fn test_sorted_descending_truncates() {
        let d: Distribution = [("x", 1.0), ("y", 3.0), ("z", 2.0), ("w", 3.0)]
            .into_iter()
            .collect();
        let sorted = d.sorted_descending(TopN::Limit(3));

        let keys: Vec<&str> = sorted.keys().collect();
        assert_eq!(keys, vec!["y", "w", "z"]);
        assert_eq!(d.sorted_descending(TopN::All).len(), 4);
    }

    #[test]
    fn test_union_visits_every_key_once() {
        let a: Distribution = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        let b: Distribution = [("b", 4.0), ("c", 8.0)].into_iter().collect();

        let union: Vec<(&str, f64, f64)> = a.union(&b).collect();
        assert_eq!(
            union,
            vec![("a", 1.0, 0.0), ("b", 2.0, 4.0), ("c", 0.0, 8.0)]
        );
    }

    #[test]
    fn test_to_relative_with_empty_corpus() {
        let d: Distribution = [("a", 2.0)].into_iter().collect();
        assert_eq!(d.to_relative(0).weight("a"), 0.0);
        assert_eq!(d.to_relative(4).weight("a"), 0.5);
    }
}
