//! Order-independent deck identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical key for an unordered set of card names.
///
/// Names are sorted and deduplicated on construction, so two decks holding the
/// same cards compare equal regardless of the order they were listed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckKey(Vec<String>);

impl DeckKey {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cards: Vec<String> = names.into_iter().map(Into::into).collect();
        cards.sort();
        cards.dedup();
        Self(cards)
    }

    pub fn cards(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.binary_search_by(|c| c.as_str().cmp(name)).is_ok()
    }

    /// Whether every name in `combo` is part of this deck.
    pub fn contains_all<S: AsRef<str>>(&self, combo: &[S]) -> bool {
        combo.iter().all(|name| self.contains(name.as_ref()))
    }

    /// All `size`-card subsets of this deck, each already canonical.
    pub fn combinations(&self, size: usize) -> Combinations<'_> {
        Combinations::new(&self.0, size)
    }
}

impl fmt::Display for DeckKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" | "))
    }
}

/// Lexicographic k-subset iterator over a sorted slice.
pub struct Combinations<'a> {
    pool: &'a [String],
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Combinations<'a> {
    fn new(pool: &'a [String], size: usize) -> Self {
        Self {
            pool,
            indices: (0..size).collect(),
            done: size == 0 || size > pool.len(),
        }
    }
}

impl Iterator for Combinations<'_> {
    type Item = DeckKey;

    fn next(&mut self) -> Option<DeckKey> {
        if self.done {
            return None;
        }

        // Subsets of a sorted pool taken in index order stay sorted.
        let item = DeckKey(self.indices.iter().map(|&i| self.pool[i].clone()).collect());

        let k = self.indices.len();
        let n = self.pool.len();
        match (0..k).rev().find(|&i| self.indices[i] != i + n - k) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(item)
    }
}
