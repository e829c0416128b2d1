use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

/// Anything the codec can count, code and decode.
///
/// `Ord` is only used to make tree construction deterministic when counts tie.
pub trait Symbol: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Symbol for T {}

/// Occurrence count per distinct symbol. Symbols never seen are absent, never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: HashMap<S, u64>,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn new() -> Self {
        FrequencyTable {
            counts: HashMap::new(),
        }
    }

    pub fn from_symbols<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut table = Self::new();
        for symbol in symbols {
            table.add(symbol);
        }
        debug!(
            "Counted {} symbols ({} distinct)",
            table.total(),
            table.len()
        );
        table
    }

    pub fn add(&mut self, symbol: S) {
        *self.counts.entry(symbol).or_insert(0) += 1;
    }

    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.counts.get(symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, u64)> {
        self.counts.iter().map(|(s, &c)| (s, c))
    }

    /// Entries ordered by ascending count, ties broken by ascending symbol.
    pub fn sorted_entries(&self) -> Vec<(&S, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Adds another table's counts into this one. Counting shards separately
    /// and merging gives the same table as counting the whole input.
    pub fn merge(&mut self, other: &FrequencyTable<S>) {
        for (symbol, count) in other.iter() {
            *self.counts.entry(symbol.clone()).or_insert(0) += count;
        }
    }

    /// Shannon entropy in bits per symbol.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total_f = total as f64;

        let entropy: f64 = self
            .counts
            .values()
            .map(|&count| {
                let p = count as f64 / total_f;
                -p * p.log2()
            })
            .sum();

        debug!(
            "Calculated entropy: {:.4} bits/symbol (Total samples: {})",
            entropy, total
        );
        entropy
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> FromIterator<S> for FrequencyTable<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_symbols(iter)
    }
}
