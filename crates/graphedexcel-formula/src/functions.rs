//! Usage counts of the functions called by formulas.

use std::collections::HashMap;

use crate::FormulaAnalysis;

/// Per-function call counts, remembering the order names were first seen.
#[derive(Debug, Clone, Default)]
pub struct FunctionStats {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FunctionStats {
    /// Creates empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one call of `name`.
    pub fn record(&mut self, name: &str) {
        if let Some(&slot) = self.index.get(name) {
            self.counts[slot].1 += 1;
        } else {
            let _ = self.index.insert(name.to_string(), self.counts.len());
            self.counts.push((name.to_string(), 1));
        }
    }

    /// Counts every function call of an analysed formula.
    pub fn record_analysis(&mut self, analysis: &FormulaAnalysis) {
        for name in &analysis.functions {
            self.record(name);
        }
    }

    /// Number of calls recorded for `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.index.get(name).map_or(0, |&slot| self.counts[slot].1)
    }

    /// Number of distinct functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when no call was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of calls across all functions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Functions by descending count. Ties keep first-seen order.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<(&str, usize)> =
            self.counts.iter().map(|(name, n)| (name.as_str(), *n)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}
