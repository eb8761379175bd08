use crate::tokenizer::WordMultiset;
use std::collections::HashMap;

/// Word -> correlation coefficient with the covariate.
pub type CorrelationTable = HashMap<String, f64>;

/// Sentinel stored for words whose coefficient is undefined: the word (or
/// the covariate) has zero variance over the corpus. Callers filter it with
/// [`is_degenerate`] before ranking.
pub const DEGENERATE: f64 = f64::NAN;

pub fn is_degenerate(value: f64) -> bool {
    value.is_nan()
}

/// Aggregate 2x2 contingency counts for every word seen so far.
///
/// Only these four linear counts feed the coefficient, so counts built over
/// disjoint parts of a corpus can be [`merge`](Self::merge)d before
/// [`finish`](Self::finish).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContingencyCounts {
    /// Records observed.
    records: u64,
    /// Records where the covariate held.
    covariate_hits: u64,
    /// Records containing the word.
    occur: HashMap<String, u64>,
    /// Records containing the word where the covariate held.
    cooccur: HashMap<String, u64>,
}

impl ContingencyCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one profile. Each distinct word counts once, however often
    /// it repeats in the bio.
    pub fn observe(&mut self, words: &WordMultiset, covariate: bool) {
        self.records += 1;
        if covariate {
            self.covariate_hits += 1;
        }
        for word in words.keys() {
            *self.occur.entry(word.clone()).or_insert(0) += 1;
            if covariate {
                *self.cooccur.entry(word.clone()).or_insert(0) += 1;
            }
        }
    }

    pub fn merge(&mut self, other: ContingencyCounts) {
        self.records += other.records;
        self.covariate_hits += other.covariate_hits;
        for (word, count) in other.occur {
            *self.occur.entry(word).or_insert(0) += count;
        }
        for (word, count) in other.cooccur {
            *self.cooccur.entry(word).or_insert(0) += count;
        }
    }

    #[must_use]
    pub const fn records(&self) -> u64 {
        self.records
    }

    #[must_use]
    pub const fn covariate_hits(&self) -> u64 {
        self.covariate_hits
    }

    #[must_use]
    pub fn distinct_words(&self) -> usize {
        self.occur.len()
    }

    /// Coefficient for every word observed at least once.
    #[must_use]
    pub fn finish(&self) -> CorrelationTable {
        let table: CorrelationTable = self
            .occur
            .iter()
            .map(|(word, &occur)| {
                let cooccur = self.cooccur.get(word).copied().unwrap_or(0);
                (
                    word.clone(),
                    phi(self.records, self.covariate_hits, occur, cooccur),
                )
            })
            .collect();
        log::debug!(
            "Correlated {} words over {} records ({} covariate hits)",
            table.len(),
            self.records,
            self.covariate_hits
        );
        table
    }
}

/// Phi coefficient of two binary variables given the contingency counts:
/// `n` records, `k` with the covariate, `occur` with the word and `cooccur`
/// with both. Returns [`DEGENERATE`] when either variable is constant.
pub fn phi(n: u64, k: u64, occur: u64, cooccur: u64) -> f64 {
    if n == 0 {
        return DEGENERATE;
    }
    let (n, k, occur, cooccur) = (n as f64, k as f64, occur as f64, cooccur as f64);

    let word_mean = occur / n;
    let cov_mean = k / n;
    let word_norm =
        (occur * (1.0 - word_mean).powi(2) + (n - occur) * word_mean.powi(2)).sqrt();
    let cov_norm = (k * (1.0 - cov_mean).powi(2) + (n - k) * cov_mean.powi(2)).sqrt();
    if word_norm == 0.0 || cov_norm == 0.0 {
        return DEGENERATE;
    }

    let dot = cooccur * (1.0 - word_mean) * (1.0 - cov_mean)
        + (occur - cooccur) * (1.0 - word_mean) * -cov_mean
        + (k - cooccur) * -word_mean * (1.0 - cov_mean)
        + (n - occur - k + cooccur) * -word_mean * -cov_mean;

    (dot / (word_norm * cov_norm)).clamp(-1.0, 1.0)
}
