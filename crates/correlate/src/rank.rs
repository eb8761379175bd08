use crate::counts::{is_degenerate, CorrelationTable};
use std::cmp::Ordering;

/// Words reported per covariate by the command-line tools.
pub const DEFAULT_REPORT_LIMIT: usize = 20;

/// Most positively correlated words, strongest first.
///
/// Degenerate entries and words listed in `ignore` are skipped; equal
/// coefficients are ordered by word so the output is stable.
pub fn top_correlations(
    table: &CorrelationTable,
    limit: usize,
    ignore: &[String],
) -> Vec<(String, f64)> {
    ranked(table, limit, ignore, |a, b| b.total_cmp(&a))
}

/// Most negatively correlated words, strongest first.
pub fn bottom_correlations(
    table: &CorrelationTable,
    limit: usize,
    ignore: &[String],
) -> Vec<(String, f64)> {
    ranked(table, limit, ignore, |a, b| a.total_cmp(&b))
}

fn ranked(
    table: &CorrelationTable,
    limit: usize,
    ignore: &[String],
    order: impl Fn(f64, f64) -> Ordering,
) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = table
        .iter()
        .filter(|(word, value)| !is_degenerate(**value) && !ignore.contains(*word))
        .map(|(word, value)| (word.clone(), *value))
        .collect();
    entries.sort_by(|a, b| order(a.1, b.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::DEGENERATE;
    use pretty_assertions::assert_eq;

    fn table() -> CorrelationTable {
        [
            ("gym", 0.4),
            ("wine", -0.3),
            ("travel", 0.4),
            ("dogs", 0.9),
            ("the", DEGENERATE),
            ("cats", -0.8),
        ]
        .into_iter()
        .map(|(w, v)| (w.to_string(), v))
        .collect()
    }

    fn words(ranked: &[(String, f64)]) -> Vec<&str> {
        ranked.iter().map(|(w, _)| w.as_str()).collect()
    }

    #[test]
    fn test_top_skips_degenerate_and_orders_ties() {
        let ranked = top_correlations(&table(), 3, &[]);
        assert_eq!(words(&ranked), vec!["dogs", "gym", "travel"]);
    }

    #[test]
    fn test_top_respects_ignore_list() {
        let ranked = top_correlations(&table(), 2, &["dogs".to_string()]);
        assert_eq!(words(&ranked), vec!["gym", "travel"]);
    }

    #[test]
    fn test_bottom_orders_most_negative_first() {
        let ranked = bottom_correlations(&table(), 2, &[]);
        assert_eq!(words(&ranked), vec!["cats", "wine"]);
    }

    #[test]
    fn test_limit_larger_than_table() {
        let ranked = top_correlations(&table(), 100, &[]);
        assert_eq!(ranked.len(), 5);
    }
}
