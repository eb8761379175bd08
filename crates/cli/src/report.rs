use crate::covariates::Covariate;
use dump_correlate::{bottom_correlations, top_correlations, CorrelationTable};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CovariateReport {
    pub covariate: String,
    pub heading: String,
    pub top: Vec<WordScore>,
    pub bottom: Vec<WordScore>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WordScore {
    pub word: String,
    pub coefficient: f64,
}

impl CovariateReport {
    pub fn new(
        covariate: &Covariate,
        table: &CorrelationTable,
        limit: usize,
        ignore: &[String],
    ) -> Self {
        let scores = |ranked: Vec<(String, f64)>| -> Vec<WordScore> {
            ranked
                .into_iter()
                .map(|(word, coefficient)| WordScore { word, coefficient })
                .collect()
        };
        Self {
            covariate: covariate.to_string(),
            heading: covariate.heading(),
            top: scores(top_correlations(table, limit, ignore)),
            bottom: scores(bottom_correlations(table, limit, ignore)),
        }
    }

    /// Heading, one `word coefficient` line per top word, then a blank line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.heading);
        out.push('\n');
        for score in &self.top {
            out.push_str(&format!("{} {}\n", score.word, score.coefficient));
        }
        out.push('\n');
        out
    }
}

/// `count location` lines, most common first; ties by name.
pub fn render_location_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(location, count)| format!("{count} {location}\n"))
        .collect()
}
