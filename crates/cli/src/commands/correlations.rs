use crate::covariates::Covariate;
use crate::report::CovariateReport;
use anyhow::{Context, Result};
use dump_correlate::correlate;
use dump_protocol::User;
use dump_store::Database;
use std::io::{self, Write};

pub struct CorrelationsRequest {
    pub covariates: Vec<Covariate>,
    pub limit: usize,
    pub ignore: Vec<String>,
    pub json: bool,
}

/// One full pass over the stored users per covariate.
pub fn run(db: &dyn Database, request: CorrelationsRequest) -> Result<()> {
    let covariates = if request.covariates.is_empty() {
        Covariate::presets()
    } else {
        request.covariates
    };

    let mut stdout = io::stdout().lock();
    let mut reports = Vec::with_capacity(covariates.len());
    for covariate in &covariates {
        let report = report_for(db, covariate, request.limit, &request.ignore)?;
        if request.json {
            reports.push(report);
        } else {
            write!(stdout, "{}", report.render_text())?;
            stdout.flush()?;
        }
    }
    if request.json {
        serde_json::to_writer_pretty(&mut stdout, &reports)?;
        writeln!(stdout)?;
    }
    Ok(())
}

fn report_for(
    db: &dyn Database,
    covariate: &Covariate,
    limit: usize,
    ignore: &[String],
) -> Result<CovariateReport> {
    let predicate = covariate.predicate(db)?;
    let table = correlate(db.all_users(), |user: &User| predicate(user))
        .with_context(|| format!("Failed to correlate {covariate}"))?;
    log::debug!("{covariate}: {} distinct words", table.len());
    Ok(CovariateReport::new(covariate, &table, limit, ignore))
}
