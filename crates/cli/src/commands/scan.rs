use crate::config::ScanConfig;
use anyhow::{ensure, Context, Result};
use dump_client::{ClientConfig, DumpClient};
use dump_template::{ApiCalls, ApiTemplates};
use rand::Rng;
use std::io::{self, Write};
use std::path::Path;

/// Walk random locations forever, printing every encounter as a JSON line
/// and disliking it so the next page brings new profiles.
pub async fn run(
    api_path: &Path,
    per_location: Option<usize>,
    client_config: &ClientConfig,
    scan: &ScanConfig,
) -> Result<()> {
    let per_location = per_location.unwrap_or(scan.per_location);
    ensure!(per_location > 0, "scan.per_location must be at least 1");

    let text = std::fs::read_to_string(api_path)
        .with_context(|| format!("Failed to read api file {}", api_path.display()))?;
    let calls = ApiCalls::from_json(&text)
        .with_context(|| format!("Invalid api file {}", api_path.display()))?;
    let client = DumpClient::new(ApiTemplates::load(calls)?, client_config)?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupted, stopping scan");
            Ok(())
        }
        result = scan_forever(&client, per_location, scan) => result,
    }
}

async fn scan_forever(client: &DumpClient, per_location: usize, scan: &ScanConfig) -> Result<()> {
    let mut total = 0usize;
    loop {
        let (lat, lon) = random_location(&mut rand::thread_rng());
        log::info!("Searching at location {lat:.6},{lon:.6}");
        match scan_location(client, lat, lon, per_location).await {
            Ok(found) => {
                total += found;
                log::info!("Got {found} results here, {total} in total");
            }
            Err(err) => {
                log::warn!("Scan failed: {err:#}");
                tokio::time::sleep(scan.backoff()).await;
            }
        }
    }
}

/// Collect up to `limit` encounters at one location. Stops early when the
/// service runs out of profiles there.
async fn scan_location(client: &DumpClient, lat: f64, lon: f64, limit: usize) -> Result<usize> {
    client
        .update_location(lat, lon)
        .await
        .context("Failed to update location")?;

    let mut found = 0;
    while found < limit {
        let users = client
            .get_encounters()
            .await
            .context("Failed to fetch encounters")?;
        if users.is_empty() {
            log::info!("No more results after {found}");
            break;
        }
        for user in users {
            emit(&user)?;
            client
                .dislike(&user.id)
                .await
                .with_context(|| format!("Failed to dislike {}", user.id))?;
            found += 1;
        }
    }
    Ok(found)
}

fn emit(user: &dump_protocol::User) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, user)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Uniform in latitude and longitude, not in area.
fn random_location(rng: &mut impl Rng) -> (f64, f64) {
    (rng.gen_range(-90.0..90.0), rng.gen_range(-180.0..180.0))
}
