use crate::report::render_location_counts;
use anyhow::Result;
use dump_client::Geocoder;
use dump_protocol::{Location, UNKNOWN_LOCATION};
use dump_store::{Database, StoreError};
use std::collections::HashMap;
use std::io::{self, Write};

/// Print how many stored users report each location.
pub fn count(db: &dyn Database) -> Result<()> {
    let counts = location_counts(db)?;
    io::stdout()
        .lock()
        .write_all(render_location_counts(&counts).as_bytes())?;
    Ok(())
}

/// Users per location, most common first.
pub fn location_counts(db: &dyn Database) -> Result<Vec<(String, usize)>> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for user in db.all_users() {
        *counts.entry(user?.location().to_string()).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(counts)
}

/// Geocode every user location that has no stored coordinates yet.
///
/// Lookup failures are logged and retried on the next run.
pub async fn find(db: &dyn Database, geocoder: &Geocoder) -> Result<()> {
    let mut added = 0usize;
    for name in db.all_user_locations()? {
        if name == UNKNOWN_LOCATION {
            continue;
        }
        match db.get_location(&name) {
            Ok(_) => continue,
            Err(StoreError::NotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }
        log::info!("Looking up {name}");
        let (lat, lon) = match geocoder.lookup(&name).await {
            Ok(coords) => coords,
            Err(err) => {
                log::warn!("Lookup of {name} failed: {err}");
                continue;
            }
        };
        db.add_location(&Location {
            name,
            lat,
            lon,
            country_code: String::new(),
        })?;
        added += 1;
    }
    log::info!("Added {added} locations");
    Ok(())
}
