use crate::config::ScanConfig;
use anyhow::{Context, Result};
use dump_client::PhotoFetcher;
use dump_protocol::{Photo, User};
use dump_store::Database;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub users: usize,
    pub photos_queued: usize,
    pub photos_stored: usize,
}

/// Store the users read from `input` (JSON values, usually one per line)
/// and download the first photos of each.
///
/// Photo download failures are logged and skipped; a malformed user record
/// stops the ingest once the queued photos are done.
pub async fn run<R>(
    input: R,
    db: Arc<dyn Database>,
    fetcher: PhotoFetcher,
    scan: &ScanConfig,
) -> Result<IngestStats>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Photo>(scan.photo_queue.max(1));
    let rx = Arc::new(Mutex::new(rx));

    let workers: Vec<_> = (0..scan.photo_workers.max(1))
        .map(|_| {
            let rx = rx.clone();
            let db = db.clone();
            let fetcher = fetcher.clone();
            tokio::spawn(photo_worker(rx, db, fetcher))
        })
        .collect();

    let max_photos = scan.max_photos_per_user;
    let reader_db = db.clone();
    let reader =
        tokio::task::spawn_blocking(move || read_users(input, &*reader_db, &tx, max_photos));

    let read = reader.await.context("User reader panicked")?;
    let mut photos_stored = 0;
    for worker in workers {
        photos_stored += worker.await.context("Photo worker panicked")?;
    }

    let (users, photos_queued) = read?;
    log::info!("Stored {users} users and {photos_stored}/{photos_queued} photos");
    Ok(IngestStats {
        users,
        photos_queued,
        photos_stored,
    })
}

fn read_users<R: Read>(
    input: R,
    db: &dyn Database,
    photos: &mpsc::Sender<Photo>,
    max_photos: usize,
) -> Result<(usize, usize)> {
    let mut users = 0;
    let mut queued = 0;
    let stream = serde_json::Deserializer::from_reader(input).into_iter::<User>();
    for user in stream {
        let user = user.with_context(|| format!("Invalid user record after {users} users"))?;
        db.add_user(&user)
            .with_context(|| format!("Failed to store user {}", user.id))?;
        users += 1;

        for photo in user.all_photos().take(max_photos) {
            if db.photo_exists(&photo.id)? {
                log::debug!("Photo {} already stored", photo.id);
                continue;
            }
            if photos.blocking_send(photo.clone()).is_err() {
                anyhow::bail!("Photo workers stopped");
            }
            queued += 1;
        }
    }
    Ok((users, queued))
}

async fn photo_worker(
    queue: Arc<Mutex<mpsc::Receiver<Photo>>>,
    db: Arc<dyn Database>,
    fetcher: PhotoFetcher,
) -> usize {
    let mut stored = 0;
    loop {
        let next = queue.lock().await.recv().await;
        let Some(photo) = next else {
            return stored;
        };
        let data = match fetcher.fetch(&photo).await {
            Ok(data) => data,
            Err(err) => {
                log::warn!("Failed to download photo {}: {err}", photo.id);
                continue;
            }
        };
        match db.add_photo(&photo, &data) {
            Ok(()) => stored += 1,
            Err(err) => log::warn!("Failed to store photo {}: {err}", photo.id),
        }
    }
}
