use crate::error::{Result, StoreError};
use std::sync::mpsc::{self, Receiver, SyncSender};

/// Single-pass stream of records read by a background thread.
///
/// Yields `Ok` records until the traversal ends. A failed traversal yields
/// one `Err` and then ends; it cannot be resumed, so callers start a new
/// cursor. Dropping the cursor stops the reader at its next record.
pub struct Cursor<T> {
    rx: Option<Receiver<Result<T>>>,
}

/// Producer side of a [`Cursor`].
pub struct Emitter<T> {
    tx: SyncSender<Result<T>>,
}

impl<T> Emitter<T> {
    /// Hand a record to the consumer. Returns `false` once the cursor has
    /// been dropped; the producer should stop then.
    pub fn send(&self, item: T) -> bool {
        self.tx.send(Ok(item)).is_ok()
    }
}

impl<T: Send + 'static> Cursor<T> {
    /// Run `produce` on a reader thread. An error it returns becomes the
    /// cursor's terminal item.
    pub fn spawn<F>(name: &str, buffer: usize, produce: F) -> Self
    where
        F: FnOnce(&Emitter<T>) -> Result<()> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(buffer.max(1));
        let emitter = Emitter { tx };
        let thread_name = format!("cursor-{name}");
        let spawned = std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                if let Err(err) = produce(&emitter) {
                    log::debug!("{thread_name} failed: {err}");
                    // Consumer may already be gone.
                    let _ = emitter.tx.send(Err(err));
                }
            });
        match spawned {
            Ok(_) => Self { rx: Some(rx) },
            Err(err) => Self::failed(StoreError::IoError(err)),
        }
    }
}

impl<T> Cursor<T> {
    /// Cursor over records already in memory.
    pub fn from_items(items: Vec<Result<T>>) -> Self {
        let (tx, rx) = mpsc::sync_channel(items.len().max(1));
        for item in items {
            // Receiver is alive and the buffer is large enough.
            let _ = tx.send(item);
        }
        Self { rx: Some(rx) }
    }

    /// Cursor whose only item is `err`.
    pub fn failed(err: StoreError) -> Self {
        Self::from_items(vec![Err(err)])
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.rx.as_ref()?.recv().ok();
        match item {
            Some(Ok(record)) => Some(Ok(record)),
            Some(Err(err)) => {
                self.rx = None;
                Some(Err(err))
            }
            None => {
                self.rx = None;
                None
            }
        }
    }
}

impl<T> std::iter::FusedIterator for Cursor<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_spawned_cursor_yields_in_order() {
        let cursor = Cursor::spawn("numbers", 2, |out| {
            for i in 0..10 {
                if !out.send(i) {
                    break;
                }
            }
            Ok(())
        });
        let items: Vec<i32> = cursor.map(|item| item.unwrap()).collect();
        assert_eq!(items, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_error_is_terminal() {
        let mut cursor = Cursor::spawn("failing", 4, |out| {
            out.send(1);
            Err(StoreError::Other("disk gone".to_string()))
        });
        assert_eq!(cursor.next().unwrap().unwrap(), 1);
        let err = cursor.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "disk gone");
        assert!(cursor.next().is_none());
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_drop_stops_producer() {
        let produced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&produced);
        let mut cursor = Cursor::spawn("endless", 1, move |out| {
            loop {
                counter.fetch_add(1, Ordering::SeqCst);
                if !out.send(()) {
                    return Ok(());
                }
            }
        });
        cursor.next();
        drop(cursor);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut last = produced.load(Ordering::SeqCst);
        loop {
            std::thread::sleep(Duration::from_millis(20));
            let now = produced.load(Ordering::SeqCst);
            if now == last {
                break;
            }
            last = now;
            assert!(Instant::now() < deadline, "producer kept running");
        }
    }

    #[test]
    fn test_from_items_and_failed() {
        let cursor = Cursor::from_items(vec![Ok("a"), Ok("b")]);
        assert_eq!(cursor.count(), 2);

        let mut failed: Cursor<()> = Cursor::failed(StoreError::NotFound("x".into()));
        assert!(failed.next().unwrap().is_err());
        assert!(failed.next().is_none());
    }
}
