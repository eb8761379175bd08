use crate::config::StoreConfig;
use crate::cursor::Cursor;
use crate::db::{distinct_locations, Database};
use crate::error::{Result, StoreError};
use dump_protocol::{Location, Photo, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const PROFILES_DIR: &str = "profiles";
const PHOTOS_DIR: &str = "photos";
const LOCATIONS_DIR: &str = "locations";

/// Database kept as one JSON file per record:
///
/// ```text
/// <root>/profiles/<user id>.json
/// <root>/photos/<photo id>.json      metadata
/// <root>/locations/<name>.json
/// <images_path>/<photo id>.jpg       photo bytes
/// ```
#[derive(Debug, Clone)]
pub struct DirDatabase {
    config: StoreConfig,
}

impl DirDatabase {
    /// Open the database, creating its directories when missing.
    pub fn open(config: StoreConfig) -> Result<Self> {
        for dir in [PROFILES_DIR, PHOTOS_DIR, LOCATIONS_DIR] {
            fs::create_dir_all(config.root.join(dir))?;
        }
        fs::create_dir_all(&config.images_path)?;
        log::debug!(
            "Opened profile store at {} (images in {})",
            config.root.display(),
            config.images_path.display()
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn record_path(&self, table: &str, key: &str) -> PathBuf {
        self.config
            .root
            .join(table)
            .join(format!("{}.json", file_stem(key)))
    }

    fn image_path(&self, photo_id: &str) -> PathBuf {
        self.config
            .images_path
            .join(format!("{}.jpg", file_stem(photo_id)))
    }

    fn read_record<T: DeserializeOwned>(&self, table: &str, key: &str, what: &str) -> Result<T> {
        match fs::read(self.record_path(table, key)) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(format!("{what} {key}")))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write_record<T: Serialize>(&self, table: &str, key: &str, record: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(record)?;
        write_atomic(&self.record_path(table, key), &bytes)
    }

    fn scan<T>(&self, table: &'static str) -> Cursor<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let dir = self.config.root.join(table);
        Cursor::spawn(table, self.config.cursor_buffer, move |out| {
            let mut paths: Vec<PathBuf> = Vec::new();
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    paths.push(path);
                }
            }
            paths.sort();
            for path in paths {
                let bytes = fs::read(&path)?;
                let record: T = serde_json::from_slice(&bytes).map_err(|err| {
                    StoreError::Other(format!("Corrupt record {}: {err}", path.display()))
                })?;
                if !out.send(record) {
                    break;
                }
            }
            Ok(())
        })
    }
}

impl Database for DirDatabase {
    fn add_user(&self, user: &User) -> Result<()> {
        self.write_record(PROFILES_DIR, &user.id, user)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.read_record(PROFILES_DIR, user_id, "user")
    }

    fn all_users(&self) -> Cursor<User> {
        self.scan(PROFILES_DIR)
    }

    fn all_user_locations(&self) -> Result<Vec<String>> {
        distinct_locations(self.all_users())
    }

    fn photo_exists(&self, photo_id: &str) -> Result<bool> {
        Ok(self.record_path(PHOTOS_DIR, photo_id).try_exists()?)
    }

    fn add_photo(&self, photo: &Photo, data: &[u8]) -> Result<()> {
        let image = self.image_path(&photo.id);
        write_atomic(&image, data)?;
        if let Err(err) = self.write_record(PHOTOS_DIR, &photo.id, photo) {
            if let Err(cleanup) = fs::remove_file(&image) {
                log::warn!("Failed to remove {}: {cleanup}", image.display());
            }
            return Err(err);
        }
        Ok(())
    }

    fn get_photo(&self, photo_id: &str) -> Result<(Photo, Vec<u8>)> {
        let photo: Photo = self.read_record(PHOTOS_DIR, photo_id, "photo")?;
        let data = fs::read(self.image_path(photo_id))?;
        Ok((photo, data))
    }

    fn add_location(&self, location: &Location) -> Result<()> {
        self.write_record(LOCATIONS_DIR, &location.name, location)
    }

    fn get_location(&self, name: &str) -> Result<Location> {
        self.read_record(LOCATIONS_DIR, name, "location")
    }

    fn all_locations(&self) -> Cursor<Location> {
        self.scan(LOCATIONS_DIR)
    }
}

/// File name for a record key: ASCII alphanumerics, `-` and `_` are kept,
/// every other byte is written as `%XX`.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    if stem.is_empty() {
        stem.push('%');
    }
    stem
}

/// Write to a uniquely named temp file in the same directory, then rename.
/// The temp file is removed on failure.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
