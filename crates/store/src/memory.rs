use crate::cursor::Cursor;
use crate::db::{distinct_locations, Database};
use crate::error::{Result, StoreError};
use dump_protocol::{Location, Photo, User};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// In-process database, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    inner: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<String, User>,
    photos: BTreeMap<String, (Photo, Vec<u8>)>,
    locations: BTreeMap<String, Location>,
}

impl MemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Other("memory database lock poisoned".to_string()))
    }

    fn snapshot<T: Clone>(&self, pick: impl FnOnce(&Tables) -> Vec<T>) -> Cursor<T> {
        match self.tables() {
            Ok(tables) => Cursor::from_items(pick(&tables).into_iter().map(Ok).collect()),
            Err(err) => Cursor::failed(err),
        }
    }
}

impl Database for MemoryDatabase {
    fn add_user(&self, user: &User) -> Result<()> {
        self.tables()?.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.tables()?
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }

    fn all_users(&self) -> Cursor<User> {
        self.snapshot(|tables| tables.users.values().cloned().collect())
    }

    fn all_user_locations(&self) -> Result<Vec<String>> {
        distinct_locations(self.all_users())
    }

    fn photo_exists(&self, photo_id: &str) -> Result<bool> {
        Ok(self.tables()?.photos.contains_key(photo_id))
    }

    fn add_photo(&self, photo: &Photo, data: &[u8]) -> Result<()> {
        self.tables()?
            .photos
            .insert(photo.id.clone(), (photo.clone(), data.to_vec()));
        Ok(())
    }

    fn get_photo(&self, photo_id: &str) -> Result<(Photo, Vec<u8>)> {
        self.tables()?
            .photos
            .get(photo_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("photo {photo_id}")))
    }

    fn add_location(&self, location: &Location) -> Result<()> {
        self.tables()?
            .locations
            .insert(location.name.clone(), location.clone());
        Ok(())
    }

    fn get_location(&self, name: &str) -> Result<Location> {
        self.tables()?
            .locations
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("location {name}")))
    }

    fn all_locations(&self) -> Cursor<Location> {
        self.snapshot(|tables| tables.locations.values().cloned().collect())
    }
}
