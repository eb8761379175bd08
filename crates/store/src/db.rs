use crate::cursor::Cursor;
use crate::error::Result;
use dump_protocol::{Location, Photo, User};

/// A dating profile database.
///
/// Implementations are shared between threads; every method takes `&self`.
pub trait Database: Send + Sync {
    /// Insert or replace the user with the same id.
    fn add_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    /// Stream every stored user once.
    fn all_users(&self) -> Cursor<User>;
    /// Distinct user locations, sorted.
    fn all_user_locations(&self) -> Result<Vec<String>>;

    fn photo_exists(&self, photo_id: &str) -> Result<bool>;
    /// Store the photo bytes and its metadata; on failure neither is kept.
    fn add_photo(&self, photo: &Photo, data: &[u8]) -> Result<()>;
    fn get_photo(&self, photo_id: &str) -> Result<(Photo, Vec<u8>)>;

    /// Insert or replace the location with the same name.
    fn add_location(&self, location: &Location) -> Result<()>;
    fn get_location(&self, name: &str) -> Result<Location>;
    fn all_locations(&self) -> Cursor<Location>;

    /// Locations within `max_miles` of `(lat, lon)`.
    fn locations_near(&self, lat: f64, lon: f64, max_miles: f64) -> Cursor<Location> {
        let all = self.all_locations();
        Cursor::spawn("locations-near", 16, move |out| {
            for location in all {
                let location = location?;
                if location.distance(lat, lon) <= max_miles && !out.send(location) {
                    break;
                }
            }
            Ok(())
        })
    }
}

/// Distinct locations of every user in `users`, sorted.
pub(crate) fn distinct_locations(users: Cursor<User>) -> Result<Vec<String>> {
    let mut locations = std::collections::BTreeSet::new();
    for user in users {
        locations.insert(user?.location().to_string());
    }
    Ok(locations.into_iter().collect())
}
