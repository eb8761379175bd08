//! # Profile records
//!
//! Data model shared by the scanner, the store and the analysis code.
//! A [`User`] is produced once by the scanner (or decoded from the store)
//! and never mutated afterwards.

mod location;
mod profile;

pub use location::{Location, EARTH_RADIUS_MILES};
pub use profile::{
    Album, MusicArtist, MusicService, Photo, ProfileField, User, BIO_FIELD, GENDER_FEMALE,
    GENDER_MALE, HEIGHT_FIELD, LOCATION_FIELD, UNKNOWN_LOCATION, ZODIAC_FIELD,
};
