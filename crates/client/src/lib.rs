//! HTTP side of the profile dumper.
//!
//! [`DumpClient`] replays the captured browser calls (see `dump-template`)
//! with fresh field values and decodes encounters pages into
//! [`dump_protocol::User`] records. [`PhotoFetcher`] downloads profile
//! photos, and [`Geocoder`] resolves the place names that profiles report
//! into coordinates.

pub mod client;
pub mod config;
pub mod encounters;
pub mod error;
pub mod geocode;
pub mod photos;

pub use client::DumpClient;
pub use config::{ClientConfig, DEFAULT_GEOCODE_REFERER, DEFAULT_GEOCODE_URL};
pub use encounters::decode_encounters;
pub use error::{ClientError, Result};
pub use geocode::Geocoder;
pub use photos::PhotoFetcher;
