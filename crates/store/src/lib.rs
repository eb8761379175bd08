//! # Profile store
//!
//! Persists scanned profiles, their photos and geocoded locations, and
//! streams them back for analysis.
//!
//! Bulk reads return a [`Cursor`]: a single-pass iterator of `Result`
//! items filled by a reader thread. An error item ends the cursor, so a
//! consumer such as the correlation pass can stop on the first failure.

mod config;
mod cursor;
mod db;
mod dir;
mod error;
mod memory;

pub use config::{StoreConfig, DB_ENV, IMAGES_ENV};
pub use cursor::{Cursor, Emitter};
pub use db::Database;
pub use dir::DirDatabase;
pub use error::{Result, StoreError};
pub use memory::MemoryDatabase;
