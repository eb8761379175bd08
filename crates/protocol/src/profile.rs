use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile field holding the free-text bio.
pub const BIO_FIELD: &str = "aboutme_text";
pub const LOCATION_FIELD: &str = "location";
pub const HEIGHT_FIELD: &str = "lifestyle_height";
/// The service spells it this way.
pub const ZODIAC_FIELD: &str = "lifestyle_zodiak";

pub const UNKNOWN_LOCATION: &str = "Unknown";

pub const GENDER_MALE: i32 = 1;
pub const GENDER_FEMALE: i32 = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    #[serde(default)]
    pub preview_url: String,
    #[serde(default)]
    pub large_url: String,

    /// X,Y pairs for face detection.
    #[serde(default)]
    pub face_top_left: [i32; 2],
    #[serde(default)]
    pub face_bottom_right: [i32; 2],

    /// May be 0 for instagram photos.
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicArtist {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicService {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, rename = "type")]
    pub kind: i32,
    #[serde(default)]
    pub top_artists: Vec<MusicArtist>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileField {
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_value: String,
}

/// A scanned dating profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub gender: i32,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub distance_long: String,
    #[serde(default)]
    pub distance_short: String,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub music_services: Vec<MusicService>,
    #[serde(default)]
    pub profile_fields: Vec<ProfileField>,

    #[serde(default)]
    pub scan_date: Option<DateTime<Utc>>,
}

impl User {
    /// Display value of the profile field `id`. When the field repeats,
    /// the last occurrence wins.
    pub fn field(&self, id: &str) -> Option<&str> {
        self.profile_fields
            .iter()
            .rev()
            .find(|field| field.id == id)
            .map(|field| field.display_value.as_str())
    }

    pub fn has_field(&self, id: &str) -> bool {
        self.profile_fields.iter().any(|field| field.id == id)
    }

    /// Free-text bio, `None` when the profile has no bio field.
    pub fn bio(&self) -> Option<&str> {
        self.field(BIO_FIELD)
    }

    /// First line of the location field, or [`UNKNOWN_LOCATION`].
    pub fn location(&self) -> &str {
        self.profile_fields
            .iter()
            .find(|field| field.id == LOCATION_FIELD)
            .map(|field| field.display_value.lines().next().unwrap_or(""))
            .unwrap_or(UNKNOWN_LOCATION)
    }

    pub fn all_photos(&self) -> impl Iterator<Item = &Photo> {
        self.albums.iter().flat_map(|album| album.photos.iter())
    }

    /// Height in centimetres, parsed from a value like `5' 11" (180 cm)`.
    pub fn height_cm(&self) -> Option<u32> {
        let raw = self
            .profile_fields
            .iter()
            .find(|field| field.id == HEIGHT_FIELD)?
            .display_value
            .replace('(', "");
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        tokens
            .windows(2)
            .find(|pair| pair[1] == "cm")
            .and_then(|pair| pair[0].parse().ok())
    }
}
