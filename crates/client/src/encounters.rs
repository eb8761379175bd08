//! Decoding of the encounters response into [`User`] records.

use crate::error::{ClientError, Result};
use chrono::{DateTime, Utc};
use dump_protocol::{Album, MusicArtist, MusicService, Photo, ProfileField, User};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EncountersResponse {
    body: Vec<ResponseBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseBody {
    server_error_message: Option<ServerErrorMessage>,
    client_encounters: ClientEncounters,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerErrorMessage {
    error_message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClientEncounters {
    results: Vec<EncounterResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EncounterResult {
    user: RawUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUser {
    user_id: String,
    name: String,
    age: u32,
    gender: i32,
    is_verified: bool,
    distance_long: String,
    distance_short: String,
    albums: Vec<RawAlbum>,
    music_services: Vec<RawMusicService>,
    profile_fields: Vec<RawProfileField>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAlbum {
    uid: String,
    name: String,
    caption: String,
    photos: Vec<RawPhoto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPhoto {
    id: String,
    preview_url: String,
    large_url: String,
    large_photo_size: RawSize,
    face_top_left: RawPoint,
    face_bottom_right: RawPoint,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSize {
    width: u32,
    height: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPoint {
    x: i32,
    y: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMusicService {
    external_provider: RawProvider,
    top_artists: Vec<RawArtist>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProvider {
    id: String,
    display_name: String,
    #[serde(rename = "type")]
    kind: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawArtist {
    id: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProfileField {
    id: String,
    #[serde(rename = "type")]
    kind: i32,
    name: String,
    display_value: String,
}

/// Users in an encounters response, stamped with `scanned_at`.
///
/// A server error message anywhere in the response fails the whole page.
/// An empty list usually means nobody is left near the current location.
pub fn decode_encounters(bytes: &[u8], scanned_at: DateTime<Utc>) -> Result<Vec<User>> {
    let response: EncountersResponse = serde_json::from_slice(bytes)?;
    let mut users = Vec::new();
    for body in response.body {
        if let Some(server_error) = body.server_error_message {
            return Err(ClientError::ServerError(server_error.error_message));
        }
        users.extend(
            body.client_encounters
                .results
                .into_iter()
                .map(|result| convert_user(result.user, scanned_at)),
        );
    }
    Ok(users)
}

fn convert_user(raw: RawUser, scanned_at: DateTime<Utc>) -> User {
    User {
        id: raw.user_id,
        name: raw.name,
        age: raw.age,
        gender: raw.gender,
        verified: raw.is_verified,
        distance_long: raw.distance_long,
        distance_short: raw.distance_short,
        albums: raw.albums.into_iter().map(convert_album).collect(),
        music_services: raw
            .music_services
            .into_iter()
            .map(|service| MusicService {
                id: service.external_provider.id,
                display_name: service.external_provider.display_name,
                kind: service.external_provider.kind,
                top_artists: service
                    .top_artists
                    .into_iter()
                    .map(|artist| MusicArtist {
                        id: artist.id,
                        name: artist.name,
                    })
                    .collect(),
            })
            .collect(),
        profile_fields: raw
            .profile_fields
            .into_iter()
            .map(|field| ProfileField {
                id: field.id,
                kind: field.kind,
                name: field.name,
                display_value: field.display_value,
            })
            .collect(),
        scan_date: Some(scanned_at),
    }
}

fn convert_album(raw: RawAlbum) -> Album {
    Album {
        uid: raw.uid,
        name: raw.name,
        caption: raw.caption,
        photos: raw
            .photos
            .into_iter()
            .map(|photo| Photo {
                id: photo.id,
                preview_url: photo.preview_url,
                large_url: photo.large_url,
                face_top_left: [photo.face_top_left.x, photo.face_top_left.y],
                face_bottom_right: [photo.face_bottom_right.x, photo.face_bottom_right.y],
                width: photo.large_photo_size.width,
                height: photo.large_photo_size.height,
            })
            .collect(),
    }
}
