use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A geocoded place name as it appears in profile location fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country_code: String,
}

impl Location {
    /// Great-circle distance in miles between this location and `(lat, lon)`.
    pub fn distance(&self, lat: f64, lon: f64) -> f64 {
        let a = unit_vector(lat, lon);
        let b = unit_vector(self.lat, self.lon);
        let cos_theta = (a[0] * b[0] + a[1] * b[1] + a[2] * b[2]).clamp(-1.0, 1.0);
        EARTH_RADIUS_MILES * cos_theta.acos()
    }
}

fn unit_vector(lat: f64, lon: f64) -> [f64; 3] {
    let (lat, lon) = (lat.to_radians(), lon.to_radians());
    [lon.sin() * lat.cos(), lat.sin(), lon.cos() * lat.cos()]
}
