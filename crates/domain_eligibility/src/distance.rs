//! Journey distance banding

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance in kilometers between two (latitude, longitude)
/// points, by the haversine formula. Used when the caller has airport
/// coordinates rather than a published route distance.
pub fn great_circle_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Distance bands that scale banded compensation amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBand {
    /// Under 1,500 km
    ShortHaul,
    /// 1,500 to 3,500 km inclusive
    MediumHaul,
    /// Over 3,500 km
    LongHaul,
}

impl DistanceBand {
    pub fn from_km(km: f64) -> Self {
        if km < 1_500.0 {
            DistanceBand::ShortHaul
        } else if km <= 3_500.0 {
            DistanceBand::MediumHaul
        } else {
            DistanceBand::LongHaul
        }
    }
}
