//! Great-circle road distance estimation.
//!
//! Straight-line haversine distance scaled by a constant road factor to
//! approximate real road travel.

use crate::error::{PlannerError, Result};
use crate::traits::DistanceMatrixProvider;

/// Default multiplier from straight-line to road distance.
pub const DEFAULT_ROAD_FACTOR: f64 = 1.3;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Road distance in km between two coordinates.
///
/// Fails with `InvalidCoordinate` if any coordinate is not finite or out of range.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, road_factor: f64) -> Result<f64> {
    validate_coordinate(lat1, lon1)?;
    validate_coordinate(lat2, lon2)?;
    Ok(haversine_km((lat1, lon1), (lat2, lon2)) * road_factor)
}

/// Latitude must lie in [-90, 90] and longitude in [-180, 180].
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(PlannerError::InvalidCoordinate { latitude, longitude })
    }
}

/// Calculate haversine distance between two points in kilometers.
fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine-based road distance provider.
#[derive(Debug, Clone, Copy)]
pub struct RoadDistance {
    /// Multiplier applied to the great-circle distance.
    pub road_factor: f64,
}

impl Default for RoadDistance {
    fn default() -> Self {
        Self {
            road_factor: DEFAULT_ROAD_FACTOR,
        }
    }
}

impl RoadDistance {
    pub fn new(road_factor: f64) -> Self {
        Self { road_factor }
    }
}

impl DistanceMatrixProvider for RoadDistance {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        haversine_km(from, to) * self.road_factor
    }
}
