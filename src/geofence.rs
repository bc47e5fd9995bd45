use serde::Serialize;

use crate::common::Coordinate;

/// 地球半径（千米）
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Signup is admitted within this many kilometres of the office.
pub const DEFAULT_ADMIT_RADIUS_KM: f64 = 1.0;

pub const DEFAULT_OFFICE_LOCATION: Coordinate = Coordinate::new(29.5384, 76.9724);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeofenceDecision {
    pub distance_km: f64,
    pub admitted: bool,
}

// 使用Haversine公式计算球面距离（千米）
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Admits `user` when its great-circle distance to `office` is at most `radius_km`.
pub fn evaluate(user: Coordinate, office: Coordinate, radius_km: f64) -> GeofenceDecision {
    let distance_km = haversine_km(user, office);
    GeofenceDecision {
        distance_km,
        admitted: distance_km <= radius_km,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    pub office: Coordinate,
    pub radius_km: f64,
}

impl Default for Geofence {
    fn default() -> Self {
        Self {
            office: DEFAULT_OFFICE_LOCATION,
            radius_km: DEFAULT_ADMIT_RADIUS_KM,
        }
    }
}

impl Geofence {
    pub fn new(office: Coordinate, radius_km: f64) -> Self {
        Self { office, radius_km }
    }

    pub fn evaluate(&self, user: Coordinate) -> GeofenceDecision {
        evaluate(user, self.office, self.radius_km)
    }
}
