use serde::{Deserialize, Serialize};
use thiserror::Error;

// 公共数据结构
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate from untrusted input, rejecting NaN and out-of-range degrees.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    pub fn validated(self) -> Result<Self, CoordinateError> {
        Self::try_new(self.latitude, self.longitude)
    }

    /// "lat, lon" at four decimals, shown when no address is known.
    pub fn display_short(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_degrees() {
        assert_eq!(
            Coordinate::try_new(91.0, 0.0),
            Err(CoordinateError::Latitude(91.0))
        );
        assert_eq!(
            Coordinate::try_new(0.0, -180.5),
            Err(CoordinateError::Longitude(-180.5))
        );
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::try_new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn short_display_uses_four_decimals() {
        let c = Coordinate::new(29.538_449, 76.972_35);
        assert_eq!(c.display_short(), "29.5384, 76.9724");
    }
}
