//! Location capability consumed by the signup flow.
//!
//! The screen only talks to [`LocationDevice`]; where the fix and the address
//! come from is up to the adapter.

mod geocoder;
mod handset;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::Coordinate;

pub use geocoder::{NominatimGeocoder, PlaceAddress};
pub use handset::HandsetDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[derive(Debug, Error, PartialEq)]
pub enum LocationError {
    #[error("current location is unavailable")]
    Unavailable,
    #[error("{0}")]
    Device(String),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("reverse geocode request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("reverse geocoder answered {0}")]
    Status(reqwest::StatusCode),
    #[error("reverse geocoder error: {0}")]
    Other(String),
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` when the coordinate resolves to nothing printable.
    async fn lookup(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError>;
}

#[async_trait]
pub trait LocationDevice: Send + Sync {
    async fn request_permission(&self) -> PermissionStatus;

    async fn current_coordinate(&self) -> Result<Coordinate, LocationError>;

    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<String>, GeocodeError>;
}
