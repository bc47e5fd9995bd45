use std::sync::Arc;

use async_trait::async_trait;

use super::{GeocodeError, LocationDevice, LocationError, PermissionStatus, ReverseGeocoder};
use crate::common::Coordinate;

/// A device whose permission answer and fix were reported by the handset shell
/// with the signup request.
#[derive(Clone)]
pub struct HandsetDevice {
    permission: PermissionStatus,
    fix: Option<Coordinate>,
    error: Option<String>,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
}

impl HandsetDevice {
    pub fn new(permission: PermissionStatus, fix: Option<Coordinate>) -> Self {
        Self {
            permission,
            fix,
            error: None,
            geocoder: None,
        }
    }

    /// Error the handset hit while locating; it wins over any reported fix.
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error.filter(|message| !message.trim().is_empty());
        self
    }

    pub fn with_geocoder(mut self, geocoder: Option<Arc<dyn ReverseGeocoder>>) -> Self {
        self.geocoder = geocoder;
        self
    }
}

#[async_trait]
impl LocationDevice for HandsetDevice {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_coordinate(&self) -> Result<Coordinate, LocationError> {
        if let Some(message) = &self.error {
            return Err(LocationError::Device(message.clone()));
        }
        self.fix.ok_or(LocationError::Unavailable)
    }

    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<String>, GeocodeError> {
        match &self.geocoder {
            Some(geocoder) => geocoder.lookup(coordinate).await,
            None => Ok(None),
        }
    }
}
