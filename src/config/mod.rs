use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::common::Coordinate;
use crate::geofence::{DEFAULT_ADMIT_RADIUS_KM, DEFAULT_OFFICE_LOCATION, Geofence};

const DEFAULT_GEOCODER_USER_AGENT: &str = "attendance-geofence/0.1";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("office location is invalid: {0}")]
    OfficeLocation(#[from] crate::common::CoordinateError),
    #[error("ADMIT_RADIUS_KM must be a finite non-negative number, got {0}")]
    Radius(f64),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub office_location: Coordinate,
    pub admit_radius_km: f64,
    /// 未设置时不做逆地理编码
    pub geocoder_url: Option<String>,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 3000,
            api_base_uri: "/api".into(),
            office_location: DEFAULT_OFFICE_LOCATION,
            admit_radius_km: DEFAULT_ADMIT_RADIUS_KM,
            geocoder_url: None,
            geocoder_user_agent: DEFAULT_GEOCODER_USER_AGENT.into(),
            geocoder_timeout_secs: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let office_location = Coordinate::try_new(
            parse_or(&get, "OFFICE_LATITUDE", defaults.office_location.latitude)?,
            parse_or(&get, "OFFICE_LONGITUDE", defaults.office_location.longitude)?,
        )?;

        let admit_radius_km = parse_or(&get, "ADMIT_RADIUS_KM", defaults.admit_radius_km)?;
        if !admit_radius_km.is_finite() || admit_radius_km < 0.0 {
            return Err(ConfigError::Radius(admit_radius_km));
        }

        Ok(Config {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_or(&get, "SERVER_PORT", defaults.server_port)?,
            api_base_uri: get("API_BASE_URI")
                .map(|uri| format!("/{}", uri.trim().trim_matches('/')))
                .unwrap_or(defaults.api_base_uri),
            office_location,
            admit_radius_km,
            geocoder_url: get("GEOCODER_URL").map(|url| url.trim_end_matches('/').to_string()),
            geocoder_user_agent: get("GEOCODER_USER_AGENT")
                .unwrap_or(defaults.geocoder_user_agent),
            geocoder_timeout_secs: parse_or(
                &get,
                "GEOCODER_TIMEOUT_SECS",
                defaults.geocoder_timeout_secs,
            )?,
        })
    }

    pub fn geofence(&self) -> Geofence {
        Geofence::new(self.office_location, self.admit_radius_km)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder_timeout_secs)
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
        }),
        None => Ok(default),
    }
}
