use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use config::Config;
use device::{GeocodeError, NominatimGeocoder, ReverseGeocoder};
use screen::Screen;
use tower::ServiceBuilder;

pub mod common;
pub mod config;
pub mod device;
pub mod error;
pub mod geofence;
pub mod middleware;
pub mod routes;
pub mod screen;
pub mod session;
pub mod utils;
pub mod view;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub screen: Arc<Screen>,
    pub geocoder: Option<Arc<dyn ReverseGeocoder>>,
}

impl AppState {
    pub fn new(config: Config, screen: Screen) -> Self {
        Self {
            config,
            screen: Arc::new(screen),
            geocoder: None,
        }
    }

    /// State for `config`: a system-clock screen, plus a Nominatim geocoder when a URL is set.
    pub fn from_config(config: Config) -> Result<Self, GeocodeError> {
        let screen = Screen::new(config.geofence());
        let geocoder = match &config.geocoder_url {
            Some(url) => {
                let geocoder = NominatimGeocoder::new(
                    url,
                    &config.geocoder_user_agent,
                    config.geocoder_timeout(),
                )?;
                Some(Arc::new(geocoder) as Arc<dyn ReverseGeocoder>)
            }
            None => None,
        };
        Ok(Self::new(config, screen).with_geocoder(geocoder))
    }

    pub fn with_geocoder(mut self, geocoder: Option<Arc<dyn ReverseGeocoder>>) -> Self {
        self.geocoder = geocoder;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/ping", get(routes::health::ping))
        // 考勤界面
        .route("/screen", get(routes::screen::get_screen))
        .route("/screen/signup", post(routes::screen::signup))
        .route("/screen/check-in", post(routes::screen::check_in))
        .route("/screen/check-out", post(routes::screen::check_out))
        .route("/geofence/evaluate", get(routes::geofence::evaluate));

    // 空前缀或 "/" 时直接挂在根路径
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    router
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::log_errors)))
        .with_state(state)
}
