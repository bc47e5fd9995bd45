use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    common::Coordinate,
    utils::{ApiResponse, error_codes, error_to_api_response, success_to_api_response},
};

// 地理位置查询参数
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub office: Coordinate,
    pub radius_km: f64,
    pub distance_km: f64,
    pub admitted: bool,
}

/// Distance from a coordinate to the office, without touching the session.
pub async fn evaluate(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> (StatusCode, Json<ApiResponse<EvaluateResponse>>) {
    let latitude = match query.latitude {
        Some(lat) => lat,
        None => return bad_request("missing latitude parameter".into()),
    };

    let longitude = match query.longitude {
        Some(lng) => lng,
        None => return bad_request("missing longitude parameter".into()),
    };

    let user = match Coordinate::try_new(latitude, longitude) {
        Ok(user) => user,
        Err(err) => return bad_request(err.to_string()),
    };

    let geofence = state.screen.geofence();
    let decision = geofence.evaluate(user);
    (
        StatusCode::OK,
        success_to_api_response(EvaluateResponse {
            office: geofence.office,
            radius_km: geofence.radius_km,
            distance_km: decision.distance_km,
            admitted: decision.admitted,
        }),
    )
}

fn bad_request(msg: String) -> (StatusCode, Json<ApiResponse<EvaluateResponse>>) {
    (
        StatusCode::BAD_REQUEST,
        error_to_api_response(error_codes::VALIDATION_ERROR, msg),
    )
}
