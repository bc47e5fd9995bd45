use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use super::model::{ScreenResponse, SignupRequest};
use crate::{
    AppState,
    common::Coordinate,
    device::HandsetDevice,
    error::AppError,
    utils::{ApiResponse, success_to_api_response},
};

type ScreenResult = Result<Json<ApiResponse<ScreenResponse>>, AppError>;

// 获取当前界面
pub async fn get_screen(State(state): State<AppState>) -> Json<ApiResponse<ScreenResponse>> {
    let session = state.screen.session();
    success_to_api_response(ScreenResponse::from_session(
        &session,
        state.screen.geofence(),
    ))
}

// 围栏内签到解锁
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ScreenResult {
    let Json(req) = payload?;
    let fix = req.fix.map(Coordinate::validated).transpose()?;
    let device = HandsetDevice::new(req.permission, fix)
        .with_error(req.error)
        .with_geocoder(state.geocoder.clone());

    let outcome = state.screen.signup(&device).await?;
    Ok(success_to_api_response(ScreenResponse::from_outcome(
        outcome,
        state.screen.geofence(),
    )))
}

pub async fn check_in(State(state): State<AppState>) -> ScreenResult {
    let outcome = state.screen.check_in()?;
    Ok(success_to_api_response(ScreenResponse::from_outcome(
        outcome,
        state.screen.geofence(),
    )))
}

pub async fn check_out(State(state): State<AppState>) -> ScreenResult {
    let outcome = state.screen.check_out()?;
    Ok(success_to_api_response(ScreenResponse::from_outcome(
        outcome,
        state.screen.geofence(),
    )))
}
