use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::session::Session;
use crate::utils::{ApiResponse, success_to_api_response};

/// Ping响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// 服务器时间
    pub timestamp: i64,
    /// 当前界面状态
    pub screen: &'static str,
    pub reverse_geocoding: bool,
}

/// 健康检查接口
pub async fn ping(State(state): State<AppState>) -> Json<ApiResponse<PingResponse>> {
    let screen = match state.screen.session() {
        Session::Locked => "locked",
        Session::AwaitingLocation { .. } => "awaiting_location",
        Session::UnlockedOffline { .. } => "unlocked_offline",
        Session::UnlockedOnline { .. } => "unlocked_online",
    };

    success_to_api_response(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        screen,
        reverse_geocoding: state.geocoder.is_some(),
    })
}
