use serde::{Deserialize, Serialize};

use crate::common::Coordinate;
use crate::device::PermissionStatus;
use crate::geofence::Geofence;
use crate::screen::{Notice, ScreenOutcome};
use crate::session::{Session, UserSession};
use crate::view::{self, ScreenView};

// 手机端上报的定位结果
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub permission: PermissionStatus,
    pub fix: Option<Coordinate>,
    /// 手机端定位失败时的错误信息
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub session: UserSession,
    pub view: ScreenView,
}

impl ScreenResponse {
    pub fn from_session(session: &Session, geofence: &Geofence) -> Self {
        Self {
            notice: None,
            session: session.user_session(),
            view: view::render(session, geofence),
        }
    }

    pub fn from_outcome(outcome: ScreenOutcome, geofence: &Geofence) -> Self {
        Self {
            notice: Some(outcome.notice),
            ..Self::from_session(&outcome.session, geofence)
        }
    }
}
