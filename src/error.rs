use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::common::CoordinateError;
use crate::session::TransitionError;
use crate::utils::{ApiResponse, error_codes};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<CoordinateError> for AppError {
    fn from(err: CoordinateError) -> Self {
        AppError::Validation(err.to_string())
    }
}

// 请求体解析失败也走统一响应格式
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::Transition(_) => (StatusCode::CONFLICT, error_codes::INVALID_STATE),
        };

        let body = Json(ApiResponse::<()> {
            code,
            msg: self.to_string(),
            resp_data: None,
        });

        (status, body).into_response()
    }
}
