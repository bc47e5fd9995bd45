use axum::{
    body::{Body, to_bytes},
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

// 错误响应体最多读取的字节数
const MAX_LOGGED_BODY: usize = 4096;

/// Logs failed requests with their envelope: 5xx at error, 4xx at warn.
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read error response body: {}", e);
            return Response::from_parts(parts, Body::empty());
        }
    };
    let body_str = String::from_utf8_lossy(&bytes);

    if status.is_server_error() {
        error!("{} {} failed - Status: {}, Body: {}", method, path, status, body_str);
    } else {
        warn!("{} {} rejected - Status: {}, Body: {}", method, path, status, body_str);
    }

    // 重置body以便重新构建响应
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
