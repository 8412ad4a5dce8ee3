// HTTP response utilities for the proxy route
use axum::{
    body::Body,
    http::{header, Response, StatusCode},
};

/// Pass an upstream JSON body through with the upstream's status code and
/// a permissive cross-origin header.
pub fn json_passthrough_response(
    status: u16,
    body: Vec<u8>,
) -> Result<Response<Body>, StatusCode> {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(body))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// A `{"error": "<message>"}` body with the given status.
pub fn json_error_response(status: StatusCode, message: &str) -> Result<Response<Body>, StatusCode> {
    let body = serde_json::json!({ "error": message });

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(body.to_string()))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
