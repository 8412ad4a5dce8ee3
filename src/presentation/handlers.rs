// HTTP request handlers
use crate::domain::activity::ActivityItem;
use crate::domain::filter::{filter_activities, FilterOptions};
use crate::infrastructure::http_response::{json_error_response, json_passthrough_response};
use crate::presentation::app_state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Method, Response, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub activities: Vec<ActivityItem>,
    pub last_fetch: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The current feed snapshot with the query's predicates applied.
pub async fn get_feed(
    Query(filters): Query<FilterOptions>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let snapshot = state.feed_state.snapshot().await;
    let activities = filter_activities(&snapshot.activities, &filters, Utc::now());

    axum::Json(FeedResponse {
        activities,
        last_fetch: snapshot.last_fetch,
        error: snapshot.error,
    })
}

/// Wake the refresh loop ahead of its next interval tick.
pub async fn refresh_feed(State(state): State<Arc<AppState>>) -> StatusCode {
    state.feed_state.request_refresh();
    StatusCode::ACCEPTED
}

/// Forward a GraphQL request to Linear. The method check is done by hand
/// so non-POST requests get the JSON error body instead of axum's bare
/// 405.
pub async fn linear_proxy(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response<Body> {
    if method != Method::POST {
        return match json_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed") {
            Ok(response) => response,
            Err(status) => status.into_response(),
        };
    }

    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());

    match state.linear_proxy.forward(authorization, body).await {
        Ok((status, body)) => match json_passthrough_response(status, body) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => {
            tracing::error!("Linear proxy forward failed: {:#}", e);
            match json_error_response(StatusCode::INTERNAL_SERVER_ERROR, &format!("{:#}", e)) {
                Ok(response) => response,
                Err(status) => status.into_response(),
            }
        }
    }
}
