use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub openings: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        openings: state.data().len(),
    })
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}

/// Raw query string pairs in request order.
///
/// Extracted as a list rather than a struct so repeated keys never reject
/// the request.
pub type QueryPairs = Vec<(String, String)>;

/// First value of `key`, ignoring any repeats.
pub fn first_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Parse a `limit` query value leniently.
///
/// Missing or non-numeric input yields `default`; numbers outside
/// `1..=max` are clamped.
pub fn parse_limit(raw: Option<&str>, default: usize, max: usize) -> usize {
    let max = max.max(1);
    match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).map_or(max, |n| n.min(max)),
        None => default.clamp(1, max),
    }
}
