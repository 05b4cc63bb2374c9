//! Single opening lookup.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use explorer_core::Opening;

use super::handlers::{first_param, ErrorResponse, QueryPairs};
use crate::state::AppState;

/// GET /api/v1/openings?fen=
pub async fn get_opening(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<Opening>, (StatusCode, Json<ErrorResponse>)> {
    let fen = match first_param(&params, "fen").map(str::trim) {
        Some(fen) if !fen.is_empty() => fen,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Missing required parameter: fen".to_string(),
                }),
            ))
        }
    };

    match state.data().get_by_fen(fen) {
        Some(opening) => Ok(Json(opening.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Opening not found: {}", fen),
            }),
        )),
    }
}
