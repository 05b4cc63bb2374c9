use std::sync::Arc;

use axum::{extract::State, Json};
use explorer_core::EnrichmentStatus;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub openings: usize,
    /// SHA-256 of the loaded data files.
    pub fingerprint: String,
    pub enriched_percent: f64,
    pub enrichment: EnrichmentStatus,
}

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let data = state.data();
    let enrichment = data.enrichment_status().clone();
    Json(StatsResponse {
        openings: data.len(),
        fingerprint: data.fingerprint().to_string(),
        enriched_percent: enrichment.enriched_percent(),
        enrichment,
    })
}
