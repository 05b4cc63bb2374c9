//! Opening search API.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use explorer_core::{EcoFamily, OpeningSummary, SearchFilters, SearchHit};
use serde::Serialize;

use super::handlers::{first_param, parse_limit, QueryPairs};
use crate::state::AppState;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub opening: OpeningSummary,
    /// Fuzzy match score, 0 is best.
    pub score: f64,
    /// Score after adjective boosts; results are ordered by this.
    pub adjusted_score: f64,
    pub matched_adjectives: Vec<String>,
}

impl From<SearchHit<'_>> for SearchResult {
    fn from(hit: SearchHit<'_>) -> Self {
        Self {
            opening: hit.opening.summary(),
            score: hit.base_score,
            adjusted_score: hit.score,
            matched_adjectives: hit.matched_adjectives,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    /// Categories actually applied after dropping unknown codes.
    pub categories: Vec<EcoFamily>,
    /// Ranked results before the limit was applied.
    pub total: usize,
    pub results: Vec<SearchResult>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/search
///
/// Query parameters are `q`, `categories` (comma-separated ECO family
/// letters) and `limit`. Repeated keys use their first value and malformed
/// values are normalized, never rejected.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryPairs>,
) -> Json<SearchResponse> {
    let query = first_param(&params, "q").unwrap_or_default().to_string();
    let filters = first_param(&params, "categories")
        .map(SearchFilters::parse)
        .unwrap_or_default();
    let max = state.search_config().max_results;
    let limit = parse_limit(first_param(&params, "limit"), max, max);

    let hits = state.engine().search(&query, &filters);
    let total = hits.len();
    let results = hits.into_iter().take(limit).map(SearchResult::from).collect();

    Json(SearchResponse {
        query,
        categories: filters.categories,
        total,
        results,
    })
}
