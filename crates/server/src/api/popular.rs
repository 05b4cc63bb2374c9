//! Landing-page popularity API.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use explorer_core::{EcoFamily, OpeningSummary};
use serde::Serialize;

use super::handlers::{first_param, parse_limit, QueryPairs};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularMetadata {
    pub total_returned: usize,
    pub limit_per_category: usize,
}

/// Family letters map to their top openings, alongside `metadata`.
#[derive(Debug, Serialize)]
pub struct PopularByEcoResponse {
    #[serde(flatten)]
    pub families: BTreeMap<String, Vec<OpeningSummary>>,
    pub metadata: PopularMetadata,
}

/// GET /api/v1/popular-by-eco
///
/// Every family is present; families without popularity data map to an
/// empty list.
pub async fn popular_by_eco(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryPairs>,
) -> Json<PopularByEcoResponse> {
    let config = state.popularity_config();
    let limit = parse_limit(
        first_param(&params, "limit"),
        config.default_limit,
        config.max_limit,
    );

    let top = state.aggregator().top_by_family(limit, &EcoFamily::ALL);
    let families = top
        .families
        .iter()
        .map(|ranking| {
            (
                ranking.family.to_string(),
                ranking.openings.iter().map(|o| o.summary()).collect(),
            )
        })
        .collect();

    Json(PopularByEcoResponse {
        families,
        metadata: PopularMetadata {
            total_returned: top.total(),
            limit_per_category: limit,
        },
    })
}
