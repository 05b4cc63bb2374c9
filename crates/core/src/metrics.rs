//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - The loaded opening collection
//! - Search (query outcomes, latency, result sizes, adjective boosts)
//! - Popularity aggregation

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Collection
// =============================================================================

/// Openings held in memory.
pub static OPENINGS_LOADED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("explorer_openings_loaded", "Number of openings loaded").unwrap()
});

// =============================================================================
// Search
// =============================================================================

/// Search queries total by outcome.
pub static SEARCH_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("explorer_search_queries_total", "Total search queries"),
        &["outcome"], // "hits", "empty"
    )
    .unwrap()
});

/// Search duration in seconds.
pub static SEARCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "explorer_search_duration_seconds",
            "Duration of the three-pass search pipeline",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &[],
    )
    .unwrap()
});

/// Results per search.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("explorer_search_results", "Number of ranked results per search")
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0]),
        &[],
    )
    .unwrap()
});

/// Results re-ranked by at least one adjective.
pub static ADJECTIVE_BOOSTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "explorer_adjective_boosts_total",
        "Search results boosted by a matching style adjective",
    )
    .unwrap()
});

// =============================================================================
// Popularity
// =============================================================================

/// Per-family top-N aggregations computed.
pub static POPULARITY_AGGREGATIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "explorer_popularity_aggregations_total",
        "Total top-by-family aggregations",
    )
    .unwrap()
});

/// All core collectors, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(OPENINGS_LOADED.clone()),
        Box::new(SEARCH_QUERIES.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        Box::new(ADJECTIVE_BOOSTS.clone()),
        Box::new(POPULARITY_AGGREGATIONS.clone()),
    ]
}
