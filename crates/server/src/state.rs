use std::sync::Arc;

use explorer_core::{
    Config, OpeningDataService, PopularityAggregator, PopularityConfig, SearchConfig,
    SearchEngine,
};

/// Shared application state.
///
/// Only constructible from a loaded [`OpeningDataService`], so a router built
/// from it never serves a partially loaded collection.
pub struct AppState {
    config: Config,
    data: Arc<OpeningDataService>,
    engine: SearchEngine,
    aggregator: PopularityAggregator,
}

impl AppState {
    pub fn new(config: Config, data: Arc<OpeningDataService>) -> Self {
        let engine = SearchEngine::from_config(Arc::clone(&data), &config.search);
        let aggregator = PopularityAggregator::new(Arc::clone(&data));
        Self {
            config,
            data,
            engine,
            aggregator,
        }
    }

    pub fn data(&self) -> &OpeningDataService {
        &self.data
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    pub fn aggregator(&self) -> &PopularityAggregator {
        &self.aggregator
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.config.search
    }

    pub fn popularity_config(&self) -> &PopularityConfig {
        &self.config.popularity
    }
}
