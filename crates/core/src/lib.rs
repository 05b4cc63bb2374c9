pub mod config;
pub mod data;
pub mod metrics;
pub mod opening;
pub mod popularity;
pub mod search;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DataConfig,
    FieldWeight, LexiconConfig, PopularityConfig, SearchConfig, SearchField, ServerConfig,
};
pub use data::{DataError, EnrichmentStatus, FamilyStatus, OpeningDataService};
pub use opening::{EcoCode, EcoFamily, Opening, OpeningSummary, Popularity};
pub use popularity::{FamilyRanking, FamilyTop, PopularityAggregator};
pub use search::{
    AdjectiveLexicon, IndexHit, SearchEngine, SearchFilters, SearchHit, SearchIndex,
    WeightedFuzzyIndex,
};
