//! Popularity statistics: derivation of scores and per-family rankings.

mod aggregator;
pub mod scoring;

pub use aggregator::{FamilyRanking, FamilyTop, PopularityAggregator};
