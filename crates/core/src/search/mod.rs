//! Opening search.
//!
//! A query runs through three passes: a category filter restricts the
//! candidates, a [`SearchIndex`] ranks them, and an [`AdjectiveLexicon`]
//! re-ranks results whose style tags match adjectives in the query.

mod engine;
mod index;
mod lexicon;
mod normalize;
mod types;

pub use engine::SearchEngine;
pub use index::WeightedFuzzyIndex;
pub use lexicon::{AdjectiveLexicon, Boost};
pub use normalize::{normalize, tokens};
pub use types::{IndexHit, SearchFilters, SearchHit, SearchIndex};
