//! Types for the opening search system.

use serde::Serialize;
use tracing::warn;

use crate::opening::{EcoFamily, Opening};

/// Optional restrictions applied before fuzzy ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilters {
    /// ECO families to keep; empty means no restriction.
    pub categories: Vec<EcoFamily>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: impl IntoIterator<Item = EcoFamily>) -> Self {
        let mut filters = Self::new();
        for family in categories {
            if !filters.categories.contains(&family) {
                filters.categories.push(family);
            }
        }
        filters
    }

    /// Parse category codes leniently. Unrecognized codes are dropped (and
    /// logged); if none survive, the filter does not restrict anything.
    pub fn from_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut valid = Vec::new();
        for code in codes {
            if code.trim().is_empty() {
                continue;
            }
            match EcoFamily::parse_lenient(code) {
                Some(family) => valid.push(family),
                None => warn!(code = %code.trim(), "Ignoring unknown ECO category"),
            }
        }
        Self::with_categories(valid)
    }

    /// Parse a comma-separated list such as `"B, c,x"`.
    pub fn parse(categories: &str) -> Self {
        Self::from_codes(categories.split(','))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn admits(&self, opening: &Opening) -> bool {
        self.is_unrestricted() || self.categories.contains(&opening.family())
    }
}

/// A record matched by a [`SearchIndex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    /// Position in the data service's collection.
    pub position: usize,
    /// 0.0 is a perfect match, 1.0 the worst admissible.
    pub score: f64,
}

/// Capability interface for the fuzzy matching pass.
///
/// Implementations index the collection once and rank any subset of it.
pub trait SearchIndex: Send + Sync {
    /// Implementation name for logging.
    fn name(&self) -> &str;

    /// Rank `candidates` (collection positions, in collection order) against
    /// `query`.
    ///
    /// Returns matching positions ordered by ascending score; equal scores
    /// keep candidate order. An empty query yields no hits.
    fn search(&self, query: &str, candidates: &[usize]) -> Vec<IndexHit>;

    /// Like [`search`](Self::search), but `skipped` terms do not count
    /// towards term scoring. They still take part in whole-phrase matches.
    /// If every term is skipped, all of them are scored.
    ///
    /// The default ignores `skipped`.
    fn search_skipping(
        &self,
        query: &str,
        skipped: &[String],
        candidates: &[usize],
    ) -> Vec<IndexHit> {
        let _ = skipped;
        self.search(query, candidates)
    }
}

/// A ranked search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub opening: &'a Opening,
    pub position: usize,
    /// Score from the fuzzy pass.
    pub base_score: f64,
    /// Score after adjective boosts; results are ordered by this.
    pub score: f64,
    /// Query adjectives found in the opening's style tags.
    pub matched_adjectives: Vec<String>,
}
