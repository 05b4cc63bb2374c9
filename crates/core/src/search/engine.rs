//! Three-pass search: category filter, fuzzy match, adjective re-rank.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::index::WeightedFuzzyIndex;
use super::lexicon::AdjectiveLexicon;
use super::normalize::tokens;
use super::types::{IndexHit, SearchFilters, SearchHit, SearchIndex};
use crate::config::SearchConfig;
use crate::data::OpeningDataService;
use crate::metrics;

/// Runs queries against the immutable opening collection.
pub struct SearchEngine {
    data: Arc<OpeningDataService>,
    index: Box<dyn SearchIndex>,
    lexicon: AdjectiveLexicon,
}

impl SearchEngine {
    pub fn new(
        data: Arc<OpeningDataService>,
        index: Box<dyn SearchIndex>,
        lexicon: AdjectiveLexicon,
    ) -> Self {
        Self {
            data,
            index,
            lexicon,
        }
    }

    /// Build the default weighted fuzzy index over `data`.
    pub fn from_config(data: Arc<OpeningDataService>, config: &SearchConfig) -> Self {
        let index = WeightedFuzzyIndex::build(data.get_all(), config);
        let lexicon = AdjectiveLexicon::from_config(&config.lexicon);
        Self::new(data, Box::new(index), lexicon)
    }

    pub fn data(&self) -> &Arc<OpeningDataService> {
        &self.data
    }

    pub fn index_name(&self) -> &str {
        self.index.name()
    }

    pub fn lexicon(&self) -> &AdjectiveLexicon {
        &self.lexicon
    }

    /// Rank openings for `query` within `filters`.
    ///
    /// The output depends only on the arguments and the collection. A blank
    /// query with categories lists every opening in those families in
    /// collection order with score 0; a blank query without categories
    /// returns nothing.
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Vec<SearchHit<'_>> {
        let started = Instant::now();
        let openings = self.data.get_all();

        // Pass 1: restrict, never reorder.
        let candidates: Vec<usize> = openings
            .iter()
            .enumerate()
            .filter(|(_, opening)| filters.admits(opening))
            .map(|(position, _)| position)
            .collect();

        let terms = tokens(query);
        let adjectives = self.lexicon.adjectives_in(&terms);

        // Pass 2: base ranking. Query adjectives only count in pass 3.
        let base: Vec<IndexHit> = if terms.is_empty() {
            if filters.is_unrestricted() {
                Vec::new()
            } else {
                candidates
                    .iter()
                    .map(|&position| IndexHit {
                        position,
                        score: 0.0,
                    })
                    .collect()
            }
        } else {
            self.index.search_skipping(query, &adjectives, &candidates)
        };

        // Pass 3: adjective boosts.
        let mut boosted = 0u64;
        let mut hits: Vec<SearchHit<'_>> = base
            .into_iter()
            .filter_map(|hit| {
                let opening = openings.get(hit.position)?;
                let boost = self.lexicon.boost_for(opening, &adjectives);
                if !boost.adjectives.is_empty() {
                    boosted += 1;
                }
                Some(SearchHit {
                    opening,
                    position: hit.position,
                    base_score: hit.score,
                    score: (hit.score - boost.amount).max(0.0),
                    matched_adjectives: boost.adjectives,
                })
            })
            .collect();

        if boosted > 0 {
            // Equal adjusted scores fall back to the fuzzy order; results the
            // fuzzy pass could not separate go to the one matching more
            // adjectives. The sort is stable, so anything left keeps its
            // position.
            hits.sort_by(|a, b| {
                a.score
                    .total_cmp(&b.score)
                    .then(a.base_score.total_cmp(&b.base_score))
                    .then(b.matched_adjectives.len().cmp(&a.matched_adjectives.len()))
            });
            metrics::ADJECTIVE_BOOSTS.inc_by(boosted);
        }

        let outcome = if hits.is_empty() { "empty" } else { "hits" };
        metrics::SEARCH_QUERIES.with_label_values(&[outcome]).inc();
        metrics::SEARCH_RESULTS
            .with_label_values(&[])
            .observe(hits.len() as f64);
        metrics::SEARCH_DURATION
            .with_label_values(&[])
            .observe(started.elapsed().as_secs_f64());

        debug!(
            query = %query,
            categories = ?filters.categories,
            candidates = candidates.len(),
            adjectives = ?adjectives,
            results = hits.len(),
            "Search completed"
        );

        hits
    }
}
