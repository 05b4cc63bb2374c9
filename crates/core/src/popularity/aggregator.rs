//! Top-N openings per ECO family by games played.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use tracing::debug;

use crate::data::OpeningDataService;
use crate::metrics::POPULARITY_AGGREGATIONS;
use crate::opening::{EcoFamily, Opening};

/// Openings selected for one family, most played first.
#[derive(Debug, Clone)]
pub struct FamilyRanking<'a> {
    pub family: EcoFamily,
    pub openings: Vec<&'a Opening>,
}

/// Result of a per-family aggregation, families in request order.
#[derive(Debug, Clone, Default)]
pub struct FamilyTop<'a> {
    pub families: Vec<FamilyRanking<'a>>,
}

impl<'a> FamilyTop<'a> {
    pub fn get(&self, family: EcoFamily) -> Option<&[&'a Opening]> {
        self.families
            .iter()
            .find(|r| r.family == family)
            .map(|r| r.openings.as_slice())
    }

    /// Number of openings across all families.
    pub fn total(&self) -> usize {
        self.families.iter().map(|r| r.openings.len()).sum()
    }
}

/// Heap entry ordered so that "greater" means "more popular".
struct Ranked<'a> {
    games: u64,
    opening: &'a Opening,
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.games
            .cmp(&other.games)
            // Lower FEN wins ties, so it compares as greater.
            .then_with(|| other.opening.fen.cmp(&self.opening.fen))
    }
}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked<'_> {}

/// Computes "most played per family" views over the loaded collection.
pub struct PopularityAggregator {
    data: Arc<OpeningDataService>,
}

impl PopularityAggregator {
    pub fn new(data: Arc<OpeningDataService>) -> Self {
        Self { data }
    }

    /// Select the `n` openings with the most games analyzed in each of
    /// `families`.
    ///
    /// Ties are broken by FEN ascending. Openings without popularity data are
    /// never selected, so a collection without statistics yields empty lists.
    /// The collection is traversed once regardless of how many families are
    /// requested.
    pub fn top_by_family(&self, n: usize, families: &[EcoFamily]) -> FamilyTop<'_> {
        POPULARITY_AGGREGATIONS.inc();

        let mut requested: Vec<EcoFamily> = Vec::with_capacity(families.len());
        for family in families {
            if !requested.contains(family) {
                requested.push(*family);
            }
        }

        // One bounded min-heap per family slot, indexed by EcoFamily::index.
        let mut heaps: [Option<BinaryHeap<Reverse<Ranked<'_>>>>; 5] = Default::default();
        if n > 0 {
            for family in &requested {
                heaps[family.index()] = Some(BinaryHeap::with_capacity(n + 1));
            }

            for opening in self.data.get_all() {
                let games = opening.games_analyzed();
                if games == 0 {
                    continue;
                }
                let Some(heap) = heaps[opening.family().index()].as_mut() else {
                    continue;
                };
                heap.push(Reverse(Ranked { games, opening }));
                if heap.len() > n {
                    heap.pop();
                }
            }
        }

        let families = requested
            .into_iter()
            .map(|family| {
                let openings = heaps[family.index()]
                    .take()
                    .map(|heap| {
                        // into_sorted_vec is ascending over Reverse, i.e. most popular first.
                        heap.into_sorted_vec()
                            .into_iter()
                            .map(|Reverse(ranked)| ranked.opening)
                            .collect()
                    })
                    .unwrap_or_default();
                FamilyRanking { family, openings }
            })
            .collect::<Vec<_>>();

        let top = FamilyTop { families };
        debug!(n, total = top.total(), "Computed top openings by family");
        top
    }
}
