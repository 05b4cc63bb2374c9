use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::raw::{RawPartition, RawPopularityFile};
use super::status::EnrichmentStatus;
use super::DataError;
use crate::config::DataConfig;
use crate::metrics::OPENINGS_LOADED;
use crate::opening::Opening;
use crate::popularity::scoring::{decile_thresholds, score_for_games};

/// Immutable, validated snapshot of every opening.
///
/// Built once by [`OpeningDataService::initialize`] (or
/// [`OpeningDataService::from_openings`]) and never mutated afterwards, so it
/// can be shared across request handlers behind an `Arc` without locking.
#[derive(Debug)]
pub struct OpeningDataService {
    openings: Vec<Opening>,
    by_fen: HashMap<String, usize>,
    status: EnrichmentStatus,
    fingerprint: String,
}

impl OpeningDataService {
    /// Load every configured partition (plus the optional popularity file).
    ///
    /// Fails on the first missing file, unreadable file, malformed record or
    /// duplicate FEN.
    pub fn initialize(config: &DataConfig) -> Result<Self, DataError> {
        let mut hasher = Sha256::new();
        let mut openings: Vec<Opening> = Vec::new();
        let mut needs_score: Vec<bool> = Vec::new();

        for &family in &config.families {
            let path = config.partition_path(family);
            let bytes = read_file(&path)?;
            hasher.update(&bytes);

            let partition: RawPartition =
                serde_json::from_slice(&bytes).map_err(|source| DataError::Parse {
                    path: path.clone(),
                    source,
                })?;

            let mut loaded = Vec::with_capacity(partition.len());
            for (fen, raw) in partition {
                let fen = fen.trim().to_string();
                let (opening, missing_score) = raw
                    .into_opening(fen.clone())
                    .map_err(|reason| DataError::InvalidRecord { fen, reason })?;
                if opening.family() != family {
                    warn!(
                        fen = %opening.fen,
                        eco = %opening.eco,
                        partition = %family,
                        "Opening filed under a different ECO family"
                    );
                }
                loaded.push((opening, missing_score));
            }

            loaded.sort_by(|(a, _), (b, _)| a.eco.cmp(&b.eco).then_with(|| a.fen.cmp(&b.fen)));
            debug!(
                family = %family,
                path = %path.display(),
                count = loaded.len(),
                "Loaded partition"
            );

            for (opening, missing_score) in loaded {
                openings.push(opening);
                needs_score.push(missing_score);
            }
        }

        if let Some(path) = config.popularity_path() {
            let bytes = read_file(&path)?;
            hasher.update(&bytes);
            let stats: RawPopularityFile =
                serde_json::from_slice(&bytes).map_err(|source| DataError::Parse {
                    path: path.clone(),
                    source,
                })?;
            apply_popularity_file(&mut openings, &mut needs_score, stats)?;
        }

        let fingerprint = format!("{:x}", hasher.finalize());
        let service = Self::build(openings, &needs_score, fingerprint)?;

        info!(
            openings = service.len(),
            enriched = service.status.total_enriched,
            with_popularity = service.status.total_with_popularity,
            fingerprint = %&service.fingerprint[..16],
            "Opening collection loaded"
        );
        Ok(service)
    }

    /// Build a snapshot from in-memory records, with the same validation as
    /// [`initialize`](Self::initialize). Collection order is the given order.
    pub fn from_openings(openings: Vec<Opening>) -> Result<Self, DataError> {
        let bytes = serde_json::to_vec(&openings).map_err(DataError::Fingerprint)?;
        let fingerprint = format!("{:x}", Sha256::digest(&bytes));
        let needs_score = vec![false; openings.len()];
        Self::build(openings, &needs_score, fingerprint)
    }

    fn build(
        mut openings: Vec<Opening>,
        needs_score: &[bool],
        fingerprint: String,
    ) -> Result<Self, DataError> {
        if needs_score.iter().any(|&n| n) {
            let thresholds = decile_thresholds(openings.iter().map(Opening::games_analyzed));
            for (opening, &needs) in openings.iter_mut().zip(needs_score) {
                if !needs {
                    continue;
                }
                if let Some(popularity) = opening.popularity.as_mut() {
                    popularity.popularity_score =
                        score_for_games(popularity.games_analyzed, &thresholds);
                }
            }
        }

        let mut by_fen = HashMap::with_capacity(openings.len());
        for (position, opening) in openings.iter().enumerate() {
            opening
                .validate()
                .map_err(|reason| DataError::InvalidRecord {
                    fen: opening.fen.clone(),
                    reason,
                })?;
            if by_fen.insert(opening.fen.clone(), position).is_some() {
                return Err(DataError::DuplicateFen(opening.fen.clone()));
            }
        }

        let status = EnrichmentStatus::compute(&openings);
        OPENINGS_LOADED.set(openings.len() as i64);

        Ok(Self {
            openings,
            by_fen,
            status,
            fingerprint,
        })
    }

    /// Every opening, in collection order.
    pub fn get_all(&self) -> &[Opening] {
        &self.openings
    }

    /// O(1) lookup by FEN; `None` when absent.
    pub fn get_by_fen(&self, fen: &str) -> Option<&Opening> {
        self.by_fen.get(fen).map(|&i| &self.openings[i])
    }

    /// Opening at a collection position.
    pub fn get(&self, position: usize) -> Option<&Opening> {
        self.openings.get(position)
    }

    pub fn len(&self) -> usize {
        self.openings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    pub fn enrichment_status(&self) -> &EnrichmentStatus {
        &self.status
    }

    /// SHA-256 (hex) of the loaded data files.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, DataError> {
    if !path.exists() {
        return Err(DataError::MissingFile(path.to_path_buf()));
    }
    std::fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_popularity_file(
    openings: &mut [Opening],
    needs_score: &mut [bool],
    stats: RawPopularityFile,
) -> Result<(), DataError> {
    let positions: HashMap<&str, usize> = openings
        .iter()
        .enumerate()
        .map(|(i, o)| (o.fen.as_str(), i))
        .collect();

    let mut updates = Vec::with_capacity(stats.len());
    let mut unknown = 0usize;
    for (fen, raw) in stats {
        let Some(&position) = positions.get(fen.trim()) else {
            unknown += 1;
            continue;
        };
        let (popularity, missing_score) = raw
            .into_popularity()
            .map_err(|reason| DataError::InvalidRecord { fen, reason })?;
        updates.push((position, popularity, missing_score));
    }
    drop(positions);

    let applied = updates.len();
    for (position, popularity, missing_score) in updates {
        openings[position].popularity = Some(popularity);
        needs_score[position] = missing_score;
    }

    debug!(applied, unknown, "Applied popularity stats");
    Ok(())
}
