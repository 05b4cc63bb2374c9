//! Opening data service.
//!
//! Loads the ECO partition files once at startup into an immutable snapshot
//! shared by the search engine and the popularity aggregator.

mod raw;
mod service;
mod status;

pub use raw::{RawAliases, RawAnalysis, RawMoves, RawOpening, RawPartition, RawPopularity};
pub use service::OpeningDataService;
pub use status::{EnrichmentStatus, FamilyStatus};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent the collection from loading.
///
/// Every variant is fatal: the service never starts on partial data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Data file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid record {fen}: {reason}")]
    InvalidRecord { fen: String, reason: String },

    #[error("Duplicate FEN {0}")]
    DuplicateFen(String),

    #[error("Failed to fingerprint collection: {0}")]
    Fingerprint(#[source] serde_json::Error),
}
