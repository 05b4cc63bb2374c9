use serde::Serialize;

use crate::opening::{EcoFamily, Opening};

/// Per-family counts of loaded, enriched and popularity-backed openings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyStatus {
    pub family: EcoFamily,
    pub openings: usize,
    pub enriched: usize,
    pub with_popularity: usize,
}

/// Collection-wide enrichment summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentStatus {
    pub families: Vec<FamilyStatus>,
    pub total_openings: usize,
    pub total_enriched: usize,
    pub total_with_popularity: usize,
}

impl EnrichmentStatus {
    pub(crate) fn compute(openings: &[Opening]) -> Self {
        let mut per_family: Vec<FamilyStatus> = EcoFamily::ALL
            .iter()
            .map(|&family| FamilyStatus {
                family,
                openings: 0,
                enriched: 0,
                with_popularity: 0,
            })
            .collect();

        for opening in openings {
            let status = &mut per_family[opening.family().index()];
            status.openings += 1;
            if opening.is_enriched() {
                status.enriched += 1;
            }
            if opening.has_popularity() {
                status.with_popularity += 1;
            }
        }

        Self {
            total_openings: per_family.iter().map(|s| s.openings).sum(),
            total_enriched: per_family.iter().map(|s| s.enriched).sum(),
            total_with_popularity: per_family.iter().map(|s| s.with_popularity).sum(),
            families: per_family,
        }
    }

    /// Percentage of openings carrying an enrichment block.
    pub fn enriched_percent(&self) -> f64 {
        if self.total_openings == 0 {
            0.0
        } else {
            self.total_enriched as f64 * 100.0 / self.total_openings as f64
        }
    }
}
