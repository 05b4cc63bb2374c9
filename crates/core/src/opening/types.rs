//! Types for opening records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::eco::{EcoCode, EcoFamily};

/// Tolerance when checking that win/draw/loss rates sum to 1.
pub const RATE_SUM_TOLERANCE: f64 = 0.01;

/// Highest popularity score.
pub const MAX_POPULARITY_SCORE: u8 = 10;

/// One chess position/variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    /// Unique identifier (board, side to move, castling and en-passant state).
    pub fen: String,
    pub eco: EcoCode,
    pub name: String,
    /// SAN move tokens, without move numbers.
    pub moves: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<Popularity>,
    /// Mainline rather than sub-variation.
    #[serde(default)]
    pub is_root: bool,
}

/// LLM-generated description block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub style_tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(default)]
    pub strategic_themes: Vec<String>,
    #[serde(default)]
    pub common_plans: CommonPlans,
    /// Set by the enrichment job when the block was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_enriched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    #[serde(alias = "beginner", alias = "BEGINNER")]
    Beginner,
    #[serde(alias = "intermediate", alias = "INTERMEDIATE")]
    Intermediate,
    #[serde(alias = "advanced", alias = "ADVANCED")]
    Advanced,
}

/// Typical plans for each side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonPlans {
    #[serde(default)]
    pub white: Vec<String>,
    #[serde(default)]
    pub black: Vec<String>,
}

/// Game statistics for a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Popularity {
    pub games_analyzed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_win_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black_win_rate: Option<f64>,
    /// 1-10 decile rank, 0 when there is no data.
    pub popularity_score: u8,
    /// 0-1, discretized from `games_analyzed`.
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
}

impl Popularity {
    /// Check the block's internal consistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.popularity_score > MAX_POPULARITY_SCORE {
            return Err(format!(
                "popularity score {} exceeds {}",
                self.popularity_score, MAX_POPULARITY_SCORE
            ));
        }
        if self.popularity_score == 0 && self.games_analyzed > 0 {
            return Err(format!(
                "popularity score 0 with {} games analyzed",
                self.games_analyzed
            ));
        }
        if self.popularity_score > 0 && self.games_analyzed == 0 {
            return Err(format!(
                "popularity score {} with no games analyzed",
                self.popularity_score
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(format!(
                "confidence score {} outside [0, 1]",
                self.confidence_score
            ));
        }

        match (self.white_win_rate, self.draw_rate, self.black_win_rate) {
            (None, None, None) => {}
            (Some(w), Some(d), Some(b)) => {
                for rate in [w, d, b] {
                    if !(0.0..=1.0).contains(&rate) {
                        return Err(format!("rate {} outside [0, 1]", rate));
                    }
                }
                let sum = w + d + b;
                if (sum - 1.0).abs() > RATE_SUM_TOLERANCE {
                    return Err(format!("win/draw/loss rates sum to {:.4}, expected 1.0", sum));
                }
            }
            _ => return Err("win/draw/loss rates must be all present or all absent".to_string()),
        }

        Ok(())
    }
}

impl Opening {
    pub fn family(&self) -> EcoFamily {
        self.eco.family()
    }

    /// Games analyzed, 0 when there is no popularity block.
    pub fn games_analyzed(&self) -> u64 {
        self.popularity.as_ref().map_or(0, |p| p.games_analyzed)
    }

    pub fn style_tags(&self) -> impl Iterator<Item = &str> {
        self.analysis
            .iter()
            .flat_map(|a| a.style_tags.iter().map(String::as_str))
    }

    pub fn description(&self) -> Option<&str> {
        self.analysis.as_ref().and_then(|a| a.description.as_deref())
    }

    pub fn is_enriched(&self) -> bool {
        self.analysis
            .as_ref()
            .is_some_and(|a| a.last_enriched_at.is_some())
    }

    pub fn has_popularity(&self) -> bool {
        self.games_analyzed() > 0
    }

    /// Check the record against the invariants every loaded opening must hold.
    pub fn validate(&self) -> Result<(), String> {
        if self.fen.trim().is_empty() {
            return Err("empty FEN".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("empty name".to_string());
        }
        if let Some(popularity) = &self.popularity {
            popularity.validate()?;
        }
        Ok(())
    }

    pub fn summary(&self) -> OpeningSummary {
        OpeningSummary::from(self)
    }
}

/// Compact view of an opening for list responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningSummary {
    pub fen: String,
    pub eco: String,
    pub name: String,
    pub moves: String,
    pub is_root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub style_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    pub games_analyzed: u64,
    pub popularity_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_win_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_win_rate: Option<f64>,
}

impl From<&Opening> for OpeningSummary {
    fn from(opening: &Opening) -> Self {
        let popularity = opening.popularity.as_ref();
        Self {
            fen: opening.fen.clone(),
            eco: opening.eco.to_string(),
            name: opening.name.clone(),
            moves: opening.moves.join(" "),
            is_root: opening.is_root,
            description: opening.description().map(str::to_string),
            style_tags: opening.style_tags().map(str::to_string).collect(),
            complexity: opening.analysis.as_ref().and_then(|a| a.complexity),
            games_analyzed: opening.games_analyzed(),
            popularity_score: popularity.map_or(0, |p| p.popularity_score),
            white_win_rate: popularity.and_then(|p| p.white_win_rate),
            draw_rate: popularity.and_then(|p| p.draw_rate),
            black_win_rate: popularity.and_then(|p| p.black_win_rate),
        }
    }
}
