//! On-disk record formats and their conversion into [`Opening`]s.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::opening::{tokenize_moves, Analysis, CommonPlans, Complexity, EcoCode, Opening, Popularity};
use crate::popularity::scoring::confidence_for_games;

/// A partition file: FEN -> record.
pub type RawPartition = BTreeMap<String, RawOpening>;

/// A popularity stats file: FEN -> stats.
pub type RawPopularityFile = BTreeMap<String, RawPopularity>;

/// Moves as a PGN-style string or as a list of SAN tokens.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawMoves {
    Text(String),
    Tokens(Vec<String>),
}

/// Aliases keyed by source (`{"scid": "..."}`) or as a plain list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAliases {
    BySource(BTreeMap<String, String>),
    List(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOpening {
    pub eco: String,
    pub name: String,
    #[serde(default)]
    pub moves: Option<RawMoves>,
    #[serde(default)]
    pub aliases: Option<RawAliases>,
    #[serde(default, alias = "isEcoRoot", alias = "is_root", alias = "isRoot")]
    pub is_eco_root: bool,
    #[serde(default, alias = "analysis_json")]
    pub analysis: Option<RawAnalysis>,
    #[serde(default)]
    pub popularity: Option<RawPopularity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "styleTags")]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub complexity: Option<Complexity>,
    #[serde(default, alias = "strategicThemes")]
    pub strategic_themes: Vec<String>,
    #[serde(default, alias = "commonPlans")]
    pub common_plans: Option<CommonPlans>,
    #[serde(default, alias = "lastEnrichedAt")]
    pub last_enriched_at: Option<DateTime<Utc>>,
}

/// Popularity stats, either inline or from the stats file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPopularity {
    #[serde(default, alias = "gamesAnalyzed")]
    pub games_analyzed: u64,
    #[serde(default, alias = "whiteWins")]
    pub white_wins: Option<u64>,
    #[serde(default)]
    pub draws: Option<u64>,
    #[serde(default, alias = "blackWins")]
    pub black_wins: Option<u64>,
    #[serde(default, alias = "whiteWinRate")]
    pub white_win_rate: Option<f64>,
    #[serde(default, alias = "drawRate")]
    pub draw_rate: Option<f64>,
    #[serde(default, alias = "blackWinRate")]
    pub black_win_rate: Option<f64>,
    #[serde(default, alias = "popularityScore")]
    pub popularity_score: Option<u8>,
    #[serde(default, alias = "confidenceScore")]
    pub confidence_score: Option<f64>,
    #[serde(default, alias = "avgRating")]
    pub avg_rating: Option<f64>,
}

impl RawOpening {
    /// Convert into an [`Opening`]; the popularity score may still be unset
    /// (returned separately) and is filled in once the whole collection is known.
    pub fn into_opening(self, fen: String) -> Result<(Opening, bool), String> {
        let eco: EcoCode = self.eco.trim().parse().map_err(|e| format!("{e}"))?;

        let moves = match self.moves {
            Some(RawMoves::Text(text)) => tokenize_moves(&text),
            Some(RawMoves::Tokens(tokens)) => tokens
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            None => Vec::new(),
        };

        let aliases: BTreeSet<String> = match self.aliases {
            Some(RawAliases::BySource(map)) => map.into_values().collect(),
            Some(RawAliases::List(list)) => list.into_iter().collect(),
            None => BTreeSet::new(),
        }
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

        let analysis = self.analysis.map(RawAnalysis::into_analysis);

        let (popularity, needs_score) = match self.popularity {
            Some(raw) => {
                let (p, needs_score) = raw.into_popularity()?;
                (Some(p), needs_score)
            }
            None => (None, false),
        };

        let opening = Opening {
            fen,
            eco,
            name: self.name.trim().to_string(),
            moves,
            aliases,
            analysis,
            popularity,
            is_root: self.is_eco_root,
        };
        Ok((opening, needs_score))
    }
}

impl RawAnalysis {
    fn into_analysis(self) -> Analysis {
        Analysis {
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            style_tags: self
                .style_tags
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            complexity: self.complexity,
            strategic_themes: self.strategic_themes,
            common_plans: self.common_plans.unwrap_or_default(),
            last_enriched_at: self.last_enriched_at,
        }
    }
}

impl RawPopularity {
    /// Normalize into a [`Popularity`] block.
    ///
    /// Rates are derived from win/draw/loss counts when not given, and the
    /// confidence is discretized from the game count when absent. The bool is
    /// true when the popularity score still has to be assigned.
    pub fn into_popularity(self) -> Result<(Popularity, bool), String> {
        let games = self.games_analyzed;

        let (white_win_rate, draw_rate, black_win_rate) = if games == 0 {
            (None, None, None)
        } else {
            match (self.white_win_rate, self.draw_rate, self.black_win_rate) {
                (Some(w), Some(d), Some(b)) => (Some(w), Some(d), Some(b)),
                _ => match (self.white_wins, self.draws, self.black_wins) {
                    (Some(w), Some(d), Some(b)) => {
                        let total = w + d + b;
                        if total != games {
                            return Err(format!(
                                "win/draw/loss counts sum to {} but {} games were analyzed",
                                total, games
                            ));
                        }
                        let g = games as f64;
                        (Some(w as f64 / g), Some(d as f64 / g), Some(b as f64 / g))
                    }
                    _ => (None, None, None),
                },
            }
        };

        let needs_score = self.popularity_score.is_none() && games > 0;
        let popularity = Popularity {
            games_analyzed: games,
            white_win_rate,
            draw_rate,
            black_win_rate,
            popularity_score: self.popularity_score.unwrap_or(0),
            confidence_score: self
                .confidence_score
                .unwrap_or_else(|| confidence_for_games(games)),
            avg_rating: self.avg_rating,
        };
        Ok((popularity, needs_score))
    }
}
