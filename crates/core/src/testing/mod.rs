//! Testing utilities shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use explorer_core::testing::fixtures;
//! use explorer_core::OpeningDataService;
//!
//! let data = OpeningDataService::from_openings(fixtures::sample_collection())?;
//! ```

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    use crate::opening::{
        tokenize_moves, Analysis, Complexity, EcoCode, Opening, Popularity,
    };
    use crate::popularity::scoring::confidence_for_games;

    /// Builder for openings with sensible defaults.
    #[derive(Debug, Clone)]
    pub struct OpeningBuilder {
        opening: Opening,
        analysis: Analysis,
        has_analysis: bool,
        games: Option<u64>,
    }

    impl OpeningBuilder {
        /// Panics if `eco` is malformed.
        pub fn new(fen: &str, eco: &str, name: &str) -> Self {
            let eco: EcoCode = eco.parse().expect("fixture ECO code");
            Self {
                opening: Opening {
                    fen: fen.to_string(),
                    eco,
                    name: name.to_string(),
                    moves: Vec::new(),
                    aliases: BTreeSet::new(),
                    analysis: None,
                    popularity: None,
                    is_root: false,
                },
                analysis: Analysis::default(),
                has_analysis: false,
                games: None,
            }
        }

        pub fn moves(mut self, moves: &str) -> Self {
            self.opening.moves = tokenize_moves(moves);
            self
        }

        pub fn alias(mut self, alias: &str) -> Self {
            self.opening.aliases.insert(alias.to_string());
            self
        }

        pub fn root(mut self) -> Self {
            self.opening.is_root = true;
            self
        }

        pub fn description(mut self, text: &str) -> Self {
            self.analysis.description = Some(text.to_string());
            self.has_analysis = true;
            self
        }

        pub fn style_tags(mut self, tags: &[&str]) -> Self {
            self.analysis.style_tags = tags.iter().map(|t| t.to_string()).collect();
            self.has_analysis = true;
            self
        }

        pub fn complexity(mut self, complexity: Complexity) -> Self {
            self.analysis.complexity = Some(complexity);
            self.has_analysis = true;
            self
        }

        pub fn themes(mut self, themes: &[&str]) -> Self {
            self.analysis.strategic_themes = themes.iter().map(|t| t.to_string()).collect();
            self.has_analysis = true;
            self
        }

        /// Mark the analysis block as produced by the enrichment job.
        pub fn enriched(mut self) -> Self {
            self.analysis.last_enriched_at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).single();
            self.has_analysis = true;
            self
        }

        /// Attach a consistent popularity block for `games` games.
        pub fn games(mut self, games: u64) -> Self {
            self.games = Some(games);
            self
        }

        pub fn build(self) -> Opening {
            let mut opening = self.opening;
            if self.has_analysis {
                opening.analysis = Some(self.analysis);
            }
            opening.popularity = self.games.map(popularity);
            opening
        }
    }

    /// A valid popularity block; the score grows with the order of magnitude.
    pub fn popularity(games: u64) -> Popularity {
        if games == 0 {
            return Popularity {
                games_analyzed: 0,
                white_win_rate: None,
                draw_rate: None,
                black_win_rate: None,
                popularity_score: 0,
                confidence_score: 0.0,
                avg_rating: None,
            };
        }
        let score = ((games as f64).log10().floor() as u8).saturating_add(1).min(10);
        Popularity {
            games_analyzed: games,
            white_win_rate: Some(0.4),
            draw_rate: Some(0.3),
            black_win_rate: Some(0.3),
            popularity_score: score,
            confidence_score: confidence_for_games(games),
            avg_rating: Some(2000.0),
        }
    }

    /// Bare opening without analysis or popularity.
    pub fn opening(fen: &str, eco: &str, name: &str) -> Opening {
        OpeningBuilder::new(fen, eco, name).build()
    }

    /// Two Sicilians: `f1` (B20, aggressive, 1000 games) and `f2` (B70,
    /// attacking, 500 games).
    pub fn sicilian_pair() -> Vec<Opening> {
        vec![
            OpeningBuilder::new("f1", "B20", "Sicilian Defense")
                .style_tags(&["aggressive"])
                .games(1000)
                .build(),
            OpeningBuilder::new("f2", "B70", "Sicilian Defense Dragon")
                .style_tags(&["attacking"])
                .games(500)
                .build(),
        ]
    }

    /// A small collection spanning all five families with unique names.
    pub fn sample_collection() -> Vec<Opening> {
        vec![
            OpeningBuilder::new("english", "A10", "English Opening")
                .moves("1. c4")
                .style_tags(&["flexible", "positional"])
                .description("White controls d5 from the wing.")
                .complexity(Complexity::Intermediate)
                .games(400)
                .root()
                .enriched()
                .build(),
            OpeningBuilder::new("sicilian", "B20", "Sicilian Defense")
                .moves("1. e4 c5")
                .style_tags(&["aggressive", "sharp"])
                .description("Black fights for the center from the flank.")
                .themes(&["Open c-file", "Queenside counterplay"])
                .complexity(Complexity::Advanced)
                .games(1500)
                .root()
                .enriched()
                .build(),
            OpeningBuilder::new("sicilian-dragon", "B70", "Sicilian Defense: Dragon Variation")
                .moves("1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 g6")
                .style_tags(&["sharp", "attacking"])
                .description("Opposite side castling leads to races.")
                .games(600)
                .build(),
            OpeningBuilder::new("caro-kann", "B12", "Caro-Kann Defense")
                .moves("1. e4 c6")
                .style_tags(&["solid"])
                .description("A sturdy pawn chain supports d5.")
                .complexity(Complexity::Beginner)
                .games(800)
                .root()
                .build(),
            OpeningBuilder::new("ruy-lopez", "C60", "Ruy Lopez")
                .moves("1. e4 e5 2. Nf3 Nc6 3. Bb5")
                .alias("Spanish Game")
                .style_tags(&["classical", "positional"])
                .games(1200)
                .root()
                .enriched()
                .build(),
            OpeningBuilder::new("italian", "C50", "Italian Game")
                .moves("1. e4 e5 2. Nf3 Nc6 3. Bc4")
                .style_tags(&["open"])
                .games(900)
                .root()
                .build(),
            OpeningBuilder::new("qgd", "D30", "Queen's Gambit Declined")
                .moves("1. d4 d5 2. c4 e6")
                .style_tags(&["solid", "classical"])
                .games(1000)
                .root()
                .build(),
            OpeningBuilder::new("nimzo", "E20", "Nimzo-Indian Defense")
                .moves("1. d4 Nf6 2. c4 e6 3. Nc3 Bb4")
                .style_tags(&["hypermodern", "positional"])
                .games(700)
                .root()
                .build(),
            OpeningBuilder::new("kings-indian", "E60", "King's Indian Defense")
                .moves("1. d4 Nf6 2. c4 g6")
                .style_tags(&["dynamic", "attacking"])
                .games(650)
                .root()
                .build(),
        ]
    }
}
