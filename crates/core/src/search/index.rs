//! Weighted multi-field fuzzy index.
//!
//! Scores each query term against the tokens of every configured field using
//! normalized Levenshtein distance (exact, prefix and substring hits score
//! better than plain edits), then averages the per-term scores.

use tracing::debug;

use super::normalize::{normalize, tokens};
use super::types::{IndexHit, SearchIndex};
use crate::config::{FieldWeight, SearchConfig, SearchField};
use crate::opening::Opening;

/// Penalty scale for a query term that is a prefix of a token.
const PREFIX_PENALTY: f64 = 0.2;
/// Penalty scale for a query term found inside a token.
const SUBSTRING_PENALTY: f64 = 0.3;
/// How much a hit in the lightest field is worse than in the heaviest one.
const FIELD_WEIGHT_PENALTY: f64 = 0.5;
/// Penalty scale for name tokens the query did not mention.
const NAME_EXCESS_PENALTY: f64 = 0.05;
/// Best score reachable without an exact phrase match on the name.
const NON_PHRASE_FLOOR: f64 = 0.001;
/// Score for a query equal to one of the opening's aliases.
const ALIAS_PHRASE_SCORE: f64 = 0.0005;

/// Tokens of one field of one opening.
#[derive(Debug)]
struct FieldTokens {
    /// Index into `WeightedFuzzyIndex::fields`.
    field: usize,
    tokens: Vec<String>,
}

#[derive(Debug)]
struct IndexedOpening {
    name_phrase: String,
    name_tokens: Vec<String>,
    alias_phrases: Vec<String>,
    fields: Vec<FieldTokens>,
}

/// A configured field with its precomputed weight penalty.
#[derive(Debug)]
struct WeightedField {
    field: SearchField,
    /// Added (scaled by the remaining distance) to hits in this field.
    penalty: f64,
}

/// Default [`SearchIndex`] implementation.
#[derive(Debug)]
pub struct WeightedFuzzyIndex {
    fields: Vec<WeightedField>,
    threshold: f64,
    min_match_len: usize,
    has_name_field: bool,
    records: Vec<IndexedOpening>,
}

impl WeightedFuzzyIndex {
    /// Index `openings` (positions are slice indices).
    pub fn build(openings: &[Opening], config: &SearchConfig) -> Self {
        let max_weight = config
            .fields
            .iter()
            .map(|fw| fw.weight)
            .fold(0.0_f64, f64::max);

        let mut fields: Vec<WeightedField> = Vec::new();
        for FieldWeight { field, weight } in &config.fields {
            if *weight <= 0.0 || fields.iter().any(|f| f.field == *field) {
                continue;
            }
            fields.push(WeightedField {
                field: *field,
                penalty: FIELD_WEIGHT_PENALTY * (1.0 - weight / max_weight),
            });
        }

        let records = openings
            .iter()
            .map(|opening| IndexedOpening {
                name_phrase: normalize(&opening.name),
                name_tokens: tokens(&opening.name),
                alias_phrases: opening.aliases.iter().map(|a| normalize(a)).collect(),
                fields: fields
                    .iter()
                    .enumerate()
                    .map(|(i, wf)| FieldTokens {
                        field: i,
                        tokens: field_tokens(opening, wf.field),
                    })
                    .filter(|ft| !ft.tokens.is_empty())
                    .collect(),
            })
            .collect::<Vec<_>>();

        debug!(
            records = records.len(),
            fields = ?fields.iter().map(|f| f.field.as_str()).collect::<Vec<_>>(),
            "Built fuzzy index"
        );

        Self {
            has_name_field: fields.iter().any(|f| f.field == SearchField::Name),
            fields,
            threshold: config.threshold,
            min_match_len: config.min_match_len,
            records,
        }
    }

    /// Raw distance between a query term and a field token, `None` when the
    /// pair cannot be within the threshold.
    fn token_distance(&self, term: &str, token: &str, fuzzy: bool) -> Option<f64> {
        if term == token {
            return Some(0.0);
        }
        if !fuzzy {
            return None;
        }

        let term_len = term.chars().count();
        let token_len = token.chars().count();
        if token_len > term_len {
            let coverage = term_len as f64 / token_len as f64;
            if token.starts_with(term) {
                return Some(PREFIX_PENALTY * (1.0 - coverage));
            }
            if token.contains(term) {
                return Some(SUBSTRING_PENALTY * (1.0 - coverage));
            }
        }

        let longest = term_len.max(token_len) as f64;
        if term_len.abs_diff(token_len) as f64 / longest > self.threshold {
            return None;
        }
        Some(1.0 - strsim::normalized_levenshtein(term, token))
    }

    /// Best weighted score of `term` across the record's fields, `None` on a
    /// miss.
    fn term_score(&self, record: &IndexedOpening, term: &str) -> Option<f64> {
        let fuzzy = term.chars().count() >= self.min_match_len;
        let mut best: Option<f64> = None;

        for ft in &record.fields {
            let raw = ft
                .tokens
                .iter()
                .filter_map(|token| self.token_distance(term, token, fuzzy))
                .fold(f64::INFINITY, f64::min);
            if raw > self.threshold {
                continue;
            }
            let weighted = raw + (1.0 - raw) * self.fields[ft.field].penalty;
            best = Some(best.map_or(weighted, |b| b.min(weighted)));
        }

        best
    }

    /// `scored` is the subset of `terms` that is matched against fields;
    /// name tokens are compared to every term.
    fn score_record(
        &self,
        record: &IndexedOpening,
        phrase: &str,
        terms: &[String],
        scored: &[&String],
    ) -> Option<f64> {
        if record.name_phrase == phrase {
            return Some(0.0);
        }
        if record.alias_phrases.iter().any(|a| a == phrase) {
            return Some(ALIAS_PHRASE_SCORE);
        }

        let mut hits = 0usize;
        let mut total = 0.0;
        for term in scored {
            match self.term_score(record, term) {
                Some(score) => {
                    hits += 1;
                    total += score;
                }
                None => total += 1.0,
            }
        }
        if hits == 0 {
            return None;
        }

        let mut score = total / scored.len() as f64;
        if self.has_name_field && !record.name_tokens.is_empty() {
            let unmatched = record
                .name_tokens
                .iter()
                .filter(|t| !terms.contains(*t))
                .count();
            score += NAME_EXCESS_PENALTY * unmatched as f64 / record.name_tokens.len() as f64;
        }
        Some(score.clamp(NON_PHRASE_FLOOR, 1.0))
    }
}

impl SearchIndex for WeightedFuzzyIndex {
    fn name(&self) -> &str {
        "weighted-fuzzy"
    }

    fn search(&self, query: &str, candidates: &[usize]) -> Vec<IndexHit> {
        self.search_skipping(query, &[], candidates)
    }

    fn search_skipping(
        &self,
        query: &str,
        skipped: &[String],
        candidates: &[usize],
    ) -> Vec<IndexHit> {
        let phrase = normalize(query);
        if phrase.is_empty() {
            return Vec::new();
        }
        let terms = tokens(&phrase);
        let mut scored: Vec<&String> = terms.iter().filter(|t| !skipped.contains(*t)).collect();
        if scored.is_empty() {
            scored = terms.iter().collect();
        }

        let mut hits: Vec<IndexHit> = candidates
            .iter()
            .filter_map(|&position| {
                let record = self.records.get(position)?;
                self.score_record(record, &phrase, &terms, &scored)
                    .map(|score| IndexHit { position, score })
            })
            .collect();

        // Stable: equal scores keep candidate order.
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }
}

fn field_tokens(opening: &Opening, field: SearchField) -> Vec<String> {
    let mut out: Vec<String> = match field {
        SearchField::Name => tokens(&opening.name),
        SearchField::Moves => opening.moves.iter().flat_map(|m| tokens(m)).collect(),
        SearchField::StyleTags => opening.style_tags().flat_map(tokens).collect(),
        SearchField::Description => opening.description().map(tokens).unwrap_or_default(),
        SearchField::Eco => vec![opening.eco.as_str().to_lowercase()],
        SearchField::Aliases => opening.aliases.iter().flat_map(|a| tokens(a)).collect(),
        SearchField::StrategicThemes => opening
            .analysis
            .iter()
            .flat_map(|a| a.strategic_themes.iter())
            .flat_map(|t| tokens(t))
            .collect(),
    };
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn index(openings: &[Opening]) -> WeightedFuzzyIndex {
        WeightedFuzzyIndex::build(openings, &SearchConfig::default())
    }

    fn all(openings: &[Opening]) -> Vec<usize> {
        (0..openings.len()).collect()
    }

    fn ranked_fens(openings: &[Opening], hits: &[IndexHit]) -> Vec<String> {
        hits.iter().map(|h| openings[h.position].fen.clone()).collect()
    }

    #[test]
    fn test_exact_name_scores_zero_and_ranks_first() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        let hits = idx.search("Sicilian Defense", &all(&openings));
        assert!(!hits.is_empty());
        assert_eq!(openings[hits[0].position].name, "Sicilian Defense");
        assert_eq!(hits[0].score, 0.0);
        assert!(hits[1..].iter().all(|h| h.score > 0.0));
    }

    #[test]
    fn test_exact_name_is_case_and_punctuation_insensitive() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        let hits = idx.search("  king's INDIAN defense", &all(&openings));
        assert_eq!(openings[hits[0].position].name, "King's Indian Defense");
        assert_eq!(hits[0].score, 0.0);
    }

    #[test]
    fn test_typo_still_matches() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        let hits = idx.search("sicillian", &all(&openings));
        let fens = ranked_fens(&openings, &hits);
        assert!(fens.contains(&"sicilian".to_string()));
        assert!(hits.iter().all(|h| h.score > 0.0 && h.score <= 1.0));
    }

    #[test]
    fn test_prefix_matches() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        let hits = idx.search("nimzo", &all(&openings));
        assert_eq!(openings[hits[0].position].fen, "nimzo");
    }

    #[test]
    fn test_no_match_excludes_record() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        assert!(idx.search("zzzzqqq", &all(&openings)).is_empty());
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        assert!(idx.search("", &all(&openings)).is_empty());
        assert!(idx.search("  ?! ", &all(&openings)).is_empty());
    }

    #[test]
    fn test_short_terms_match_only_literally() {
        let openings = vec![
            fixtures::OpeningBuilder::new("a", "A00", "Polish Opening").moves("b4").build(),
            fixtures::OpeningBuilder::new("b", "A00", "Grob Opening").moves("g4").build(),
        ];
        let config = SearchConfig {
            min_match_len: 3,
            ..SearchConfig::default()
        };
        let idx = WeightedFuzzyIndex::build(&openings, &config);
        let hits = idx.search("b4", &all(&openings));
        assert_eq!(ranked_fens(&openings, &hits), vec!["a"]);
    }

    #[test]
    fn test_moves_field_is_searchable() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        let hits = idx.search("d4 Nf6 c4 g6", &all(&openings));
        assert_eq!(openings[hits[0].position].fen, "kings-indian");
    }

    #[test]
    fn test_eco_field_is_searchable() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        let hits = idx.search("E20", &all(&openings));
        assert_eq!(openings[hits[0].position].fen, "nimzo");
    }

    #[test]
    fn test_alias_phrase_match() {
        let openings = vec![
            fixtures::OpeningBuilder::new("a", "C60", "Ruy Lopez").alias("Spanish Game").build(),
            fixtures::OpeningBuilder::new("b", "C50", "Italian Game").build(),
        ];
        let idx = index(&openings);
        let hits = idx.search("spanish game", &all(&openings));
        assert_eq!(ranked_fens(&openings, &hits)[0], "a");
        assert_eq!(hits[0].score, ALIAS_PHRASE_SCORE);
    }

    #[test]
    fn test_candidates_restrict_results() {
        let openings = fixtures::sample_collection();
        let idx = index(&openings);
        let only_first = vec![0];
        let hits = idx.search("defense", &only_first);
        assert!(hits.iter().all(|h| h.position == 0));
    }

    #[test]
    fn test_zero_threshold_is_exact_only() {
        let openings = fixtures::sample_collection();
        let config = SearchConfig {
            threshold: 0.0,
            ..SearchConfig::default()
        };
        let idx = WeightedFuzzyIndex::build(&openings, &config);
        assert!(idx.search("sicillian", &all(&openings)).is_empty());
        assert!(!idx.search("sicilian", &all(&openings)).is_empty());
    }

    #[test]
    fn test_skipped_terms_do_not_count_as_misses() {
        let openings = fixtures::sicilian_pair();
        let idx = index(&openings);
        let skipped = vec!["attacking".to_string()];

        let hits = idx.search_skipping("attacking sicilian", &skipped, &all(&openings));
        assert_eq!(ranked_fens(&openings, &hits), vec!["f1", "f2"]);
        let plain = idx.search("sicilian", &all(&openings));
        assert_eq!(hits, plain);
    }

    #[test]
    fn test_skipped_terms_keep_phrase_match() {
        let openings = vec![
            fixtures::opening("a", "B73", "Open Sicilian"),
            fixtures::opening("b", "B20", "Sicilian Defense"),
        ];
        let idx = index(&openings);
        let skipped = vec!["open".to_string()];

        let hits = idx.search_skipping("Open Sicilian", &skipped, &all(&openings));
        assert_eq!(ranked_fens(&openings, &hits)[0], "a");
        assert_eq!(hits[0].score, 0.0);
    }

    #[test]
    fn test_all_terms_skipped_scores_them_anyway() {
        let openings = fixtures::sicilian_pair();
        let idx = index(&openings);
        let skipped = vec!["attacking".to_string()];

        let hits = idx.search_skipping("attacking", &skipped, &all(&openings));
        assert_eq!(hits, idx.search("attacking", &all(&openings)));
        assert_eq!(ranked_fens(&openings, &hits), vec!["f2"]);
    }

    #[test]
    fn test_heavier_field_wins_over_lighter_field() {
        let openings = vec![
            fixtures::OpeningBuilder::new("desc", "A00", "Odd Line")
                .description("A dragon lurks here.")
                .build(),
            fixtures::OpeningBuilder::new("name", "B70", "Dragon Variation").build(),
        ];
        let idx = index(&openings);
        let hits = idx.search("dragon", &all(&openings));
        assert_eq!(ranked_fens(&openings, &hits), vec!["name", "desc"]);
    }
}
