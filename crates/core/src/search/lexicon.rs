//! Descriptive-adjective lexicon for the re-ranking pass.

use std::collections::HashMap;

use super::normalize::{normalize, tokens};
use crate::config::LexiconConfig;
use crate::opening::Opening;

/// Boost earned by one result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boost {
    /// Summed boost, capped at the lexicon's maximum.
    pub amount: f64,
    /// Adjectives that matched a style tag, in query order.
    pub adjectives: Vec<String>,
}

/// Table of recognised adjectives and the boost each one grants.
///
/// Boosts stack additively across adjectives and the total is capped, so a
/// result matching a superset of another's adjectives is never boosted less.
/// Configured lexicons use one value for every word (see
/// [`validate_config`](crate::config::validate_config)), which makes the
/// boost grow with the number of matches alone.
#[derive(Debug, Clone)]
pub struct AdjectiveLexicon {
    boosts: HashMap<String, f64>,
    max_total: f64,
}

impl AdjectiveLexicon {
    pub fn new(boosts: impl IntoIterator<Item = (String, f64)>, max_total: f64) -> Self {
        let boosts = boosts
            .into_iter()
            .map(|(word, boost)| (normalize(&word), boost))
            .filter(|(word, _)| !word.is_empty())
            .collect();
        Self { boosts, max_total }
    }

    pub fn from_config(config: &LexiconConfig) -> Self {
        Self::new(
            config.boosts.iter().map(|(w, b)| (w.clone(), *b)),
            config.max_total_boost,
        )
    }

    pub fn len(&self) -> usize {
        self.boosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty()
    }

    /// Recognised adjectives among `terms`, deduplicated, in query order.
    pub fn adjectives_in(&self, terms: &[String]) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for term in terms {
            if self.boosts.contains_key(term) && !found.contains(term) {
                found.push(term.clone());
            }
        }
        found
    }

    /// Boost for `opening` given the query's adjectives.
    ///
    /// An adjective matches when it equals a token of one of the opening's
    /// style tags (so "attacking" matches the tag "attacking" but not
    /// "counterattacking").
    pub fn boost_for(&self, opening: &Opening, adjectives: &[String]) -> Boost {
        if adjectives.is_empty() {
            return Boost::default();
        }

        let tag_tokens: Vec<String> = opening.style_tags().flat_map(tokens).collect();
        let mut boost = Boost::default();
        for adjective in adjectives {
            if !tag_tokens.contains(adjective) {
                continue;
            }
            if let Some(amount) = self.boosts.get(adjective) {
                boost.amount += amount;
                boost.adjectives.push(adjective.clone());
            }
        }
        boost.amount = boost.amount.min(self.max_total);
        boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn lexicon() -> AdjectiveLexicon {
        AdjectiveLexicon::new(
            [
                ("attacking".to_string(), 0.15),
                ("Solid".to_string(), 0.15),
                ("sharp".to_string(), 0.3),
            ],
            0.4,
        )
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_adjectives_in_query_order_and_deduped() {
        let lex = lexicon();
        let found = lex.adjectives_in(&terms(&["solid", "sicilian", "attacking", "solid"]));
        assert_eq!(found, terms(&["solid", "attacking"]));
    }

    #[test]
    fn test_boost_requires_matching_tag() {
        let lex = lexicon();
        let opening = fixtures::OpeningBuilder::new("f", "B70", "Dragon")
            .style_tags(&["attacking"])
            .build();
        let boost = lex.boost_for(&opening, &terms(&["attacking", "solid"]));
        assert_eq!(boost.amount, 0.15);
        assert_eq!(boost.adjectives, terms(&["attacking"]));
    }

    #[test]
    fn test_boosts_stack_and_cap() {
        let lex = lexicon();
        let opening = fixtures::OpeningBuilder::new("f", "B70", "Dragon")
            .style_tags(&["attacking", "sharp", "solid"])
            .build();
        let boost = lex.boost_for(&opening, &terms(&["attacking", "sharp", "solid"]));
        assert_eq!(boost.amount, 0.4);
        assert_eq!(boost.adjectives.len(), 3);
    }

    #[test]
    fn test_tag_token_match_not_substring() {
        let lex = lexicon();
        let opening = fixtures::OpeningBuilder::new("f", "B70", "Dragon")
            .style_tags(&["counterattacking"])
            .build();
        assert_eq!(lex.boost_for(&opening, &terms(&["attacking"])).amount, 0.0);

        let opening = fixtures::OpeningBuilder::new("g", "B70", "Dragon")
            .style_tags(&["Attacking play"])
            .build();
        assert_eq!(lex.boost_for(&opening, &terms(&["attacking"])).amount, 0.15);
    }

    #[test]
    fn test_from_config_normalizes_words() {
        let lex = AdjectiveLexicon::from_config(&LexiconConfig::default());
        assert!(!lex.is_empty());
        assert_eq!(lex.adjectives_in(&terms(&["positional"])), terms(&["positional"]));
    }
}
