use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - At least one data partition is configured
/// - Search threshold and weights are sane
/// - Lexicon boosts are non-negative and share one value
/// - Popularity limits are consistent
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Data validation
    if config.data.families.is_empty() {
        return Err(ConfigError::ValidationError(
            "data.families cannot be empty".to_string(),
        ));
    }
    if !config.data.file_pattern.contains("{family}") {
        return Err(ConfigError::ValidationError(
            "data.file_pattern must contain {family}".to_string(),
        ));
    }

    // Search validation
    let search = &config.search;
    if !(0.0..=1.0).contains(&search.threshold) {
        return Err(ConfigError::ValidationError(format!(
            "search.threshold must be within [0, 1], got {}",
            search.threshold
        )));
    }
    if search.min_match_len == 0 {
        return Err(ConfigError::ValidationError(
            "search.min_match_len cannot be 0".to_string(),
        ));
    }
    if search.max_results == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_results cannot be 0".to_string(),
        ));
    }
    for fw in &search.fields {
        if !fw.weight.is_finite() || fw.weight < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "search field '{}' has invalid weight {}",
                fw.field.as_str(),
                fw.weight
            )));
        }
    }
    if search.fields.iter().all(|fw| fw.weight == 0.0) {
        return Err(ConfigError::ValidationError(
            "search.fields needs at least one field with a positive weight".to_string(),
        ));
    }
    for (word, boost) in &search.lexicon.boosts {
        if !boost.is_finite() || *boost < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "lexicon boost for '{}' must be a non-negative number, got {}",
                word, boost
            )));
        }
    }
    // Every adjective earns the same increment, so matching more of them
    // never ranks a result lower.
    let mut boosts = search.lexicon.boosts.iter();
    if let Some((first_word, first)) = boosts.next() {
        if let Some((word, boost)) = boosts.find(|(_, b)| *b != first) {
            return Err(ConfigError::ValidationError(format!(
                "lexicon boosts must all be equal: '{}' is {} but '{}' is {}",
                first_word, first, word, boost
            )));
        }
    }
    let cap = search.lexicon.max_total_boost;
    if !cap.is_finite() || cap < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "search.lexicon.max_total_boost must be a non-negative number, got {}",
            cap
        )));
    }

    // Popularity validation
    let popularity = &config.popularity;
    if popularity.max_limit == 0 {
        return Err(ConfigError::ValidationError(
            "popularity.max_limit cannot be 0".to_string(),
        ));
    }
    if popularity.default_limit == 0 || popularity.default_limit > popularity.max_limit {
        return Err(ConfigError::ValidationError(format!(
            "popularity.default_limit must be within 1..={}, got {}",
            popularity.max_limit, popularity.default_limit
        )));
    }

    Ok(())
}
