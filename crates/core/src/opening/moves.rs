//! Move-list tokenization.

/// Split a PGN-style move string into SAN tokens.
///
/// Move numbers (`1.`, `12...`, or glued forms like `3.Bb5`) and game result
/// markers are dropped.
pub fn tokenize_moves(moves: &str) -> Vec<String> {
    moves
        .split_whitespace()
        .filter_map(|raw| {
            let token = strip_move_number(raw);
            if token.is_empty() || is_result_marker(token) {
                None
            } else {
                Some(token.to_string())
            }
        })
        .collect()
}

fn strip_move_number(token: &str) -> &str {
    let digits = token.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return token;
    }
    let rest = &token[digits..];
    if rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    }
}

fn is_result_marker(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_numbered_moves() {
        assert_eq!(
            tokenize_moves("1. e4 c5 2. Nf3 d6"),
            vec!["e4", "c5", "Nf3", "d6"]
        );
    }

    #[test]
    fn test_tokenize_glued_and_black_numbers() {
        assert_eq!(
            tokenize_moves("1.e4 e5 2.Nf3 Nc6 3.Bb5 3... a6"),
            vec!["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]
        );
    }

    #[test]
    fn test_tokenize_drops_results() {
        assert_eq!(tokenize_moves("1. d4 d5 1/2-1/2"), vec!["d4", "d5"]);
    }

    #[test]
    fn test_tokenize_keeps_castling() {
        assert_eq!(tokenize_moves("5. O-O O-O-O"), vec!["O-O", "O-O-O"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize_moves("   ").is_empty());
    }
}
