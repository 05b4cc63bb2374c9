//! ECO classification codes and families.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static ECO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-E][0-9]{2}$").expect("valid ECO pattern"));

/// ECO family: the leading letter of an ECO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EcoFamily {
    A,
    B,
    C,
    D,
    E,
}

impl EcoFamily {
    pub const ALL: [EcoFamily; 5] = [
        EcoFamily::A,
        EcoFamily::B,
        EcoFamily::C,
        EcoFamily::D,
        EcoFamily::E,
    ];

    pub fn letter(&self) -> char {
        match self {
            EcoFamily::A => 'A',
            EcoFamily::B => 'B',
            EcoFamily::C => 'C',
            EcoFamily::D => 'D',
            EcoFamily::E => 'E',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(EcoFamily::A),
            'B' => Some(EcoFamily::B),
            'C' => Some(EcoFamily::C),
            'D' => Some(EcoFamily::D),
            'E' => Some(EcoFamily::E),
            _ => None,
        }
    }

    /// Lenient parse of user input: a single letter, any case, surrounding
    /// whitespace allowed. Anything else is `None`.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_letter(c),
            _ => None,
        }
    }

    /// Position of the family in `ALL`.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for EcoFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Error for a malformed ECO code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ECO code '{0}' (expected a letter A-E followed by two digits)")]
pub struct InvalidEcoCode(pub String);

/// A validated ECO code such as `B20`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EcoCode(String);

impl EcoCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn family(&self) -> EcoFamily {
        // Validated on construction, so the first byte is always A-E.
        match self.0.as_bytes()[0] {
            b'A' => EcoFamily::A,
            b'B' => EcoFamily::B,
            b'C' => EcoFamily::C,
            b'D' => EcoFamily::D,
            _ => EcoFamily::E,
        }
    }
}

impl FromStr for EcoCode {
    type Err = InvalidEcoCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if ECO_PATTERN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidEcoCode(s.to_string()))
        }
    }
}

impl TryFrom<String> for EcoCode {
    type Error = InvalidEcoCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if ECO_PATTERN.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(InvalidEcoCode(s))
        }
    }
}

impl From<EcoCode> for String {
    fn from(code: EcoCode) -> Self {
        code.0
    }
}

impl fmt::Display for EcoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
