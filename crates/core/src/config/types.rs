use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::opening::EcoFamily;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub popularity: PopularityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Where the opening partitions live on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// Directory holding one JSON partition per ECO family.
    pub dir: PathBuf,
    /// Families to load, in collection order.
    #[serde(default = "default_families")]
    pub families: Vec<EcoFamily>,
    /// Partition file name; `{family}` is replaced by the family letter.
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    /// Optional per-FEN popularity stats file (relative paths resolve against `dir`).
    #[serde(default)]
    pub popularity_file: Option<PathBuf>,
}

impl DataConfig {
    /// Config pointing at `dir` with every other setting defaulted.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            families: default_families(),
            file_pattern: default_file_pattern(),
            popularity_file: None,
        }
    }

    /// Full path of the partition file for `family`.
    pub fn partition_path(&self, family: EcoFamily) -> PathBuf {
        let file_name = self
            .file_pattern
            .replace("{family}", &family.letter().to_string());
        self.dir.join(file_name)
    }

    /// Full path of the popularity stats file, if one is configured.
    pub fn popularity_path(&self) -> Option<PathBuf> {
        self.popularity_file.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.dir.join(p)
            }
        })
    }
}

fn default_families() -> Vec<EcoFamily> {
    EcoFamily::ALL.to_vec()
}

fn default_file_pattern() -> String {
    "eco{family}.json".to_string()
}

/// Fields the fuzzy index can search.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Name,
    Moves,
    StyleTags,
    Description,
    Eco,
    Aliases,
    StrategicThemes,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Moves => "moves",
            SearchField::StyleTags => "style_tags",
            SearchField::Description => "description",
            SearchField::Eco => "eco",
            SearchField::Aliases => "aliases",
            SearchField::StrategicThemes => "strategic_themes",
        }
    }
}

/// A searchable field and its relative weight.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct FieldWeight {
    pub field: SearchField,
    pub weight: f64,
}

impl FieldWeight {
    pub fn new(field: SearchField, weight: f64) -> Self {
        Self { field, weight }
    }
}

/// Fuzzy search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Ordered (field, weight) pairs.
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldWeight>,
    /// Similarity threshold: 0.0 accepts only exact tokens, 1.0 accepts anything.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Query terms shorter than this only match literally.
    #[serde(default = "default_min_match_len")]
    pub min_match_len: usize,
    /// Upper bound on results returned over HTTP.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            threshold: default_threshold(),
            min_match_len: default_min_match_len(),
            max_results: default_max_results(),
            lexicon: LexiconConfig::default(),
        }
    }
}

fn default_fields() -> Vec<FieldWeight> {
    vec![
        FieldWeight::new(SearchField::Name, 0.4),
        FieldWeight::new(SearchField::Moves, 0.3),
        FieldWeight::new(SearchField::StyleTags, 0.2),
        FieldWeight::new(SearchField::Description, 0.15),
        FieldWeight::new(SearchField::Eco, 0.1),
    ]
}

fn default_threshold() -> f64 {
    0.4
}

fn default_min_match_len() -> usize {
    2
}

fn default_max_results() -> usize {
    50
}

/// Descriptive adjectives recognised in queries and how much each one boosts
/// a result carrying the matching style tag.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LexiconConfig {
    #[serde(default = "default_boosts")]
    pub boosts: BTreeMap<String, f64>,
    /// Cap on the summed boost of a single result.
    #[serde(default = "default_max_total_boost")]
    pub max_total_boost: f64,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            boosts: default_boosts(),
            max_total_boost: default_max_total_boost(),
        }
    }
}

const DEFAULT_ADJECTIVES: &[&str] = &[
    "aggressive",
    "attacking",
    "classical",
    "closed",
    "counterattacking",
    "defensive",
    "dynamic",
    "flexible",
    "hypermodern",
    "open",
    "positional",
    "quiet",
    "sharp",
    "solid",
    "strategic",
    "tactical",
    "theoretical",
];

const DEFAULT_ADJECTIVE_BOOST: f64 = 0.15;

fn default_boosts() -> BTreeMap<String, f64> {
    DEFAULT_ADJECTIVES
        .iter()
        .map(|word| (word.to_string(), DEFAULT_ADJECTIVE_BOOST))
        .collect()
}

fn default_max_total_boost() -> f64 {
    0.45
}

/// Landing-page popularity view configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PopularityConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for PopularityConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize {
    6
}

fn default_max_limit() -> usize {
    10
}
