//! Segmentation rule configuration
//!
//! Rules are described in TOML and compiled into lookup sets. English is
//! embedded; other languages are loaded from files.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, OnceLock};

static ENGLISH: OnceLock<Arc<SegmentationRules>> = OnceLock::new();

const ENGLISH_TOML: &str = include_str!("../../configs/languages/english.toml");

/// Root rule configuration as written in TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub metadata: Metadata,
    pub terminators: Terminators,
    #[serde(default)]
    pub ellipsis: Ellipsis,
    #[serde(default)]
    pub enclosures: Enclosures,
    #[serde(default)]
    pub paragraphs: Paragraphs,
    #[serde(default)]
    pub abbreviations: Abbreviations,
}

/// Language metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

/// Sentence terminator characters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminators {
    pub chars: Vec<char>,
}

/// Ellipsis handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipsis {
    #[serde(default = "default_true")]
    pub treat_as_boundary: bool,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Default for Ellipsis {
    fn default() -> Self {
        Self {
            treat_as_boundary: true,
            patterns: vec!["...".to_string(), "…".to_string()],
        }
    }
}

/// Enclosure characters around sentence boundaries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enclosures {
    #[serde(default)]
    pub closing: Vec<char>,
    #[serde(default)]
    pub opening: Vec<char>,
}

/// Paragraph separation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraphs {
    #[serde(default = "default_line_breaks")]
    pub min_line_breaks: usize,
}

impl Default for Paragraphs {
    fn default() -> Self {
        Self {
            min_line_breaks: default_line_breaks(),
        }
    }
}

/// Abbreviations organized by arbitrary category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Abbreviations {
    #[serde(flatten)]
    pub categories: HashMap<String, Vec<String>>,
}

fn default_true() -> bool {
    true
}

fn default_line_breaks() -> usize {
    2
}

impl RulesConfig {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.metadata.code.trim().is_empty() {
            return Err("Language code must not be empty".to_string());
        }

        if self.terminators.chars.is_empty() {
            return Err("No terminator characters defined".to_string());
        }

        if self.paragraphs.min_line_breaks == 0 {
            return Err("paragraphs.min_line_breaks must be at least 1".to_string());
        }

        if let Some(empty) = self.ellipsis.patterns.iter().find(|p| p.is_empty()) {
            return Err(format!("Empty ellipsis pattern: {empty:?}"));
        }

        Ok(())
    }
}

/// Compiled segmentation rules
#[derive(Debug, Clone)]
pub struct SegmentationRules {
    code: String,
    name: String,
    terminators: HashSet<char>,
    ellipsis: HashSet<String>,
    ellipsis_is_boundary: bool,
    closing: HashSet<char>,
    opening: HashSet<char>,
    min_line_breaks: usize,
    abbreviations: HashSet<String>,
}

impl SegmentationRules {
    /// Embedded English rules
    pub fn english() -> Arc<Self> {
        ENGLISH
            .get_or_init(|| match Self::from_toml_str(ENGLISH_TOML) {
                Ok(rules) => Arc::new(rules),
                Err(e) => {
                    log::error!("Failed to load embedded English rules: {e}");
                    Arc::new(Self::fallback())
                }
            })
            .clone()
    }

    /// Look up embedded rules by language code or name
    pub fn for_language(code: &str) -> Result<Arc<Self>> {
        match code.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::english()),
            other => Err(Error::InvalidRules(format!("Unknown language code: {other}"))),
        }
    }

    /// Parse and compile rules from TOML text
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: RulesConfig = toml::from_str(toml_str)?;
        Self::from_config(&config)
    }

    /// Load rules from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading segmentation rules from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Compile a validated configuration
    pub fn from_config(config: &RulesConfig) -> Result<Self> {
        config.validate().map_err(Error::InvalidRules)?;

        let mut abbreviations = HashSet::new();
        for entry in config.abbreviations.categories.values().flatten() {
            let entry = entry.trim_end_matches('.');
            if entry.is_empty() {
                continue;
            }
            // lowercase entries also match sentence-initial capitalisation
            if let Some(first) = entry.chars().next().filter(|c| c.is_lowercase()) {
                let capitalized: String = first
                    .to_uppercase()
                    .chain(entry.chars().skip(1))
                    .collect();
                abbreviations.insert(capitalized);
            }
            abbreviations.insert(entry.to_string());
        }

        Ok(Self {
            code: config.metadata.code.clone(),
            name: config.metadata.name.clone(),
            terminators: config.terminators.chars.iter().copied().collect(),
            ellipsis: config.ellipsis.patterns.iter().cloned().collect(),
            ellipsis_is_boundary: config.ellipsis.treat_as_boundary,
            closing: config.enclosures.closing.iter().copied().collect(),
            opening: config.enclosures.opening.iter().copied().collect(),
            min_line_breaks: config.paragraphs.min_line_breaks,
            abbreviations,
        })
    }

    fn fallback() -> Self {
        Self {
            code: "en".to_string(),
            name: "English".to_string(),
            terminators: ['.', '!', '?'].into_iter().collect(),
            ellipsis: Ellipsis::default().patterns.into_iter().collect(),
            ellipsis_is_boundary: true,
            closing: HashSet::new(),
            opening: HashSet::new(),
            min_line_breaks: default_line_breaks(),
            abbreviations: HashSet::new(),
        }
    }

    /// Language code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Language name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of known abbreviations, including capitalised variants
    pub fn abbreviation_count(&self) -> usize {
        self.abbreviations.len()
    }

    pub fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(&ch)
    }

    pub fn is_ellipsis(&self, value: &str) -> bool {
        self.ellipsis.contains(value)
    }

    pub fn ellipsis_is_boundary(&self) -> bool {
        self.ellipsis_is_boundary
    }

    pub fn is_closing(&self, ch: char) -> bool {
        self.closing.contains(&ch)
    }

    pub fn is_opening(&self, ch: char) -> bool {
        self.opening.contains(&ch)
    }

    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(word)
    }

    pub fn min_line_breaks(&self) -> usize {
        self.min_line_breaks
    }
}
