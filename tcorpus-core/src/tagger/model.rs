//! Model files and the model library
//!
//! Models are TOML files with a `[metadata]` table naming the model and its
//! tag type, and a `[ner]` or `[pos]` section holding the model data. The
//! library resolves a model name as a file path, then as
//! `<model_dir>/<name>.toml`, then as one of the embedded models.

use super::gazetteer::GazetteerTagger;
use super::lexicon::LexiconTagger;
use super::SequenceTagger;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Environment variable naming the default model directory
pub const MODEL_DIR_ENV: &str = "TCORPUS_MODEL_DIR";

const NER_ENGLISH: &str = include_str!("../../models/ner-english.toml");
const POS_ENGLISH: &str = include_str!("../../models/pos-english.toml");

/// Embedded models: (name, aliases, source)
const EMBEDDED: &[(&str, &[&str], &str)] = &[
    ("ner-english", &["ner"], NER_ENGLISH),
    ("pos-english", &["pos"], POS_ENGLISH),
];

static EMBEDDED_TAGGERS: OnceLock<HashMap<&'static str, Arc<dyn SequenceTagger>>> =
    OnceLock::new();

/// Kind of labels a model predicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    /// Entity spans
    Ner,
    /// Token part-of-speech tags
    Pos,
}

impl TagType {
    /// Label type written into sentences
    pub fn label_type(&self) -> &'static str {
        match self {
            TagType::Ner => "ner",
            TagType::Pos => "pos",
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub tag_type: TagType,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Gazetteer NER model data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerSection {
    /// Confidence for entries without their own
    #[serde(default = "default_ner_confidence")]
    pub confidence: f32,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Entity phrases per label
    #[serde(default)]
    pub gazetteer: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,
}

/// A regex that labels its matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSpec {
    pub regex: String,
    pub label: String,
    /// Capture group holding the entity (0 = whole match)
    #[serde(default)]
    pub group: usize,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Lexicon POS model data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosSection {
    #[serde(default = "default_tag")]
    pub default_tag: String,
    #[serde(default = "number_tag")]
    pub number_tag: String,
    #[serde(default = "punctuation_tag")]
    pub punctuation_tag: String,
    #[serde(default = "proper_noun_tag")]
    pub proper_noun_tag: String,
    /// Words per tag; a word listed under several tags gets the first tag
    /// in alphabetical order
    #[serde(default)]
    pub lexicon: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub suffixes: Vec<SuffixRule>,
    #[serde(default)]
    pub confidence: PosConfidence,
}

/// Tag words ending in `suffix`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuffixRule {
    pub suffix: String,
    pub tag: String,
}

/// Label scores by the kind of evidence used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosConfidence {
    #[serde(default = "lexicon_confidence")]
    pub lexicon: f32,
    #[serde(default = "rule_confidence")]
    pub rule: f32,
    #[serde(default = "fallback_confidence")]
    pub fallback: f32,
}

impl Default for PosConfidence {
    fn default() -> Self {
        Self {
            lexicon: lexicon_confidence(),
            rule: rule_confidence(),
            fallback: fallback_confidence(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ner_confidence() -> f32 {
    0.9
}

fn default_tag() -> String {
    "NN".to_string()
}

fn number_tag() -> String {
    "CD".to_string()
}

fn punctuation_tag() -> String {
    "SYM".to_string()
}

fn proper_noun_tag() -> String {
    "NNP".to_string()
}

fn lexicon_confidence() -> f32 {
    0.95
}

fn rule_confidence() -> f32 {
    0.7
}

fn fallback_confidence() -> f32 {
    0.4
}

/// A model file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub metadata: ModelMetadata,
    #[serde(default)]
    pub ner: Option<NerSection>,
    #[serde(default)]
    pub pos: Option<PosSection>,
}

impl ModelSpec {
    /// Parse a model from TOML text
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let spec: ModelSpec = toml::from_str(toml_str)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Load a model file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Check the model is usable
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidModel {
            name: self.metadata.name.clone(),
            reason,
        };

        if self.metadata.name.trim().is_empty() {
            return Err(invalid("metadata.name must not be empty".into()));
        }

        match self.metadata.tag_type {
            TagType::Ner => {
                let ner = self
                    .ner
                    .as_ref()
                    .ok_or_else(|| invalid("tag_type \"ner\" requires a [ner] section".into()))?;
                check_score(ner.confidence).map_err(&invalid)?;
                if ner.gazetteer.is_empty() && ner.patterns.is_empty() {
                    return Err(invalid("[ner] defines no gazetteer entries or patterns".into()));
                }
                if let Some((label, _)) = ner
                    .gazetteer
                    .iter()
                    .find(|(_, phrases)| phrases.iter().any(|p| p.trim().is_empty()))
                {
                    return Err(invalid(format!("empty phrase in gazetteer label {label}")));
                }
                for pattern in &ner.patterns {
                    if let Some(score) = pattern.confidence {
                        check_score(score).map_err(&invalid)?;
                    }
                }
            }
            TagType::Pos => {
                let pos = self
                    .pos
                    .as_ref()
                    .ok_or_else(|| invalid("tag_type \"pos\" requires a [pos] section".into()))?;
                for score in [pos.confidence.lexicon, pos.confidence.rule, pos.confidence.fallback] {
                    check_score(score).map_err(&invalid)?;
                }
                if pos.suffixes.iter().any(|rule| rule.suffix.is_empty()) {
                    return Err(invalid("empty suffix rule".into()));
                }
            }
        }

        Ok(())
    }

    /// Build the tagger described by this model
    pub fn build(&self) -> Result<Arc<dyn SequenceTagger>> {
        match self.metadata.tag_type {
            TagType::Ner => Ok(Arc::new(GazetteerTagger::from_spec(self)?)),
            TagType::Pos => Ok(Arc::new(LexiconTagger::from_spec(self)?)),
        }
    }
}

fn check_score(score: f32) -> std::result::Result<(), String> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(format!("confidence {score} outside [0, 1]"))
    }
}

/// Resolves model names to taggers
#[derive(Debug, Clone, Default)]
pub struct ModelLibrary {
    model_dir: Option<PathBuf>,
}

impl ModelLibrary {
    /// A library with embedded models only
    pub fn new() -> Self {
        Self::default()
    }

    /// A library that also searches `dir`
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: Some(dir.into()),
        }
    }

    /// A library searching the directory named by `TCORPUS_MODEL_DIR`, if set
    pub fn from_env() -> Self {
        Self {
            model_dir: std::env::var_os(MODEL_DIR_ENV).map(PathBuf::from),
        }
    }

    /// Directory searched for model files
    pub fn model_dir(&self) -> Option<&Path> {
        self.model_dir.as_deref()
    }

    /// Load a tagger by name or path
    pub fn load(&self, name: &str) -> Result<Arc<dyn SequenceTagger>> {
        if let Some(path) = self.find_file(name) {
            log::info!("Loading model '{}' from {}", name, path.display());
            return ModelSpec::from_file(&path)?.build();
        }

        let tagger = embedded_taggers()
            .get(canonical_name(name).ok_or_else(|| Error::ModelNotFound(name.to_string()))?)
            .cloned()
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))?;
        log::info!("Using embedded model '{}'", tagger.name());
        Ok(tagger)
    }

    /// Load a model file without building it
    pub fn load_spec(&self, name: &str) -> Result<ModelSpec> {
        if let Some(path) = self.find_file(name) {
            return ModelSpec::from_file(path);
        }
        let canonical = canonical_name(name).ok_or_else(|| Error::ModelNotFound(name.to_string()))?;
        let source = EMBEDDED
            .iter()
            .find(|(n, _, _)| *n == canonical)
            .map(|(_, _, source)| *source)
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))?;
        ModelSpec::from_toml_str(source)
    }

    /// Names of all models this library can load
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = EMBEDDED.iter().map(|(n, _, _)| n.to_string()).collect();

        if let Some(dir) = &self.model_dir {
            match std::fs::read_dir(dir) {
                Ok(entries) => {
                    for path in entries.flatten().map(|e| e.path()) {
                        if path.extension().is_some_and(|ext| ext == "toml") {
                            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                                names.push(stem.to_string());
                            }
                        }
                    }
                }
                Err(e) => log::warn!("Cannot read model directory {}: {e}", dir.display()),
            }
        }

        names.sort();
        names.dedup();
        names
    }

    fn find_file(&self, name: &str) -> Option<PathBuf> {
        let direct = PathBuf::from(name);
        if direct.is_file() {
            return Some(direct);
        }
        self.model_dir
            .as_ref()
            .map(|dir| dir.join(format!("{name}.toml")))
            .filter(|path| path.is_file())
    }
}

fn canonical_name(name: &str) -> Option<&'static str> {
    EMBEDDED
        .iter()
        .find(|(n, aliases, _)| *n == name || aliases.iter().any(|alias| *alias == name))
        .map(|(n, _, _)| *n)
}

fn embedded_taggers() -> &'static HashMap<&'static str, Arc<dyn SequenceTagger>> {
    EMBEDDED_TAGGERS.get_or_init(|| {
        let mut map = HashMap::new();
        for (name, _, source) in EMBEDDED {
            match ModelSpec::from_toml_str(source).and_then(|spec| spec.build()) {
                Ok(tagger) => {
                    map.insert(*name, tagger);
                }
                Err(e) => log::error!("Failed to load embedded model {name}: {e}"),
            }
        }
        map
    })
}

/// Load a tagger by name through the default library
///
/// The library searches `TCORPUS_MODEL_DIR` when set, then the embedded
/// models.
pub fn init_tagger(model_name: &str) -> Result<Arc<dyn SequenceTagger>> {
    ModelLibrary::from_env().load(model_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SMALL_NER: &str = r#"
[metadata]
name = "small-ner"
tag_type = "ner"

[ner.gazetteer]
LOC = ["Paris"]
"#;

    #[test]
    fn test_embedded_models_parse() {
        for (name, _, source) in EMBEDDED {
            let spec = ModelSpec::from_toml_str(source).unwrap();
            assert_eq!(spec.metadata.name, *name);
        }
    }

    #[test]
    fn test_load_embedded_by_alias() {
        let library = ModelLibrary::new();
        let ner = library.load("ner").unwrap();
        assert_eq!(ner.name(), "ner-english");
        assert_eq!(ner.label_type(), "ner");
        let pos = library.load("pos-english").unwrap();
        assert_eq!(pos.label_type(), "pos");
    }

    #[test]
    fn test_unknown_model() {
        let err = ModelLibrary::new().load("flair/ner-german").err().unwrap();
        assert!(matches!(err, Error::ModelNotFound(name) if name == "flair/ner-german"));
    }

    #[test]
    fn test_load_from_model_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("small-ner.toml"), SMALL_NER).unwrap();

        let library = ModelLibrary::with_dir(dir.path());
        let tagger = library.load("small-ner").unwrap();
        assert_eq!(tagger.name(), "small-ner");
        assert!(library.available().contains(&"small-ner".to_string()));
        assert!(library.available().contains(&"pos-english".to_string()));
    }

    #[test]
    fn test_load_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.toml");
        fs::write(&path, SMALL_NER).unwrap();

        let tagger = ModelLibrary::new().load(path.to_str().unwrap()).unwrap();
        assert_eq!(tagger.name(), "small-ner");
    }

    #[test]
    fn test_path_wins_over_model_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("small-ner");
        fs::write(&path, SMALL_NER.replace("\"small-ner\"", "\"path-ner\"")).unwrap();
        // `<model_dir>/<path>.toml` resolves to the sibling file for an absolute path
        fs::write(dir.path().join("small-ner.toml"), SMALL_NER).unwrap();

        let library = ModelLibrary::with_dir(dir.path());
        let tagger = library.load(path.to_str().unwrap()).unwrap();
        assert_eq!(tagger.name(), "path-ner");
        assert_eq!(library.load("small-ner").unwrap().name(), "small-ner");
    }

    #[test]
    fn test_missing_section_rejected() {
        let err = ModelSpec::from_toml_str(
            r#"
[metadata]
name = "broken"
tag_type = "pos"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidModel { reason, .. } if reason.contains("[pos]")));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let err = ModelSpec::from_toml_str(
            r#"
[metadata]
name = "broken"
tag_type = "ner"

[ner]
confidence = 1.5

[ner.gazetteer]
LOC = ["Paris"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidModel { .. }));
    }

    #[test]
    fn test_unknown_tag_type_rejected() {
        let result = ModelSpec::from_toml_str(
            r#"
[metadata]
name = "broken"
tag_type = "chunk"
"#,
        );
        assert!(matches!(result, Err(Error::Toml(_))));
    }
}
