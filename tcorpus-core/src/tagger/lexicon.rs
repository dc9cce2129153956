//! Lexicon and suffix rule part-of-speech tagger

use super::model::{ModelSpec, PosConfidence, PosSection};
use super::sentence::{Label, Sentence};
use super::SequenceTagger;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Tags tokens by lexicon lookup with rule fallbacks
///
/// Lookup order: the word as written, the word lowercased, numbers,
/// punctuation, capitalised words not at sentence start, the longest
/// matching suffix, then the default tag. Word lookups are memoised until
/// [`SequenceTagger::empty_cache`] is called.
#[derive(Debug)]
pub struct LexiconTagger {
    name: String,
    label_type: String,
    lexicon: HashMap<String, String>,
    // longest suffix first
    suffixes: Vec<(String, String)>,
    default_tag: String,
    number_tag: String,
    punctuation_tag: String,
    proper_noun_tag: String,
    confidence: PosConfidence,
    cache: Mutex<HashMap<(String, bool), Label>>,
}

impl LexiconTagger {
    /// Build from a `pos` model
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        let section = spec.pos.as_ref().ok_or_else(|| Error::InvalidModel {
            name: spec.metadata.name.clone(),
            reason: "missing [pos] section".into(),
        })?;
        Ok(Self::from_section(&spec.metadata.name, section))
    }

    fn from_section(name: &str, section: &PosSection) -> Self {
        let mut lexicon = HashMap::new();
        for (tag, words) in &section.lexicon {
            for word in words {
                lexicon.entry(word.clone()).or_insert_with(|| tag.clone());
            }
        }

        let mut suffixes: Vec<(String, String)> = section
            .suffixes
            .iter()
            .map(|rule| (rule.suffix.to_lowercase(), rule.tag.clone()))
            .collect();
        suffixes.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        log::debug!(
            "Built lexicon tagger '{}' with {} words and {} suffix rules",
            name,
            lexicon.len(),
            suffixes.len()
        );

        Self {
            name: name.to_string(),
            label_type: "pos".to_string(),
            lexicon,
            suffixes,
            default_tag: section.default_tag.clone(),
            number_tag: section.number_tag.clone(),
            punctuation_tag: section.punctuation_tag.clone(),
            proper_noun_tag: section.proper_noun_tag.clone(),
            confidence: section.confidence.clone(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of memoised word lookups
    pub fn cached_words(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Tag a single word
    pub fn tag_word(&self, word: &str, sentence_start: bool) -> Label {
        let key = (word.to_string(), sentence_start);
        if let Some(label) = self.cache.lock().ok().and_then(|cache| cache.get(&key).cloned()) {
            return label;
        }

        let label = self.lookup(word, sentence_start);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, label.clone());
        }
        label
    }

    fn lookup(&self, word: &str, sentence_start: bool) -> Label {
        if let Some(tag) = self.lexicon.get(word) {
            return Label::new(tag.clone(), self.confidence.lexicon);
        }
        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return Label::new(tag.clone(), self.confidence.lexicon);
        }

        if is_number(word) {
            return Label::new(self.number_tag.clone(), self.confidence.rule);
        }
        if !word.chars().any(char::is_alphanumeric) {
            return Label::new(self.punctuation_tag.clone(), self.confidence.rule);
        }
        if !sentence_start && word.chars().next().is_some_and(char::is_uppercase) {
            return Label::new(self.proper_noun_tag.clone(), self.confidence.rule);
        }

        if let Some((_, tag)) = self
            .suffixes
            .iter()
            .find(|(suffix, _)| lower.len() > suffix.len() && lower.ends_with(suffix.as_str()))
        {
            return Label::new(tag.clone(), self.confidence.rule);
        }

        Label::new(self.default_tag.clone(), self.confidence.fallback)
    }
}

fn is_number(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_numeric())
        && word.chars().all(|c| c.is_numeric() || matches!(c, '.' | ',' | ':' | '/'))
}

impl SequenceTagger for LexiconTagger {
    fn name(&self) -> &str {
        &self.name
    }

    fn label_type(&self) -> &str {
        &self.label_type
    }

    fn predict(&self, sentences: &mut [Sentence]) -> Result<()> {
        for sentence in sentences.iter_mut() {
            for (i, token) in sentence.tokens_mut().iter_mut().enumerate() {
                let label = self.tag_word(token.text(), i == 0);
                token.set_label(&self.label_type, label);
            }
        }
        Ok(())
    }

    fn empty_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            log::trace!("Clearing {} cached lookups of '{}'", cache.len(), self.name);
            cache.clear();
        }
    }
}
