//! Gazetteer and pattern based entity tagger

use super::model::{ModelSpec, NerSection};
use super::sentence::{Label, Sentence};
use super::SequenceTagger;
use crate::error::{Error, Result};
use crate::segment::tokenize;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;

#[derive(Debug, Clone)]
struct Entry {
    tokens: Vec<String>,
    label: String,
    score: f32,
}

#[derive(Debug, Clone)]
struct Pattern {
    regex: Regex,
    group: usize,
    label: String,
    score: f32,
}

/// Labels entity spans by longest gazetteer match, then by regex patterns
///
/// Spans never overlap: a pattern match touching an already labeled token
/// is dropped, and matches must start and end on token boundaries.
#[derive(Debug, Clone)]
pub struct GazetteerTagger {
    name: String,
    label_type: String,
    case_sensitive: bool,
    // first token -> entries starting with it, longest first
    entries: HashMap<String, Vec<Entry>>,
    patterns: Vec<Pattern>,
}

impl GazetteerTagger {
    /// Build from a `ner` model
    pub fn from_spec(spec: &ModelSpec) -> Result<Self> {
        let section = spec.ner.as_ref().ok_or_else(|| Error::InvalidModel {
            name: spec.metadata.name.clone(),
            reason: "missing [ner] section".into(),
        })?;
        Self::from_section(&spec.metadata.name, section)
    }

    fn from_section(name: &str, section: &NerSection) -> Result<Self> {
        let mut tagger = Self {
            name: name.to_string(),
            label_type: "ner".to_string(),
            case_sensitive: section.case_sensitive,
            entries: HashMap::new(),
            patterns: Vec::with_capacity(section.patterns.len()),
        };

        for (label, phrases) in &section.gazetteer {
            for phrase in phrases {
                tagger.add_entry(phrase, label, section.confidence);
            }
        }
        for entries in tagger.entries.values_mut() {
            entries.sort_by(|a, b| b.tokens.len().cmp(&a.tokens.len()));
        }

        for pattern in &section.patterns {
            let regex = Regex::new(&pattern.regex).map_err(|e| Error::InvalidModel {
                name: name.to_string(),
                reason: format!("bad pattern {:?}: {e}", pattern.regex),
            })?;
            if pattern.group >= regex.captures_len() {
                return Err(Error::InvalidModel {
                    name: name.to_string(),
                    reason: format!("pattern {:?} has no group {}", pattern.regex, pattern.group),
                });
            }
            tagger.patterns.push(Pattern {
                regex,
                group: pattern.group,
                label: pattern.label.clone(),
                score: pattern.confidence.unwrap_or(section.confidence),
            });
        }

        log::debug!(
            "Built gazetteer tagger '{}' with {} entries and {} patterns",
            tagger.name,
            tagger.entries.values().map(Vec::len).sum::<usize>(),
            tagger.patterns.len()
        );
        Ok(tagger)
    }

    fn add_entry(&mut self, phrase: &str, label: &str, score: f32) {
        let tokens: Vec<String> = tokenize(phrase)
            .into_iter()
            .map(|t| self.normalize(&t.value))
            .collect();
        let Some(first) = tokens.first().cloned() else {
            return;
        };
        self.entries.entry(first).or_default().push(Entry {
            tokens,
            label: label.to_string(),
            score,
        });
    }

    fn normalize(&self, word: &str) -> String {
        if self.case_sensitive {
            word.to_string()
        } else {
            word.to_lowercase()
        }
    }

    fn gazetteer_spans(&self, words: &[String]) -> Vec<(Range<usize>, Label)> {
        let mut spans = Vec::new();
        let mut i = 0;

        'scan: while i < words.len() {
            if let Some(candidates) = self.entries.get(&words[i]) {
                for entry in candidates {
                    let end = i + entry.tokens.len();
                    if end <= words.len() && words[i..end] == entry.tokens[..] {
                        spans.push((i..end, Label::new(entry.label.clone(), entry.score)));
                        i = end;
                        continue 'scan;
                    }
                }
            }
            i += 1;
        }

        spans
    }

    fn pattern_spans(&self, sentence: &Sentence, taken: &mut [bool]) -> Vec<(Range<usize>, Label)> {
        let mut spans = Vec::new();
        let tokens = sentence.tokens();

        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(sentence.text()) {
                let Some(m) = caps.get(pattern.group) else {
                    continue;
                };
                let start = tokens.iter().position(|t| t.byte_range().start == m.start());
                let end = tokens.iter().position(|t| t.byte_range().end == m.end());
                let (Some(start), Some(end)) = (start, end) else {
                    continue;
                };
                if end < start || taken[start..=end].iter().any(|&t| t) {
                    continue;
                }
                taken[start..=end].iter_mut().for_each(|t| *t = true);
                spans.push((start..end + 1, Label::new(pattern.label.clone(), pattern.score)));
            }
        }

        spans
    }
}

impl SequenceTagger for GazetteerTagger {
    fn name(&self) -> &str {
        &self.name
    }

    fn label_type(&self) -> &str {
        &self.label_type
    }

    fn predict(&self, sentences: &mut [Sentence]) -> Result<()> {
        for sentence in sentences.iter_mut() {
            sentence.clear_labels(&self.label_type);

            let words: Vec<String> = sentence
                .tokens()
                .iter()
                .map(|t| self.normalize(t.text()))
                .collect();
            let mut spans = self.gazetteer_spans(&words);

            let mut taken = vec![false; words.len()];
            for (range, _) in &spans {
                taken[range.clone()].iter_mut().for_each(|t| *t = true);
            }
            spans.extend(self.pattern_spans(sentence, &mut taken));

            for (range, label) in spans {
                sentence.add_span(&self.label_type, range, label)?;
            }
            sentence.sort_spans();
        }
        Ok(())
    }
}
