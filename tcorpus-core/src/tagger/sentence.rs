//! Sentences, tokens, spans and labels exchanged with taggers

use crate::error::{Error, Result};
use crate::segment::tokenize;
use std::ops::Range;

/// A predicted label with its confidence
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Label value, e.g. `PER` or `NNP`
    pub value: String,
    /// Confidence in `[0, 1]`
    pub score: f32,
}

impl Label {
    pub fn new(value: impl Into<String>, score: f32) -> Self {
        Self {
            value: value.into(),
            score,
        }
    }
}

/// A token of a [`Sentence`]
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    text: String,
    start_pos: usize,
    end_pos: usize,
    bytes: Range<usize>,
    labels: Vec<(String, Label)>,
}

impl Token {
    /// Token text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character offset of the first char within the sentence
    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    /// Character offset one past the last char within the sentence
    pub fn end_pos(&self) -> usize {
        self.end_pos
    }

    /// Byte range within the sentence text
    pub fn byte_range(&self) -> Range<usize> {
        self.bytes.clone()
    }

    /// Attach a label of the given type, replacing any previous one
    pub fn set_label(&mut self, label_type: &str, label: Label) {
        self.labels.retain(|(t, _)| t != label_type);
        self.labels.push((label_type.to_string(), label));
    }

    /// The label of a type, if predicted
    pub fn get_label(&self, label_type: &str) -> Option<&Label> {
        self.labels
            .iter()
            .find(|(t, _)| t == label_type)
            .map(|(_, label)| label)
    }
}

/// A labeled run of consecutive tokens
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    tokens: Range<usize>,
    text: String,
    start_pos: usize,
    end_pos: usize,
    labels: Vec<Label>,
}

impl Span {
    /// Covered token indices
    pub fn tokens(&self) -> Range<usize> {
        self.tokens.clone()
    }

    /// Covered text, including inner whitespace
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    pub fn end_pos(&self) -> usize {
        self.end_pos
    }

    /// All labels, best first
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The best label
    pub fn label(&self) -> &Label {
        &self.labels[0]
    }
}

/// A tokenized sentence that taggers annotate in place
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    text: String,
    tokens: Vec<Token>,
    spans: Vec<(String, Span)>,
}

impl Sentence {
    /// Tokenize `text` into a new, unlabeled sentence
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text)
            .into_iter()
            .map(|t| {
                let start_pos = t.offset;
                let end_pos = start_pos + t.char_len();
                let bytes = t.byte_offset..t.byte_end();
                Token {
                    text: t.value,
                    start_pos,
                    end_pos,
                    bytes,
                    labels: Vec::new(),
                }
            })
            .collect();

        Self {
            text,
            tokens,
            spans: Vec::new(),
        }
    }

    /// Original text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tokens in order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Mutable tokens, for token-level taggers
    pub fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Add a span over `tokens` with a single label
    pub fn add_span(&mut self, label_type: &str, tokens: Range<usize>, label: Label) -> Result<()> {
        if tokens.is_empty() || tokens.end > self.tokens.len() {
            return Err(Error::Prediction(format!(
                "span {tokens:?} out of range for sentence of {} tokens",
                self.tokens.len()
            )));
        }

        let first = &self.tokens[tokens.start];
        let last = &self.tokens[tokens.end - 1];
        let span = Span {
            text: self.text[first.bytes.start..last.bytes.end].to_string(),
            start_pos: first.start_pos,
            end_pos: last.end_pos,
            tokens,
            labels: vec![label],
        };
        self.spans.push((label_type.to_string(), span));
        Ok(())
    }

    /// Spans of a label type, ordered by position
    pub fn get_spans<'a>(&'a self, label_type: &'a str) -> impl Iterator<Item = &'a Span> + 'a {
        self.spans
            .iter()
            .filter(move |(t, _)| t == label_type)
            .map(|(_, span)| span)
    }

    /// Token-level labels of a type, with the token they belong to
    pub fn get_labels<'a>(
        &'a self,
        label_type: &'a str,
    ) -> impl Iterator<Item = (&'a Token, &'a Label)> + 'a {
        self.tokens
            .iter()
            .filter_map(move |token| token.get_label(label_type).map(|label| (token, label)))
    }

    /// Remove all spans and token labels of a type
    pub fn clear_labels(&mut self, label_type: &str) {
        self.spans.retain(|(t, _)| t != label_type);
        for token in &mut self.tokens {
            token.labels.retain(|(t, _)| t != label_type);
        }
    }

    pub(crate) fn sort_spans(&mut self) {
        self.spans.sort_by_key(|(_, span)| span.tokens.start);
    }
}
