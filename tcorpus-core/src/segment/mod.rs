//! Segmentation of text columns into paragraphs, sentences or tokens

mod rules;
mod segmenter;
mod tokenizer;

pub use rules::{RulesConfig, SegmentationRules};
pub use segmenter::{Paragraph, Segmenter, SentenceTokens};
pub use tokenizer::{join_tokens, tokenize, Token};

use crate::error::{Error, Result};
use crate::frame::{Frame, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Granularity of segmentation output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// One row per paragraph
    Paragraph,
    /// One row per sentence
    Sentence,
    /// One row per token
    Token,
}

impl Level {
    /// All levels, coarsest first
    pub const ALL: [Level; 3] = [Level::Paragraph, Level::Sentence, Level::Token];

    /// Name used in output columns and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Paragraph => "paragraph",
            Level::Sentence => "sentence",
            Level::Token => "token",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "paragraph" => Ok(Level::Paragraph),
            "sentence" => Ok(Level::Sentence),
            "token" => Ok(Level::Token),
            other => Err(Error::InvalidLevel(other.to_string())),
        }
    }
}

/// Options for [`segment`]
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    pub(crate) text_col: String,
    pub(crate) keep_cols: Vec<String>,
    pub(crate) segmenter: Segmenter,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            text_col: "text".to_string(),
            keep_cols: Vec::new(),
            segmenter: Segmenter::default(),
        }
    }
}

impl SegmentOptions {
    /// Create an options builder
    pub fn builder() -> SegmentOptionsBuilder {
        SegmentOptionsBuilder::default()
    }

    /// Column holding the text
    pub fn text_col(&self) -> &str {
        &self.text_col
    }

    /// Columns carried over to the output
    pub fn keep_cols(&self) -> &[String] {
        &self.keep_cols
    }
}

/// Fluent builder for [`SegmentOptions`]
#[derive(Debug, Default)]
pub struct SegmentOptionsBuilder {
    text_col: Option<String>,
    keep_cols: Vec<String>,
    rules: Option<Arc<SegmentationRules>>,
}

impl SegmentOptionsBuilder {
    /// Set the text column (default `text`)
    pub fn text_col(mut self, name: impl Into<String>) -> Self {
        self.text_col = Some(name.into());
        self
    }

    /// Set the columns to keep
    pub fn keep_cols<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_cols = names.into_iter().map(Into::into).collect();
        self
    }

    /// Use custom segmentation rules
    pub fn rules(mut self, rules: Arc<SegmentationRules>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Build the options
    pub fn build(self) -> Result<SegmentOptions> {
        let text_col = self.text_col.unwrap_or_else(|| "text".to_string());
        if text_col.is_empty() {
            return Err(Error::Configuration("text_col must not be empty".into()));
        }

        Ok(SegmentOptions {
            text_col,
            keep_cols: self.keep_cols,
            segmenter: self.rules.map(Segmenter::new).unwrap_or_default(),
        })
    }
}

/// Split a string into nested lists of segments
///
/// - `Paragraph`: list of paragraph strings
/// - `Sentence`: list (per paragraph) of sentence strings
/// - `Token`: list (per paragraph) of lists (per sentence) of token values
pub fn split_string(segmenter: &Segmenter, text: &str, level: Level) -> Value {
    let paragraphs = segmenter
        .analyze(text)
        .into_iter()
        .map(|paragraph| {
            let sentences: Vec<Value> = paragraph
                .iter()
                .map(|sentence| match level {
                    Level::Token => Value::List(
                        sentence.iter().map(|t| Value::from(t.value.as_str())).collect(),
                    ),
                    _ => Value::from(join_tokens(sentence).trim()),
                })
                .collect();

            match level {
                Level::Paragraph => Value::from(
                    sentences
                        .iter()
                        .map(Value::to_text)
                        .collect::<Vec<_>>()
                        .join(" "),
                ),
                _ => Value::List(sentences),
            }
        })
        .collect();

    Value::List(paragraphs)
}

/// Create a frame of segments from a frame of texts
///
/// The output has one row per segment at `level`. Id columns come first,
/// finest level first: `sentence_id`, `paragraph_id`, `<text_col>_id`.
/// `<text_col>_id` is the index label of the source row, the other ids
/// number the rows of the previous level. Keep columns follow the segment
/// column.
pub fn segment(texts: &Frame, level: Level, options: &SegmentOptions) -> Result<Frame> {
    texts.require_columns(&options.keep_cols, "texts")?;
    let column = texts
        .column(&options.text_col)
        .ok_or_else(|| Error::ColumnNotFound(options.text_col.clone()))?;

    log::debug!(
        "Segmenting {} texts from column '{}' at {} level",
        texts.len(),
        options.text_col,
        level
    );

    let nested = split_column(&options.segmenter, column, level);
    let mut df = Frame::from_parts(texts.index().to_vec(), vec![("paragraph".to_string(), nested)])?
        .explode("paragraph")?
        .join(texts, &options.keep_cols)?
        .reset_index(&format!("{}_id", options.text_col))?;
    if level == Level::Paragraph {
        return Ok(df);
    }

    df = df.explode("paragraph")?;
    df.rename("paragraph", "sentence")?;
    df = df.reset_index("paragraph_id")?;
    if level == Level::Sentence {
        return Ok(df);
    }

    df = df.explode("sentence")?;
    df.rename("sentence", "token")?;
    df.reset_index("sentence_id")
}

#[cfg(feature = "parallel")]
fn split_column(segmenter: &Segmenter, column: &[Value], level: Level) -> Vec<Value> {
    use rayon::prelude::*;

    column
        .par_iter()
        .map(|cell| split_string(segmenter, &cell.to_text(), level))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn split_column(segmenter: &Segmenter, column: &[Value], level: Level) -> Vec<Value> {
    column
        .iter()
        .map(|cell| split_string(segmenter, &cell.to_text(), level))
        .collect()
}
