//! Part-of-speech tagging over a frame of sentences

use crate::error::{Error, Result};
use crate::frame::{Frame, Value};
use crate::ner::DEFAULT_MINI_BATCH_SIZE;
use crate::tagger::{predict_batched, Sentence, SequenceTagger};

/// Options for [`pos`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosOptions {
    pub(crate) text_col: String,
    pub(crate) keep_cols: Vec<String>,
    pub(crate) mini_batch_size: usize,
}

impl Default for PosOptions {
    fn default() -> Self {
        Self {
            text_col: "text".to_string(),
            keep_cols: Vec::new(),
            mini_batch_size: DEFAULT_MINI_BATCH_SIZE,
        }
    }
}

impl PosOptions {
    /// Create an options builder
    pub fn builder() -> PosOptionsBuilder {
        PosOptionsBuilder::default()
    }

    pub fn text_col(&self) -> &str {
        &self.text_col
    }

    pub fn keep_cols(&self) -> &[String] {
        &self.keep_cols
    }

    pub fn mini_batch_size(&self) -> usize {
        self.mini_batch_size
    }
}

/// Fluent builder for [`PosOptions`]
#[derive(Debug, Default)]
pub struct PosOptionsBuilder {
    text_col: Option<String>,
    keep_cols: Vec<String>,
    mini_batch_size: Option<usize>,
}

impl PosOptionsBuilder {
    pub fn text_col(mut self, name: impl Into<String>) -> Self {
        self.text_col = Some(name.into());
        self
    }

    pub fn keep_cols<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_cols = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn mini_batch_size(mut self, size: usize) -> Self {
        self.mini_batch_size = Some(size);
        self
    }

    pub fn build(self) -> Result<PosOptions> {
        let text_col = self.text_col.unwrap_or_else(|| "text".to_string());
        if text_col.is_empty() {
            return Err(Error::Configuration("text_col must not be empty".into()));
        }
        let mini_batch_size = self.mini_batch_size.unwrap_or(DEFAULT_MINI_BATCH_SIZE);
        if mini_batch_size == 0 {
            return Err(Error::Configuration(
                "mini_batch_size must be greater than 0".into(),
            ));
        }

        Ok(PosOptions {
            text_col,
            keep_cols: self.keep_cols,
            mini_batch_size,
        })
    }
}

/// Tag every token of a frame of sentences with its part of speech
///
/// Rows with a `Null` text are skipped. The result has one row per token
/// with columns `sentence_id` (the index label of the source row), `token`
/// and `pos`, followed by the keep columns.
pub fn pos<T>(sentences: &Frame, tagger: &T, options: &PosOptions) -> Result<Frame>
where
    T: SequenceTagger + ?Sized,
{
    sentences.require_columns(&options.keep_cols, "sentences")?;
    let present = sentences.drop_nulls(&options.text_col)?;
    if present.len() < sentences.len() {
        log::debug!("Skipping {} rows without text", sentences.len() - present.len());
    }

    let column = present
        .column(&options.text_col)
        .ok_or_else(|| Error::ColumnNotFound(options.text_col.clone()))?;
    let mut batch: Vec<Sentence> = column.iter().map(|cell| Sentence::new(cell.to_text())).collect();
    predict_batched(tagger, &mut batch, options.mini_batch_size)?;

    let label_type = tagger.label_type();
    let mut index = Vec::new();
    let mut tokens = Vec::new();
    let mut tags = Vec::new();

    for (sentence, &label) in batch.iter().zip(present.index()) {
        for (token, tag) in sentence.get_labels(label_type) {
            index.push(label);
            tokens.push(Value::from(token.text()));
            tags.push(Value::from(tag.value.as_str()));
        }
    }
    log::debug!(
        "Tagged {} tokens in {} sentences with '{}'",
        index.len(),
        batch.len(),
        tagger.name()
    );

    Frame::from_parts(
        index,
        vec![("token".to_string(), tokens), ("pos".to_string(), tags)],
    )?
    .join(&present, &options.keep_cols)?
    .reset_index("sentence_id")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::{Label, ModelLibrary};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tags tokens by length: `S` for one char, `L` otherwise
    struct LengthTagger;

    impl SequenceTagger for LengthTagger {
        fn name(&self) -> &str {
            "length"
        }

        fn label_type(&self) -> &str {
            "pos"
        }

        fn predict(&self, sentences: &mut [Sentence]) -> Result<()> {
            for sentence in sentences {
                for token in sentence.tokens_mut() {
                    let tag = if token.text().chars().count() == 1 { "S" } else { "L" };
                    token.set_label("pos", Label::new(tag, 1.0));
                }
            }
            Ok(())
        }
    }

    /// `LengthTagger` that counts prediction calls and cache clears
    #[derive(Default)]
    struct CountingLengthTagger {
        calls: AtomicUsize,
        cleared: AtomicUsize,
    }

    impl SequenceTagger for CountingLengthTagger {
        fn name(&self) -> &str {
            "counting-length"
        }

        fn label_type(&self) -> &str {
            "pos"
        }

        fn predict(&self, sentences: &mut [Sentence]) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            LengthTagger.predict(sentences)
        }

        fn empty_cache(&self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sentences() -> Frame {
        Frame::from_columns(vec![
            (
                "text",
                vec![Value::from("I run."), Value::Null, Value::from("Go")],
            ),
            ("doc", vec![Value::Int(1), Value::Int(1), Value::Int(2)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_one_row_per_token() {
        let options = PosOptions::builder().keep_cols(["doc"]).build().unwrap();
        let df = pos(&sentences(), &LengthTagger, &options).unwrap();

        assert_eq!(df.column_names(), vec!["sentence_id", "token", "pos", "doc"]);
        assert_eq!(
            df.column("sentence_id").unwrap(),
            &[Value::Int(0), Value::Int(0), Value::Int(0), Value::Int(2)]
        );
        assert_eq!(
            df.column("token").unwrap(),
            &[
                Value::from("I"),
                Value::from("run"),
                Value::from("."),
                Value::from("Go")
            ]
        );
        assert_eq!(
            df.column("pos").unwrap(),
            &[Value::from("S"), Value::from("L"), Value::from("S"), Value::from("L")]
        );
        assert_eq!(df.column("doc").unwrap()[3], Value::Int(2));
    }

    #[test]
    fn test_single_sentence_batches_skip_null_row() {
        let frame = Frame::from_columns(vec![
            (
                "text",
                vec![
                    Value::from("Hi"),
                    Value::from("A b"),
                    Value::Null,
                    Value::from("Ok"),
                ],
            ),
            (
                "doc",
                vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)],
            ),
        ])
        .unwrap();
        let tagger = CountingLengthTagger::default();
        let options = PosOptions::builder()
            .keep_cols(["doc"])
            .mini_batch_size(1)
            .build()
            .unwrap();

        let df = pos(&frame, &tagger, &options).unwrap();

        assert_eq!(
            df.column("sentence_id").unwrap(),
            &[Value::Int(0), Value::Int(1), Value::Int(1), Value::Int(3)]
        );
        assert_eq!(
            df.column("token").unwrap(),
            &[
                Value::from("Hi"),
                Value::from("A"),
                Value::from("b"),
                Value::from("Ok")
            ]
        );
        assert_eq!(
            df.column("pos").unwrap(),
            &[Value::from("L"), Value::from("S"), Value::from("S"), Value::from("L")]
        );
        assert_eq!(
            df.column("doc").unwrap(),
            &[Value::Int(1), Value::Int(2), Value::Int(2), Value::Int(4)]
        );
        assert_eq!(tagger.calls.load(Ordering::SeqCst), 3);
        assert_eq!(tagger.cleared.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_keep_columns() {
        let options = PosOptions::builder().keep_cols(["page"]).build().unwrap();
        let err = pos(&sentences(), &LengthTagger, &options).unwrap_err();
        assert!(matches!(err, Error::MissingColumns { frame: "sentences", .. }));
    }

    #[test]
    fn test_missing_text_column() {
        let options = PosOptions::builder().text_col("body").build().unwrap();
        let err = pos(&sentences(), &LengthTagger, &options).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(name) if name == "body"));
    }

    #[test]
    fn test_with_embedded_model() {
        let tagger = ModelLibrary::new().load("pos").unwrap();
        let frame =
            Frame::from_columns(vec![("text", vec![Value::from("The cats are quickly running.")])])
                .unwrap();
        let df = pos(&frame, tagger.as_ref(), &PosOptions::default()).unwrap();
        assert_eq!(
            df.column("pos").unwrap(),
            &[
                Value::from("DT"),
                Value::from("NNS"),
                Value::from("VBP"),
                Value::from("RB"),
                Value::from("VBG"),
                Value::from(".")
            ]
        );
    }
}
