//! Named entity recognition over a frame of sentences

use crate::error::{Error, Result};
use crate::frame::{Frame, Value};
use crate::tagger::{init_tagger, predict_batched, Sentence, SequenceTagger};

/// Default upper bound on sentence length in chars
pub const DEFAULT_MAX_SENTENCE_LEN: usize = 5000;

/// Default number of sentences per prediction call
pub const DEFAULT_MINI_BATCH_SIZE: usize = 32;

/// Options for [`ner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NerOptions {
    pub(crate) text_col: String,
    pub(crate) keep_cols: Vec<String>,
    pub(crate) max_sentence_len: Option<usize>,
    pub(crate) mini_batch_size: usize,
}

impl Default for NerOptions {
    fn default() -> Self {
        Self {
            text_col: "text".to_string(),
            keep_cols: Vec::new(),
            max_sentence_len: Some(DEFAULT_MAX_SENTENCE_LEN),
            mini_batch_size: DEFAULT_MINI_BATCH_SIZE,
        }
    }
}

impl NerOptions {
    /// Create an options builder
    pub fn builder() -> NerOptionsBuilder {
        NerOptionsBuilder::default()
    }

    /// Column holding the sentence text
    pub fn text_col(&self) -> &str {
        &self.text_col
    }

    /// Columns carried over to the output
    pub fn keep_cols(&self) -> &[String] {
        &self.keep_cols
    }

    /// Longest sentence passed to the tagger, `None` for no limit
    pub fn max_sentence_len(&self) -> Option<usize> {
        self.max_sentence_len
    }

    /// Sentences per prediction call
    pub fn mini_batch_size(&self) -> usize {
        self.mini_batch_size
    }
}

/// Fluent builder for [`NerOptions`]
#[derive(Debug, Default)]
pub struct NerOptionsBuilder {
    text_col: Option<String>,
    keep_cols: Vec<String>,
    max_sentence_len: Option<Option<usize>>,
    mini_batch_size: Option<usize>,
}

impl NerOptionsBuilder {
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

    /// Drop sentences longer than `len` chars; `None` or `0` keeps all
    pub fn max_sentence_len(mut self, len: Option<usize>) -> Self {
        self.max_sentence_len = Some(len);
        self
    }

    /// Set the number of sentences per prediction call (default 32)
    pub fn mini_batch_size(mut self, size: usize) -> Self {
        self.mini_batch_size = Some(size);
        self
    }

    /// Build the options
    pub fn build(self) -> Result<NerOptions> {
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

        Ok(NerOptions {
            text_col,
            keep_cols: self.keep_cols,
            max_sentence_len: self
                .max_sentence_len
                .unwrap_or(Some(DEFAULT_MAX_SENTENCE_LEN)),
            mini_batch_size,
        })
    }
}

/// Recognize named entities in a frame of sentences
///
/// Every text cell is rendered as a string and, when a positive
/// `max_sentence_len` is set, rows with longer texts are left out. The
/// result has one row per entity span with columns `sentence_id` (the
/// index label of the source row), `entity_text`, `start_pos`, `end_pos`,
/// `entity_type` and `confidence`, followed by the keep columns.
pub fn ner<T>(sentences: &Frame, tagger: &T, options: &NerOptions) -> Result<Frame>
where
    T: SequenceTagger + ?Sized,
{
    sentences.require_columns(&options.keep_cols, "sentences")?;
    let column = sentences
        .column(&options.text_col)
        .ok_or_else(|| Error::ColumnNotFound(options.text_col.clone()))?;

    let texts: Vec<String> = column.iter().map(Value::to_text).collect();
    let rows: Vec<usize> = match options.max_sentence_len.filter(|&max| max > 0) {
        Some(max) => (0..texts.len())
            .filter(|&row| texts[row].chars().count() <= max)
            .collect(),
        None => (0..texts.len()).collect(),
    };
    if rows.len() < texts.len() {
        log::debug!(
            "Skipping {} sentences longer than {:?} chars",
            texts.len() - rows.len(),
            options.max_sentence_len
        );
    }

    let mut batch: Vec<Sentence> = rows.iter().map(|&row| Sentence::new(texts[row].as_str())).collect();
    predict_batched(tagger, &mut batch, options.mini_batch_size)?;

    let label_type = tagger.label_type();
    let mut index = Vec::new();
    let mut entity_text = Vec::new();
    let mut start_pos = Vec::new();
    let mut end_pos = Vec::new();
    let mut entity_type = Vec::new();
    let mut confidence = Vec::new();

    for (sentence, &row) in batch.iter().zip(&rows) {
        for span in sentence.get_spans(label_type) {
            let label = span.label();
            index.push(sentences.index()[row]);
            entity_text.push(Value::from(span.text()));
            start_pos.push(Value::from(span.start_pos()));
            end_pos.push(Value::from(span.end_pos()));
            entity_type.push(Value::from(label.value.as_str()));
            confidence.push(Value::from(label.score));
        }
    }
    log::debug!(
        "Found {} entities in {} sentences with '{}'",
        index.len(),
        batch.len(),
        tagger.name()
    );

    Frame::from_parts(
        index,
        vec![
            ("entity_text".to_string(), entity_text),
            ("start_pos".to_string(), start_pos),
            ("end_pos".to_string(), end_pos),
            ("entity_type".to_string(), entity_type),
            ("confidence".to_string(), confidence),
        ],
    )?
    .join(sentences, &options.keep_cols)?
    .reset_index("sentence_id")
}

/// Load a tagger by name and recognize entities with it
///
/// Convenience for one-off calls; load the tagger once with
/// [`init_tagger`] when processing several frames.
pub fn ner_with_model(sentences: &Frame, model_name: &str, options: &NerOptions) -> Result<Frame> {
    let tagger = init_tagger(model_name)?;
    ner(sentences, tagger.as_ref(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::Label;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Labels every capitalised token as a one-token `ENT` span
    struct CapsTagger;

    impl SequenceTagger for CapsTagger {
        fn name(&self) -> &str {
            "caps"
        }

        fn label_type(&self) -> &str {
            "ner"
        }

        fn predict(&self, sentences: &mut [Sentence]) -> Result<()> {
            for sentence in sentences {
                let caps: Vec<usize> = sentence
                    .tokens()
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.text().chars().next().is_some_and(char::is_uppercase))
                    .map(|(i, _)| i)
                    .collect();
                for i in caps {
                    sentence.add_span("ner", i..i + 1, Label::new("ENT", 0.5))?;
                }
            }
            Ok(())
        }
    }

    /// Counts prediction calls and cache clears around another tagger
    struct Counting<T> {
        inner: T,
        calls: AtomicUsize,
        cleared: AtomicUsize,
    }

    impl<T> Counting<T> {
        fn new(inner: T) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
                cleared: AtomicUsize::new(0),
            }
        }
    }

    impl<T: SequenceTagger> SequenceTagger for Counting<T> {
        fn name(&self) -> &str {
            self.inner.name()
        }

        fn label_type(&self) -> &str {
            self.inner.label_type()
        }

        fn predict(&self, sentences: &mut [Sentence]) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.predict(sentences)
        }

        fn empty_cache(&self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sentences() -> Frame {
        Frame::from_columns(vec![
            (
                "text",
                vec![
                    Value::from("Ann met Bob"),
                    Value::from("nothing here"),
                    Value::from("see Paris"),
                ],
            ),
            (
                "doc",
                vec![Value::from("d1"), Value::from("d1"), Value::from("d2")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_entities_per_span() {
        let options = NerOptions::builder().keep_cols(["doc"]).build().unwrap();
        let df = ner(&sentences(), &CapsTagger, &options).unwrap();

        assert_eq!(
            df.column_names(),
            vec![
                "sentence_id",
                "entity_text",
                "start_pos",
                "end_pos",
                "entity_type",
                "confidence",
                "doc"
            ]
        );
        assert_eq!(df.len(), 3);
        assert_eq!(
            df.column("sentence_id").unwrap(),
            &[Value::Int(0), Value::Int(0), Value::Int(2)]
        );
        assert_eq!(
            df.column("entity_text").unwrap(),
            &[Value::from("Ann"), Value::from("Bob"), Value::from("Paris")]
        );
        assert_eq!(df.column("start_pos").unwrap()[1], Value::Int(8));
        assert_eq!(df.column("end_pos").unwrap()[1], Value::Int(11));
        assert_eq!(df.column("entity_type").unwrap()[2], Value::from("ENT"));
        assert_eq!(df.column("confidence").unwrap()[2], Value::Float(0.5));
        assert_eq!(df.column("doc").unwrap()[2], Value::from("d2"));
    }

    #[test]
    fn test_long_sentences_are_skipped() {
        let options = NerOptions::builder()
            .max_sentence_len(Some(10))
            .build()
            .unwrap();
        let df = ner(&sentences(), &CapsTagger, &options).unwrap();
        assert_eq!(df.column("entity_text").unwrap(), &[Value::from("Paris")]);
    }

    #[test]
    fn test_zero_or_none_max_len_keeps_everything() {
        for max in [None, Some(0)] {
            let options = NerOptions::builder().max_sentence_len(max).build().unwrap();
            let df = ner(&sentences(), &CapsTagger, &options).unwrap();
            assert_eq!(df.len(), 3);
        }
    }

    #[test]
    fn test_missing_keep_columns() {
        let options = NerOptions::builder()
            .keep_cols(["doc", "page"])
            .build()
            .unwrap();
        let err = ner(&sentences(), &CapsTagger, &options).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingColumns { frame: "sentences", missing } if missing == vec!["page".to_string()]
        ));
    }

    #[test]
    fn test_no_entities_gives_empty_frame_with_columns() {
        let frame = Frame::from_columns(vec![("text", vec![Value::from("all lower case")])]).unwrap();
        let df = ner(&frame, &CapsTagger, &NerOptions::default()).unwrap();
        assert!(df.is_empty());
        assert_eq!(df.column_names()[0], "sentence_id");
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn test_non_string_cells_are_rendered() {
        let frame = Frame::from_columns(vec![("text", vec![Value::Int(42), Value::Null])]).unwrap();
        let df = ner(&frame, &CapsTagger, &NerOptions::default()).unwrap();
        assert!(df.is_empty());
    }

    #[test]
    fn test_index_labels_survive() {
        let frame = Frame::from_parts(
            vec![7, 3],
            vec![("text".to_string(), vec![Value::from("x"), Value::from("Yes")])],
        )
        .unwrap();
        let df = ner(&frame, &CapsTagger, &NerOptions::default()).unwrap();
        assert_eq!(df.column("sentence_id").unwrap(), &[Value::Int(3)]);
    }

    #[test]
    fn test_small_batches_with_skipped_middle_row() {
        let frame = Frame::from_parts(
            vec![10, 11, 12, 13, 14],
            vec![
                (
                    "text".to_string(),
                    vec![
                        Value::from("Ann sings"),
                        Value::from("Bob and Cy"),
                        Value::from("Far too long for the limit"),
                        Value::from("no caps"),
                        Value::from("Dee"),
                    ],
                ),
                (
                    "doc".to_string(),
                    vec![
                        Value::from("a"),
                        Value::from("b"),
                        Value::from("c"),
                        Value::from("d"),
                        Value::from("e"),
                    ],
                ),
            ],
        )
        .unwrap();
        let tagger = Counting::new(CapsTagger);
        let options = NerOptions::builder()
            .keep_cols(["doc"])
            .max_sentence_len(Some(12))
            .mini_batch_size(2)
            .build()
            .unwrap();

        let df = ner(&frame, &tagger, &options).unwrap();

        assert_eq!(
            df.column("sentence_id").unwrap(),
            &[Value::Int(10), Value::Int(11), Value::Int(11), Value::Int(14)]
        );
        assert_eq!(
            df.column("entity_text").unwrap(),
            &[
                Value::from("Ann"),
                Value::from("Bob"),
                Value::from("Cy"),
                Value::from("Dee")
            ]
        );
        assert_eq!(
            df.column("doc").unwrap(),
            &[
                Value::from("a"),
                Value::from("b"),
                Value::from("b"),
                Value::from("e")
            ]
        );
        assert_eq!(tagger.calls.load(Ordering::SeqCst), 2);
        assert_eq!(tagger.cleared.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(matches!(
            NerOptions::builder().mini_batch_size(0).build(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_with_embedded_model() {
        let frame = Frame::from_columns(vec![(
            "text",
            vec![Value::from("Ada Lovelace was born in London.")],
        )])
        .unwrap();
        let df = ner_with_model(&frame, "ner", &NerOptions::default()).unwrap();
        assert_eq!(
            df.column("entity_type").unwrap(),
            &[Value::from("PER"), Value::from("LOC")]
        );
        assert_eq!(df.column("start_pos").unwrap()[1], Value::Int(25));
    }
}
