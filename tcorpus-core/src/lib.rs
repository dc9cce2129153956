//! Tabular segmentation, named entity recognition and part-of-speech
//! tagging for text corpora
//!
//! Texts go in and come out as [`Frame`]s: column-oriented tables whose
//! rows keep an index label pointing back at the input row. The three
//! corpus operations are
//!
//! - [`segment()`]: split a text column into paragraphs, sentences or tokens
//! - [`ner()`]: one row per entity span found by a [`SequenceTagger`]
//! - [`pos()`]: one row per token with its part-of-speech tag
//!
//! Caller-chosen `keep_cols` are carried from the input rows to every
//! output row derived from them.
//!
//! # Example
//!
//! ```rust
//! use tcorpus_core::{segment, Frame, Level, SegmentOptions, Value};
//!
//! let texts = Frame::from_columns(vec![
//!     ("text", vec![Value::from("Hello world. This is a test.")]),
//!     ("author", vec![Value::from("ann")]),
//! ])?;
//!
//! let options = SegmentOptions::builder().keep_cols(["author"]).build()?;
//! let sentences = segment(&texts, Level::Sentence, &options)?;
//!
//! assert_eq!(sentences.len(), 2);
//! assert_eq!(
//!     sentences.column_names(),
//!     vec!["paragraph_id", "text_id", "sentence", "author"]
//! );
//! # Ok::<(), tcorpus_core::Error>(())
//! ```
//!
//! Taggers are loaded by name with [`init_tagger`], which searches the
//! directory named by `TCORPUS_MODEL_DIR` before the embedded `ner-english`
//! and `pos-english` models:
//!
//! ```rust
//! use tcorpus_core::{init_tagger, ner, Frame, NerOptions, Value};
//!
//! let tagger = init_tagger("ner")?;
//! let sentences = Frame::from_columns(vec![(
//!     "text",
//!     vec![Value::from("Marie Curie worked in Paris.")],
//! )])?;
//!
//! let entities = ner(&sentences, tagger.as_ref(), &NerOptions::default())?;
//! assert_eq!(entities.column("entity_text").unwrap()[1], Value::from("Paris"));
//! # Ok::<(), tcorpus_core::Error>(())
//! ```

pub mod error;
pub mod frame;
pub mod ner;
pub mod pos;
pub mod segment;
pub mod tagger;

pub use error::{Error, Result};
pub use frame::{Frame, Record, Value};
pub use ner::{ner, ner_with_model, NerOptions, NerOptionsBuilder};
pub use pos::{pos, PosOptions, PosOptionsBuilder};
pub use segment::{segment, split_string, Level, SegmentOptions, SegmentationRules, Segmenter};
pub use tagger::{init_tagger, predict_batched, ModelLibrary, Sentence, SequenceTagger};
