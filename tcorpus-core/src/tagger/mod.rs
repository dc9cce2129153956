//! Sequence tagging models
//!
//! Taggers annotate [`Sentence`]s in place: span taggers (NER) add
//! [`Span`]s, token taggers (POS) attach a [`Label`] to each token. Any
//! inference engine can be used with the corpus operations by implementing
//! [`SequenceTagger`]; the crate ships rule and lexicon based taggers that
//! are loaded by name through a [`ModelLibrary`].

mod gazetteer;
mod lexicon;
mod model;
mod sentence;

pub use gazetteer::GazetteerTagger;
pub use lexicon::LexiconTagger;
pub use model::{init_tagger, ModelLibrary, ModelMetadata, ModelSpec, TagType, MODEL_DIR_ENV};
pub use sentence::{Label, Sentence, Span, Token};

use crate::error::Result;

/// A model that labels sentences
pub trait SequenceTagger: Send + Sync {
    /// Model name
    fn name(&self) -> &str;

    /// Label type written by this model, e.g. `ner` or `pos`
    fn label_type(&self) -> &str;

    /// Predict labels for a batch of sentences in place
    fn predict(&self, sentences: &mut [Sentence]) -> Result<()>;

    /// Release memory cached between predictions
    fn empty_cache(&self) {}
}

/// Run `tagger` over `sentences` in mini-batches, then empty its cache
pub fn predict_batched<T>(tagger: &T, sentences: &mut [Sentence], mini_batch_size: usize) -> Result<()>
where
    T: SequenceTagger + ?Sized,
{
    let batch_size = mini_batch_size.max(1);
    let batches = sentences.len().div_ceil(batch_size);
    log::debug!(
        "Predicting {} sentences with '{}' in {} batches",
        sentences.len(),
        tagger.name(),
        batches
    );

    for (i, batch) in sentences.chunks_mut(batch_size).enumerate() {
        log::trace!("Batch {}/{} ({} sentences)", i + 1, batches, batch.len());
        tagger.predict(batch)?;
    }

    tagger.empty_cache();
    Ok(())
}
