//! NER command implementation

use super::common::{CommonArgs, ModelArgs};
use crate::error::CliError;
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::Args;
use tcorpus_core::{ner, NerOptions};

/// Arguments for the ner command
#[derive(Debug, Args)]
pub struct NerArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Skip sentences longer than this many characters (0 = no limit)
    #[arg(long, value_name = "CHARS")]
    pub max_sentence_len: Option<usize>,
}

impl NerArgs {
    /// Execute the ner command
    pub fn execute(&self) -> Result<()> {
        self.common.init_logging();
        log::debug!("Arguments: {:?}", self);

        let config = self.common.load_config()?;
        self.common.configure_threads(&config);

        let max_len = self
            .max_sentence_len
            .unwrap_or(config.models.max_sentence_len);
        let options = NerOptions::builder()
            .text_col(self.common.text_col(&config))
            .keep_cols(self.common.keep_cols(&config))
            .max_sentence_len(Some(max_len))
            .mini_batch_size(self.model.mini_batch_size(&config))
            .build()?;
        let tagger = self.model.load_tagger(&config, &config.models.ner)?;

        let mut progress = ProgressReporter::new(self.common.quiet);
        let sentences = self.common.read_input(&mut progress)?;
        progress.set_stage("Recognizing entities");

        let entities = ner(&sentences, tagger.as_ref(), &options).map_err(CliError::from)?;
        progress.finish();
        log::info!("Found {} entities in {} rows", entities.len(), sentences.len());

        self.common.write_output(&entities, &config)
    }
}
