//! POS command implementation

use super::common::{CommonArgs, ModelArgs};
use crate::error::CliError;
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::Args;
use tcorpus_core::{pos, PosOptions};

/// Arguments for the pos command
#[derive(Debug, Args)]
pub struct PosArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl PosArgs {
    /// Execute the pos command
    pub fn execute(&self) -> Result<()> {
        self.common.init_logging();
        log::debug!("Arguments: {:?}", self);

        let config = self.common.load_config()?;
        self.common.configure_threads(&config);

        let options = PosOptions::builder()
            .text_col(self.common.text_col(&config))
            .keep_cols(self.common.keep_cols(&config))
            .mini_batch_size(self.model.mini_batch_size(&config))
            .build()?;
        let tagger = self.model.load_tagger(&config, &config.models.pos)?;

        let mut progress = ProgressReporter::new(self.common.quiet);
        let sentences = self.common.read_input(&mut progress)?;
        progress.set_stage("Tagging tokens");

        let tags = pos(&sentences, tagger.as_ref(), &options).map_err(CliError::from)?;
        progress.finish();
        log::info!("Tagged {} tokens in {} rows", tags.len(), sentences.len());

        self.common.write_output(&tags, &config)
    }
}
