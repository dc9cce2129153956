//! Segment command implementation

use super::common::CommonArgs;
use crate::error::CliError;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tcorpus_core::{segment, Level, SegmentOptions, SegmentationRules};

/// Arguments for the segment command
#[derive(Debug, Args)]
pub struct SegmentArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Segmentation level: paragraph, sentence or token [default: sentence]
    #[arg(short, long, value_name = "LEVEL")]
    pub level: Option<String>,

    /// Segmentation rules file (default: embedded English rules)
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Embedded rules by language code or name
    #[arg(long, value_name = "LANG", conflicts_with = "rules")]
    pub language: Option<String>,
}

impl SegmentArgs {
    /// Execute the segment command
    pub fn execute(&self) -> Result<()> {
        self.common.init_logging();
        log::debug!("Arguments: {:?}", self);

        let config = self.common.load_config()?;
        self.common.configure_threads(&config);

        let level: Level = self
            .level
            .as_deref()
            .unwrap_or(&config.processing.level)
            .parse()?;

        let mut builder = SegmentOptions::builder()
            .text_col(self.common.text_col(&config))
            .keep_cols(self.common.keep_cols(&config));
        if let Some(language) = &self.language {
            let rules = SegmentationRules::for_language(language)?;
            log::info!("Using embedded {} rules", rules.name());
            builder = builder.rules(rules);
        } else if let Some(path) = self.rules.as_ref().or(config.processing.rules.as_ref()) {
            let rules = SegmentationRules::from_file(path)
                .with_context(|| format!("Failed to load rules: {}", path.display()))?;
            log::info!("Using {} rules from {}", rules.name(), path.display());
            builder = builder.rules(Arc::new(rules));
        }
        let options = builder.build()?;

        let mut progress = ProgressReporter::new(self.common.quiet);
        let texts = self.common.read_input(&mut progress)?;
        progress.set_stage(&format!("Segmenting into {level}s"));

        let result = segment(&texts, level, &options).map_err(CliError::from)?;
        progress.finish();
        log::info!("Produced {} {} rows", result.len(), level);

        self.common.write_output(&result, &config)
    }
}
