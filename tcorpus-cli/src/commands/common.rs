//! Arguments shared by the corpus commands

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::OutputFormat;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use tcorpus_core::{Frame, ModelLibrary, SequenceTagger};

/// Input, output and logging arguments
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Input files or patterns (supports glob); .jsonl and .json files hold row objects
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format [default: text, or output.default_format from the config]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Column holding the text
    #[arg(long, value_name = "NAME")]
    pub text_col: Option<String>,

    /// Columns copied to every output row (comma separated)
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub keep_cols: Vec<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of worker threads (0 = number of CPUs)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }

    /// Load the configuration file, if any
    pub fn load_config(&self) -> Result<CliConfig> {
        CliConfig::load(self.config.as_deref())
    }

    /// Size the global worker pool
    pub fn configure_threads(&self, config: &CliConfig) {
        let mut performance = config.performance.clone();
        if let Some(threads) = self.threads {
            performance.worker_threads = threads;
        }
        let threads = performance.resolved_threads();

        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            Ok(()) => log::debug!("Using {threads} worker threads"),
            Err(e) => log::debug!("Worker pool already configured: {e}"),
        }
    }

    /// Text column from the flag or the config
    pub fn text_col(&self, config: &CliConfig) -> String {
        self.text_col
            .clone()
            .unwrap_or_else(|| config.processing.text_col.clone())
    }

    /// Keep columns from the flag or the config
    pub fn keep_cols(&self, config: &CliConfig) -> Vec<String> {
        if self.keep_cols.is_empty() {
            config.processing.keep_cols.clone()
        } else {
            self.keep_cols.clone()
        }
    }

    /// Output format from the flag or the config
    pub fn format(&self, config: &CliConfig) -> Result<OutputFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => OutputFormat::from_str(&config.output.default_format, true).map_err(|_| {
                CliError::ConfigError(format!(
                    "unknown output format '{}'",
                    config.output.default_format
                ))
                .into()
            }),
        }
    }

    /// Read every input file into one frame of rows
    pub fn read_input(&self, progress: &mut ProgressReporter) -> Result<Frame> {
        let files = resolve_patterns(&self.input)?;
        log::info!("Reading {} input files", files.len());
        progress.init_files(files.len() as u64);

        let mut records = Vec::new();
        for path in &files {
            records.extend(FileReader::read_records(path)?);
            progress.file_completed(&path.display().to_string());
        }

        let frame = Frame::from_records(&records);
        log::info!(
            "Read {} rows with columns {:?}",
            frame.len(),
            frame.column_names()
        );
        Ok(frame)
    }

    /// Write a result frame in the configured format
    pub fn write_output(&self, frame: &Frame, config: &CliConfig) -> Result<()> {
        let format = self.format(config)?;
        let pretty = config.output.pretty_json;

        let mut formatter = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                format.formatter(BufWriter::new(file), pretty)
            }
            None => format.formatter(io::stdout(), pretty),
        };

        formatter.format_frame(frame)?;
        formatter.finish()?;
        log::info!("Wrote {} rows as {}", frame.len(), format.as_str());
        Ok(())
    }
}

/// Model selection arguments
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Model name or path to a model file
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// Directory searched for model files
    #[arg(long, value_name = "DIR", env = "TCORPUS_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Sentences per prediction call
    #[arg(long, value_name = "N")]
    pub mini_batch_size: Option<usize>,
}

impl ModelArgs {
    /// Model library searching the flag, env or config directory
    pub fn library(&self, config: &CliConfig) -> ModelLibrary {
        match self.model_dir.as_ref().or(config.models.model_dir.as_ref()) {
            Some(dir) => ModelLibrary::with_dir(dir),
            None => ModelLibrary::new(),
        }
    }

    /// Load the requested model, or `default` when none was given
    pub fn load_tagger(&self, config: &CliConfig, default: &str) -> Result<Arc<dyn SequenceTagger>> {
        let name = self.model.as_deref().unwrap_or(default);
        let tagger = self
            .library(config)
            .load(name)
            .with_context(|| format!("Failed to load model '{name}'"))?;
        log::info!("Loaded model '{}' ({})", tagger.name(), tagger.label_type());
        Ok(tagger)
    }

    /// Mini-batch size from the flag or the config
    pub fn mini_batch_size(&self, config: &CliConfig) -> usize {
        self.mini_batch_size.unwrap_or(config.models.mini_batch_size)
    }
}
