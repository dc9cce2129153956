//! CLI command implementations

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub mod ner;
pub mod pos;
pub mod segment;
pub mod validate;

use crate::output::OutputFormat;
use tcorpus_core::{Level, ModelLibrary};

/// Segmentation, named entity recognition and part-of-speech tagging for text corpora
#[derive(Debug, Parser)]
#[command(name = "tcorpus", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split texts into paragraphs, sentences or tokens
    Segment(segment::SegmentArgs),

    /// Recognize named entities in sentences
    Ner(ner::NerArgs),

    /// Tag the tokens of sentences with their part of speech
    Pos(pos::PosArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Validate a segmentation rules file or a model file
    Validate(validate::ValidateArgs),
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List segmentation levels
    Levels,

    /// List available output formats
    Formats,

    /// List loadable models
    Models {
        /// Directory searched for model files
        #[arg(long, value_name = "DIR", env = "TCORPUS_MODEL_DIR")]
        model_dir: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Segment(args) => args.execute(),
            Commands::Ner(args) => args.execute(),
            Commands::Pos(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
            Commands::Validate(args) => args.execute(),
        }
    }
}

impl ListCommands {
    /// Print the requested listing
    pub fn execute(&self) -> Result<()> {
        match self {
            ListCommands::Levels => {
                println!("Segmentation levels:");
                for level in Level::ALL {
                    let columns = match level {
                        Level::Paragraph => "<text_col>_id, paragraph",
                        Level::Sentence => "paragraph_id, <text_col>_id, sentence",
                        Level::Token => "sentence_id, paragraph_id, <text_col>_id, token",
                    };
                    println!("  {:<10} - {}", level.as_str(), columns);
                }
            }
            ListCommands::Formats => {
                println!("Output formats:");
                for (format, description) in OutputFormat::ALL {
                    println!("  {:<10} - {}", format.as_str(), description);
                }
            }
            ListCommands::Models { model_dir } => {
                let library = match model_dir {
                    Some(dir) => ModelLibrary::with_dir(dir),
                    None => ModelLibrary::new(),
                };
                println!("Available models:");
                for name in library.available() {
                    match library.load_spec(&name) {
                        Ok(spec) => println!(
                            "  {:<20} - {} ({})",
                            name,
                            spec.metadata.tag_type.label_type(),
                            spec.metadata.description.as_deref().unwrap_or("no description")
                        ),
                        Err(e) => println!("  {:<20} - invalid: {}", name, e),
                    }
                }
                if let Some(dir) = library.model_dir() {
                    println!();
                    println!("Model directory: {}", dir.display());
                }
            }
        }
        Ok(())
    }
}
