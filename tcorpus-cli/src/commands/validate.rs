//! Validate command implementation

use anyhow::Result;
use clap::{ArgGroup, Args};
use std::path::PathBuf;
use tcorpus_core::{tagger::ModelSpec, SegmentationRules};

/// Arguments for the validate command
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["rules", "model"])))]
pub struct ValidateArgs {
    /// Path to a segmentation rules file to validate
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Path to a model file to validate
    #[arg(short, long, value_name = "FILE")]
    pub model: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        if let Some(path) = &self.rules {
            println!("Validating segmentation rules: {}", path.display());
            match SegmentationRules::from_file(path) {
                Ok(rules) => {
                    println!("✓ Rules are valid!");
                    println!("  Language code: {}", rules.code());
                    println!("  Language name: {}", rules.name());
                    println!("  Abbreviations: {}", rules.abbreviation_count());
                }
                Err(e) => {
                    println!("✗ Rules are invalid!");
                    println!("  Error: {e}");
                    return Err(anyhow::anyhow!("Validation failed: {}", e));
                }
            }
        }

        if let Some(path) = &self.model {
            println!("Validating model: {}", path.display());
            match ModelSpec::from_file(path).and_then(|spec| spec.build().map(|_| spec)) {
                Ok(spec) => {
                    println!("✓ Model is valid!");
                    println!("  Name: {}", spec.metadata.name);
                    println!("  Tag type: {}", spec.metadata.tag_type.label_type());
                    if let Some(language) = &spec.metadata.language {
                        println!("  Language: {language}");
                    }
                }
                Err(e) => {
                    println!("✗ Model is invalid!");
                    println!("  Error: {e}");
                    return Err(anyhow::anyhow!("Validation failed: {}", e));
                }
            }
        }

        Ok(())
    }
}
