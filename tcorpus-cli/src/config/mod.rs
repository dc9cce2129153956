//! Configuration module

use crate::error::CliError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Model configuration
    #[serde(default)]
    pub models: ModelsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl CliConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), CliError> {
        if self.processing.text_col.is_empty() {
            return Err(CliError::ConfigError(
                "processing.text_col must not be empty".to_string(),
            ));
        }
        if self.models.mini_batch_size == 0 {
            return Err(CliError::ConfigError(
                "models.mini_batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Processing-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Column holding the text
    pub text_col: String,

    /// Columns copied to every output row
    pub keep_cols: Vec<String>,

    /// Default segmentation level
    pub level: String,

    /// Custom segmentation rules file
    pub rules: Option<PathBuf>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            text_col: "text".to_string(),
            keep_cols: Vec::new(),
            level: "sentence".to_string(),
            rules: None,
        }
    }
}

/// Model-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ModelsConfig {
    /// Default NER model name or path
    pub ner: String,

    /// Default POS model name or path
    pub pos: String,

    /// Directory searched for model files
    pub model_dir: Option<PathBuf>,

    /// Sentences per prediction call
    pub mini_batch_size: usize,

    /// Longest sentence (chars) passed to the NER model (0 = no limit)
    pub max_sentence_len: usize,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            ner: "ner-english".to_string(),
            pos: "pos-english".to_string(),
            model_dir: None,
            mini_batch_size: 32,
            max_sentence_len: 5000,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            pretty_json: true,
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl PerformanceConfig {
    /// Worker threads to use, resolving `0` to the number of CPUs
    pub fn resolved_threads(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus::get()
        } else {
            self.worker_threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tcorpus.toml");
        fs::write(
            &path,
            r#"
[processing]
keep_cols = ["doc"]

[models]
ner = "my-ner"
"#,
        )
        .unwrap();

        let config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config.processing.keep_cols, vec!["doc"]);
        assert_eq!(config.processing.text_col, "text");
        assert_eq!(config.models.ner, "my-ner");
        assert_eq!(config.models.pos, "pos-english");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[models]\nmini_batch_size = 0\n").unwrap();

        let err = CliConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("mini_batch_size"));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[processing\n").unwrap();

        let err = CliConfig::from_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_resolved_threads() {
        let config = PerformanceConfig { worker_threads: 3 };
        assert_eq!(config.resolved_threads(), 3);
        assert_eq!(PerformanceConfig::default().resolved_threads(), num_cpus::get());
    }
}
