//! Error types for corpus operations

use thiserror::Error;

/// Errors raised by frame manipulation, segmentation and tagging
#[derive(Error, Debug)]
pub enum Error {
    /// One or more requested keep columns are absent from the input frame
    #[error("at least one column in keep_cols is missing in {frame} data frame: {missing:?}")]
    MissingColumns {
        /// Name of the input frame ("texts" or "sentences")
        frame: &'static str,
        /// The columns that could not be found
        missing: Vec<String>,
    },

    /// A single named column is absent
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// A column with this name already exists
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    /// A column does not have as many cells as the frame has rows
    #[error("column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        /// The offending column
        column: String,
        /// Number of rows in the frame
        expected: usize,
        /// Number of cells supplied
        actual: usize,
    },

    /// Unknown segmentation level
    #[error("level must be one of \"paragraph\", \"sentence\" or \"token\", got '{0}'")]
    InvalidLevel(String),

    /// Segmentation rules failed validation
    #[error("invalid segmentation rules: {0}")]
    InvalidRules(String),

    /// No model with this name in the library
    #[error("model '{0}' not found")]
    ModelNotFound(String),

    /// A model file was found but failed validation
    #[error("invalid model '{name}': {reason}")]
    InvalidModel {
        /// Model name or path
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// A tagger failed during prediction
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Invalid options
    #[error("configuration error: {0}")]
    Configuration(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for corpus operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_display() {
        let error = Error::MissingColumns {
            frame: "texts",
            missing: vec!["author".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "at least one column in keep_cols is missing in texts data frame: [\"author\"]"
        );
    }

    #[test]
    fn test_invalid_level_display() {
        let error = Error::InvalidLevel("word".to_string());
        assert!(error.to_string().starts_with("level must be one of"));
        assert!(error.to_string().contains("'word'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: Error = io.into();
        assert!(matches!(error, Error::Io(_)));
        assert_eq!(error.to_string(), "I/O error: gone");
    }
}
