//! File reading utilities

use crate::error::CliError;
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tcorpus_core::Record;

/// How an input file is turned into rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `.jsonl`: one JSON object per line
    JsonLines,
    /// `.json`: an array of JSON objects
    Json,
    /// Anything else: the whole file is one `{file, text}` row
    Text,
}

impl InputKind {
    /// Detect the kind from the file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => InputKind::JsonLines,
            Some("json") => InputKind::Json,
            _ => InputKind::Text,
        }
    }
}

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read a file as row records according to its [`InputKind`]
    pub fn read_records(path: &Path) -> Result<Vec<Record>> {
        let content = Self::read_text(path)?;
        let kind = InputKind::from_path(path);
        log::debug!("Reading {} as {:?}", path.display(), kind);

        match kind {
            InputKind::JsonLines => parse_json_lines(path, &content),
            InputKind::Json => parse_json_array(path, &content),
            InputKind::Text => {
                let mut record = Record::new();
                record.insert(
                    "file".to_string(),
                    JsonValue::String(path.display().to_string()),
                );
                record.insert("text".to_string(), JsonValue::String(content));
                Ok(vec![record])
            }
        }
    }
}

fn invalid(path: &Path, reason: String) -> CliError {
    CliError::InputError {
        path: path.display().to_string(),
        reason,
    }
}

fn parse_json_lines(path: &Path, content: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: JsonValue = serde_json::from_str(line)
            .map_err(|e| invalid(path, format!("line {}: {e}", i + 1)))?;
        match value {
            JsonValue::Object(record) => records.push(record),
            _ => return Err(invalid(path, format!("line {} is not a JSON object", i + 1)).into()),
        }
    }

    Ok(records)
}

fn parse_json_array(path: &Path, content: &str) -> Result<Vec<Record>> {
    let value: JsonValue =
        serde_json::from_str(content).map_err(|e| invalid(path, e.to_string()))?;
    let JsonValue::Array(items) = value else {
        return Err(invalid(path, "expected an array of JSON objects".to_string()).into());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| -> Result<Record> {
            match item {
                JsonValue::Object(record) => Ok(record),
                _ => Err(invalid(path, format!("element {i} is not a JSON object")).into()),
            }
        })
        .collect()
}
