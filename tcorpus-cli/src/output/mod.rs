//! Output formatting module

use anyhow::Result;
use std::io::Write;
use tcorpus_core::Frame;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output the rows of a frame
    fn format_frame(&mut self, frame: &Frame) -> Result<()>;

    /// Finalize output (e.g., flush buffered rows)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod jsonl;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use jsonl::JsonLinesFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated rows with a header line
    Text,
    /// JSON array of row objects
    Json,
    /// One JSON object per line
    Jsonl,
    /// Markdown table
    Markdown,
}

impl OutputFormat {
    /// All formats with a short description
    pub const ALL: [(OutputFormat, &'static str); 4] = [
        (OutputFormat::Text, "Tab-separated rows with a header line"),
        (OutputFormat::Json, "JSON array of row objects"),
        (OutputFormat::Jsonl, "One JSON object per line"),
        (OutputFormat::Markdown, "Markdown table"),
    ];

    /// Name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Markdown => "markdown",
        }
    }

    /// Create a formatter writing to `writer`
    pub fn formatter<W>(self, writer: W, pretty_json: bool) -> Box<dyn OutputFormatter>
    where
        W: Write + Send + Sync + 'static,
    {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty_json)),
            OutputFormat::Jsonl => Box::new(JsonLinesFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }
}
