//! JSON Lines output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;
use tcorpus_core::Frame;

/// JSON Lines formatter - outputs one JSON object per row
pub struct JsonLinesFormatter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesFormatter<W> {
    /// Create a new JSON Lines formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonLinesFormatter<W> {
    fn format_frame(&mut self, frame: &Frame) -> Result<()> {
        for record in frame.to_records() {
            serde_json::to_writer(&mut self.writer, &record)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
