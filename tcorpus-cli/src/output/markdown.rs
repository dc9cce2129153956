//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;
use tcorpus_core::Frame;

/// Markdown formatter - outputs rows as a markdown table
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    header_written: bool,
    row_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
            row_count: 0,
        }
    }
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_frame(&mut self, frame: &Frame) -> Result<()> {
        if !self.header_written {
            let names = frame.column_names();
            writeln!(self.writer, "| {} |", names.join(" | "))?;
            writeln!(self.writer, "|{}", " --- |".repeat(names.len()))?;
            self.header_written = true;
        }
        for row in 0..frame.len() {
            let cells: Vec<String> = frame.row(row).map(|v| escape(&v.to_text())).collect();
            writeln!(self.writer, "| {} |", cells.join(" | "))?;
            self.row_count += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total rows: {}*", self.row_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
