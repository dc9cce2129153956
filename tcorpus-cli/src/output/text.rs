//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::{self, Write};
use tcorpus_core::Frame;

/// Plain text formatter - outputs a header line and one tab-separated line per row
pub struct TextFormatter<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

fn escape(cell: &str) -> String {
    cell.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_frame(&mut self, frame: &Frame) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", frame.column_names().join("\t"))?;
            self.header_written = true;
        }
        for row in 0..frame.len() {
            let cells: Vec<String> = frame.row(row).map(|v| escape(&v.to_text())).collect();
            writeln!(self.writer, "{}", cells.join("\t"))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{sample_frame, SharedBuffer};

    #[test]
    fn test_tab_separated_with_header() {
        let buffer = SharedBuffer::default();
        let mut formatter = TextFormatter::new(buffer.clone());
        formatter.format_frame(&sample_frame()).unwrap();
        formatter.finish().unwrap();

        assert_eq!(
            buffer.contents(),
            "sentence_id\ttoken\tscore\n0\ta|b\t0.5\n1\tline\\nbreak\t\n"
        );
    }
}
