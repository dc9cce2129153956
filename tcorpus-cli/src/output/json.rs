//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;
use tcorpus_core::{Frame, Record};

/// JSON formatter - outputs rows as a JSON array of objects
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    records: Vec<Record>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            records: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_frame(&mut self, frame: &Frame) -> Result<()> {
        self.records.extend(frame.to_records());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.records)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.records)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{sample_frame, SharedBuffer};
    use serde_json::json;

    #[test]
    fn test_array_of_rows() {
        let buffer = SharedBuffer::default();
        let mut formatter = JsonFormatter::new(buffer.clone(), false);
        formatter.format_frame(&sample_frame()).unwrap();
        formatter.finish().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
        assert_eq!(
            parsed,
            json!([
                {"sentence_id": 0, "token": "a|b", "score": 0.5},
                {"sentence_id": 1, "token": "line\nbreak", "score": null}
            ])
        );
    }

    #[test]
    fn test_empty_frame_is_empty_array() {
        let buffer = SharedBuffer::default();
        let mut formatter = JsonFormatter::new(buffer.clone(), true);
        formatter.format_frame(&Frame::new()).unwrap();
        formatter.finish().unwrap();
        assert_eq!(buffer.contents().trim(), "[]");
    }
}
