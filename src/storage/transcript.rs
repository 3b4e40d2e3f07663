use std::io::{self, Write};

use crate::terminal::Tone;

/// A record of everything shown to and typed by the user.
///
/// Every printed line is written to the output and appended to an in-memory
/// buffer. Lines the user typed are appended without being echoed. The buffer
/// is never cleared; it leaves memory only through [`Transcript::write_to`].
#[derive(Debug)]
pub struct Transcript<W> {
    output: W,
    buffer: String,
    color: bool,
}

impl<W: Write> Transcript<W> {
    /// Creates an empty transcript writing to `output`.
    #[must_use]
    pub const fn new(output: W) -> Self {
        Self {
            output,
            buffer: String::new(),
            color: false,
        }
    }

    /// Enables or disables colouring of toned lines on the output.
    #[must_use]
    pub const fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Shows `line` to the user and records it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn print(&mut self, line: &str) -> io::Result<()> {
        self.print_toned(line, Tone::Plain)
    }

    /// Shows `line` to the user in the given tone and records it as plain
    /// text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn print_toned(&mut self, line: &str, tone: Tone) -> io::Result<()> {
        self.record_input(line);
        writeln!(self.output, "{}", tone.paint(line, self.color))
    }

    /// Records a line the user typed without showing it again.
    pub fn record_input(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    /// Writes an empty line to the output without recording it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    pub fn separator(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        self.output.flush()
    }

    /// The recorded lines, each terminated by a newline.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// Writes the recorded lines verbatim to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<T: Write>(&self, writer: &mut T) -> io::Result<()> {
        writer.write_all(self.buffer.as_bytes())?;
        writer.flush()?;
        tracing::info!(bytes = self.buffer.len(), "wrote transcript");
        Ok(())
    }

    /// Consumes the transcript, returning the output.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }
}
