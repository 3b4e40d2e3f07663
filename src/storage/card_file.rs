//! Plain-text card files.
//!
//! A card file is a flat sequence of lines alternating term and definition:
//!
//! ```text
//! cat
//! animal
//! dog
//! pet
//! ```
//!
//! There is no escaping, so a term or definition containing a newline cannot
//! be represented.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use tracing::instrument;

use crate::Deck;

/// The contents of a card file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CardFile {
    /// Every line read, in order.
    pub lines: Vec<String>,
    /// The committed `(term, definition)` pairs.
    ///
    /// Even lines set the pending term and odd lines the pending definition.
    /// A pair is committed, and both halves cleared, as soon as both are
    /// non-empty, so a half left over from an incomplete pair can combine with
    /// a later line.
    pub cards: Vec<(String, String)>,
}

impl CardFile {
    /// The number of cards reported as loaded.
    ///
    /// This counts consumed line pairs, including pairs that committed
    /// nothing because a half was empty.
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.lines.len() / 2
    }
}

/// Errors that can occur when importing a card file.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The card file could not be opened.
    #[error("File not found.")]
    NotFound(#[source] io::Error),

    /// The card file was opened but reading it failed.
    #[error("failed to read card file")]
    Read(#[from] io::Error),
}

/// Parses a card file from a reader.
///
/// Lines end at `\n` (an optional trailing `\r` is dropped) and invalid UTF-8
/// is replaced rather than rejected.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn read_cards<R: BufRead>(mut reader: R) -> io::Result<CardFile> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    while reader.read_until(b'\n', &mut buf)? > 0 {
        let line = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        lines.push(String::from_utf8_lossy(line).into_owned());
        buf.clear();
    }

    let mut cards = Vec::new();
    let mut term = String::new();
    let mut definition = String::new();
    for (index, line) in lines.iter().enumerate() {
        if index % 2 == 0 {
            term.clone_from(line);
        } else {
            definition.clone_from(line);
        }
        if !term.is_empty() && !definition.is_empty() {
            cards.push((std::mem::take(&mut term), std::mem::take(&mut definition)));
        }
    }

    Ok(CardFile { lines, cards })
}

/// Reads the card file at `path`.
///
/// # Errors
///
/// Returns [`ImportError::NotFound`] if the file cannot be opened and
/// [`ImportError::Read`] if it cannot be read once open.
#[instrument]
pub fn import(path: &Path) -> Result<CardFile, ImportError> {
    let file = File::open(path).map_err(ImportError::NotFound)?;
    let card_file = read_cards(BufReader::new(file))?;

    tracing::debug!(
        lines = card_file.lines.len(),
        cards = card_file.cards.len(),
        "read card file"
    );
    Ok(card_file)
}

/// Writes every card in the deck as two lines.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_cards<W: Write>(writer: &mut W, deck: &Deck) -> io::Result<()> {
    for (term, definition) in deck.cards() {
        writeln!(writer, "{term}\n{definition}")?;
    }
    Ok(())
}

/// Writes the deck to `path`, replacing any existing file.
///
/// Returns the number of cards written.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
#[instrument(skip(deck))]
pub fn export(path: &Path, deck: &Deck) -> io::Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_cards(&mut writer, deck)?;
    writer.flush()?;

    tracing::info!(cards = deck.len(), "exported cards");
    Ok(deck.len())
}
