//! Plain-text Flashcards
//!
//! Cards are term/definition pairs kept in memory and persisted to a flat
//! file of alternating lines.

pub mod domain;
pub use domain::{Config, Deck, DuplicateError, HardestCards, MistakeTracker};

/// Card files and the session transcript.
pub mod storage;
pub use storage::Transcript;

pub mod session;
pub use session::Session;

pub mod terminal;
