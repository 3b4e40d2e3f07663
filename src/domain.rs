//! Domain models for the flashcard trainer.
//!
//! This module contains the card store, the mistake statistics and the
//! user configuration.

/// The bidirectional term/definition store.
pub mod deck;
pub use deck::{Deck, DuplicateError};

/// Wrong-answer statistics.
pub mod mistakes;
pub use mistakes::{HardestCards, MistakeTracker};

mod config;
pub use config::{ColorMode, Config};
