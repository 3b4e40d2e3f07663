//! In-memory card store.
//!
//! The [`Deck`] knows nothing about files or the terminal. It keeps every card
//! in two mirrored indexes so that either side of a card can be looked up in
//! O(log n):
//! - Terms: `BTreeMap<term, definition>`
//! - Definitions: `BTreeMap<definition, term>`
//!
//! Both indexes are only ever modified together, so a term maps to a
//! definition if and only if that definition maps back to the term.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::instrument;

/// The card store.
///
/// Terms and definitions are both unique across the deck. Iteration is in
/// term order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Deck {
    by_term: BTreeMap<String, String>,
    by_definition: BTreeMap<String, String>,
}

/// A card could not be added because one of its sides is already taken.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DuplicateError {
    /// The term already belongs to a card.
    #[error("The card \"{0}\" already exists.")]
    Term(String),

    /// The definition already belongs to a card.
    #[error("The definition \"{0}\" already exists.")]
    Definition(String),
}

impl Deck {
    /// Creates an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_term.len()
    }

    /// Whether the deck holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_term.is_empty()
    }

    /// Returns the definition of the card with the given term.
    #[must_use]
    pub fn definition(&self, term: &str) -> Option<&str> {
        self.by_term.get(term).map(String::as_str)
    }

    /// Returns the term of the card with the given definition.
    #[must_use]
    pub fn term_for(&self, definition: &str) -> Option<&str> {
        self.by_definition.get(definition).map(String::as_str)
    }

    /// Whether a card with this term exists.
    #[must_use]
    pub fn contains_term(&self, term: &str) -> bool {
        self.by_term.contains_key(term)
    }

    /// Whether a card with this definition exists.
    #[must_use]
    pub fn contains_definition(&self, definition: &str) -> bool {
        self.by_definition.contains_key(definition)
    }

    /// Adds a new card.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the deck untouched, if either the term or the
    /// definition already belongs to a card.
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, term: String, definition: String) -> Result<(), DuplicateError> {
        if self.contains_term(&term) {
            return Err(DuplicateError::Term(term));
        }
        if self.contains_definition(&definition) {
            return Err(DuplicateError::Definition(definition));
        }
        self.by_definition.insert(definition.clone(), term.clone());
        self.by_term.insert(term, definition);
        Ok(())
    }

    /// Inserts a card, first removing any card that shares its term or its
    /// definition.
    ///
    /// Returns the number of cards that were displaced.
    #[instrument(level = "debug", skip(self))]
    pub fn replace(&mut self, term: String, definition: String) -> usize {
        let mut displaced = 0;
        if self.remove(&term).is_some() {
            displaced += 1;
        }
        if let Some(owner) = self.term_for(&definition).map(str::to_owned) {
            self.remove(&owner);
            displaced += 1;
        }
        self.by_definition.insert(definition.clone(), term.clone());
        self.by_term.insert(term, definition);
        displaced
    }

    /// Removes the card with the given term, returning its definition.
    ///
    /// Returns `None` if there is no such card.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, term: &str) -> Option<String> {
        let definition = self.by_term.remove(term)?;
        self.by_definition.remove(&definition);
        Some(definition)
    }

    /// Iterates over `(term, definition)` pairs in term order.
    pub fn cards(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_term
            .iter()
            .map(|(term, definition)| (term.as_str(), definition.as_str()))
    }

    /// Iterates over the terms in order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.by_term.keys().map(String::as_str)
    }
}

impl<T, D> FromIterator<(T, D)> for Deck
where
    T: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, D)>>(iter: I) -> Self {
        let mut deck = Self::new();
        for (term, definition) in iter {
            deck.replace(term.into(), definition.into());
        }
        deck
    }
}
