use std::{collections::BTreeMap, fmt};

use tracing::instrument;

/// Counts wrong quiz answers per term.
///
/// Counts live until [`MistakeTracker::reset`] is called. Note that
/// [`MistakeTracker::hardest`] is a destructive read: it prunes every term
/// that is not tied for the highest count.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MistakeTracker {
    counts: BTreeMap<String, u32>,
}

/// The term(s) tied for the most wrong answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardestCards {
    /// Terms sharing the highest count, in term order.
    pub terms: Vec<String>,
    /// The shared count.
    pub errors: u32,
}

impl fmt::Display for HardestCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The hardest card is \"{}\". You have {} errors answering it.",
            self.terms.join(", "),
            self.errors
        )
    }
}

impl MistakeTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one wrong answer for `term`.
    #[instrument(level = "debug", skip(self))]
    pub fn record(&mut self, term: &str) {
        *self.counts.entry(term.to_owned()).or_default() += 1;
    }

    /// The number of wrong answers recorded for `term`.
    #[must_use]
    pub fn count(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or_default()
    }

    /// Whether no mistakes are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Reports the term(s) with the most wrong answers.
    ///
    /// Every term below the maximum is dropped from the tracker as a side
    /// effect. Returns `None` if nothing is tracked.
    #[instrument(level = "debug", skip(self))]
    pub fn hardest(&mut self) -> Option<HardestCards> {
        let errors = self.counts.values().copied().max()?;
        self.counts.retain(|_, count| *count == errors);
        Some(HardestCards {
            terms: self.counts.keys().cloned().collect(),
            errors,
        })
    }

    /// Forgets all recorded mistakes.
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
