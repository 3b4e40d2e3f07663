//! Terminal capability detection and utilities

use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
#[must_use]
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// How a line should look on the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    /// No styling
    #[default]
    Plain,
    /// Color as success (green)
    Success,
    /// Color as warning (amber)
    Warning,
}

impl Tone {
    /// Applies the tone to `text`, or returns it unchanged if `color` is off.
    #[must_use]
    pub fn paint(self, text: &str, color: bool) -> String {
        if !color {
            return text.to_string();
        }
        match self {
            Self::Plain => text.to_string(),
            Self::Success => text.fg::<css::Green>().to_string(),
            Self::Warning => text.fg::<css::Orange>().to_string(),
        }
    }
}
