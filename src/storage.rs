pub mod card_file;
mod transcript;

pub use card_file::{CardFile, ImportError, export, import, read_cards, write_cards};
pub use transcript::Transcript;
