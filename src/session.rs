//! The interactive study session.
//!
//! A [`Session`] owns everything that lives for one run of the program: the
//! deck, the mistake statistics, the transcript and the input/output streams.
//! Every operation reads its arguments from the input one line at a time, so a
//! session can be driven by a terminal or by a scripted reader.

use std::{
    fs::File,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::instrument;

use crate::{
    Deck, DuplicateError, MistakeTracker, Transcript,
    storage::{ImportError, card_file},
    terminal::Tone,
};

/// The main menu prompt.
pub const MENU: &str =
    "Input the action (add, remove, import, export, ask, exit, log, hardest card, reset stats):";

/// Fatal session errors.
///
/// Recoverable conditions, such as a duplicate card or a missing import file,
/// are reported to the user and never surface as an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// A card file or transcript could not be created or written.
    #[error("failed to write {}", path.display())]
    Create {
        /// The file being written.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// A card file was opened but could not be read.
    #[error("failed to read card file {}", path.display())]
    Import {
        /// The file being read.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// A card could not be added to the deck.
    #[error(transparent)]
    Duplicate(#[from] DuplicateError),

    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O failed")]
    Io(#[from] io::Error),

    /// The input reached end of file while waiting for a line.
    #[error("input closed while waiting for a response")]
    InputClosed,
}

/// A menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Add a card.
    Add,
    /// Remove a card.
    Remove,
    /// Import cards from a file.
    Import,
    /// Export cards to a file.
    Export,
    /// Quiz the user.
    Ask,
    /// End the session.
    Exit,
    /// Save the transcript.
    Log,
    /// Report the card(s) with the most mistakes.
    HardestCard,
    /// Forget all mistakes.
    ResetStats,
}

impl Command {
    /// Matches a menu entry exactly.
    #[must_use]
    pub fn parse(action: &str) -> Option<Self> {
        let command = match action {
            "add" => Self::Add,
            "remove" => Self::Remove,
            "import" => Self::Import,
            "export" => Self::Export,
            "ask" => Self::Ask,
            "exit" => Self::Exit,
            "log" => Self::Log,
            "hardest card" => Self::HardestCard,
            "reset stats" => Self::ResetStats,
            _ => return None,
        };
        Some(command)
    }
}

/// Whether the command loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again.
    Continue,
    /// Stop the loop.
    Exit,
}

/// How a quiz answer was judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The answer is the card's definition.
    Correct,
    /// The answer is the definition of another card, with this term.
    BelongsTo(String),
    /// The answer matches no card.
    Wrong,
}

impl Verdict {
    /// Judges `answer` against the card whose definition is `definition`.
    #[must_use]
    pub fn grade(deck: &Deck, definition: &str, answer: &str) -> Self {
        if answer == definition {
            return Self::Correct;
        }
        deck.term_for(answer)
            .map_or(Self::Wrong, |term| Self::BelongsTo(term.to_owned()))
    }
}

/// One run of the flashcard trainer.
#[derive(Debug)]
pub struct Session<R, W> {
    deck: Deck,
    mistakes: MistakeTracker,
    transcript: Transcript<W>,
    input: R,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session with an empty deck.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            deck: Deck::new(),
            mistakes: MistakeTracker::new(),
            transcript: Transcript::new(output),
            input,
        }
    }

    /// Starts the session with the given deck.
    #[must_use]
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.deck = deck;
        self
    }

    /// Enables or disables coloured verdicts on the output.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.transcript = self.transcript.with_color(color);
        self
    }

    /// The current deck.
    #[must_use]
    pub const fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The mistake statistics.
    #[must_use]
    pub const fn mistakes(&self) -> &MistakeTracker {
        &self.mistakes
    }

    /// The session transcript.
    #[must_use]
    pub const fn transcript(&self) -> &Transcript<W> {
        &self.transcript
    }

    /// Ends the session, returning the output.
    #[must_use]
    pub fn into_output(self) -> W {
        self.transcript.into_output()
    }

    /// Runs the command loop until the user exits or the input closes.
    ///
    /// Unrecognised actions are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error on any fatal condition. The session should not be
    /// used afterwards.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.transcript.print(MENU)?;
            let action = match self.read_line() {
                Ok(action) => action,
                Err(Error::InputClosed) => {
                    tracing::debug!("input closed at the menu, ending session");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            match Command::parse(&action) {
                Some(command) => {
                    if self.execute(command)? == Flow::Exit {
                        return Ok(());
                    }
                }
                None => tracing::trace!(%action, "ignoring unrecognised action"),
            }
            self.transcript.separator()?;
        }
    }

    /// Runs a single menu action.
    ///
    /// # Errors
    ///
    /// Returns an error on any fatal condition.
    #[instrument(skip(self))]
    pub fn execute(&mut self, command: Command) -> Result<Flow, Error> {
        match command {
            Command::Add => self.add_card()?,
            Command::Remove => self.remove_card()?,
            Command::Import => {
                let path = self.ask_file_name()?;
                self.import_from(&path)?;
            }
            Command::Export => {
                let path = self.ask_file_name()?;
                self.export_to(&path)?;
            }
            Command::Ask => self.ask()?,
            Command::Log => self.save_log()?,
            Command::HardestCard => self.hardest_card()?,
            Command::ResetStats => self.reset_stats()?,
            Command::Exit => {
                self.transcript.print("Bye bye!")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Prompts for a term and a definition, re-prompting while either is
    /// taken, then adds the card.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails or the input closes.
    pub fn add_card(&mut self) -> Result<(), Error> {
        self.transcript.print("The card")?;
        let term = loop {
            let term = self.read_line()?;
            if !self.deck.contains_term(&term) {
                break term;
            }
            self.retry(&DuplicateError::Term(term))?;
        };

        self.transcript.print("The definition of the card")?;
        let definition = loop {
            let definition = self.read_line()?;
            if !self.deck.contains_definition(&definition) {
                break definition;
            }
            self.retry(&DuplicateError::Definition(definition))?;
        };

        let message = format!("The pair (\"{term}\":\"{definition}\") has been added.\n");
        self.deck.add(term, definition)?;
        self.transcript.print(&message)?;
        Ok(())
    }

    fn retry(&mut self, error: &DuplicateError) -> io::Result<()> {
        self.transcript
            .print_toned(&format!("{error} Try again:\n"), Tone::Warning)
    }

    /// Prompts for a term and removes its card.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails or the input closes.
    pub fn remove_card(&mut self) -> Result<(), Error> {
        self.transcript.print("Which card?")?;
        let term = self.read_line()?;

        if self.deck.remove(&term).is_some() {
            self.transcript.print("The card has been removed.")?;
        } else {
            self.transcript.print_toned(
                &format!("Can't remove \"{term}\": there is no such card."),
                Tone::Warning,
            )?;
        }
        Ok(())
    }

    /// Loads the cards in `path` into the deck.
    ///
    /// A file that cannot be opened is reported and otherwise ignored. Every
    /// line read is recorded in the transcript.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Import`] if the file was opened but could not be read.
    #[instrument(skip(self))]
    pub fn import_from(&mut self, path: &Path) -> Result<(), Error> {
        let card_file = match card_file::import(path) {
            Ok(card_file) => card_file,
            Err(ImportError::NotFound(e)) => {
                tracing::debug!("cannot open card file: {e}");
                self.transcript.print("File not found.")?;
                return Ok(());
            }
            Err(ImportError::Read(source)) => {
                return Err(Error::Import {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        for line in &card_file.lines {
            self.transcript.record_input(line);
        }
        let loaded = card_file.loaded();
        for (term, definition) in card_file.cards {
            let displaced = self.deck.replace(term, definition);
            if displaced > 0 {
                tracing::debug!(displaced, "imported card replaced existing cards");
            }
        }

        self.transcript
            .print(&format!("{loaded} cards have been loaded.\n"))?;
        Ok(())
    }

    /// Writes the deck to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Create`] if the file cannot be created or written.
    #[instrument(skip(self))]
    pub fn export_to(&mut self, path: &Path) -> Result<(), Error> {
        let saved = card_file::export(path, &self.deck).map_err(|source| Error::Create {
            path: path.to_path_buf(),
            source,
        })?;
        self.transcript
            .print(&format!("{saved} cards have been saved.\n"))?;
        Ok(())
    }

    /// Prompts for a question count and runs a quiz.
    ///
    /// A count that is not a non-negative integer asks nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails or the input closes.
    pub fn ask(&mut self) -> Result<(), Error> {
        self.transcript.print("How many times to ask?")?;
        let count = self.read_raw()?.parse::<usize>().unwrap_or_default();
        self.transcript.record_input(&count.to_string());
        self.quiz(count)
    }

    /// Asks `count` questions, cycling through the deck in term order.
    ///
    /// Returns immediately if the deck is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails or the input closes.
    #[instrument(skip(self))]
    pub fn quiz(&mut self, count: usize) -> Result<(), Error> {
        if self.deck.is_empty() {
            tracing::debug!("deck is empty, nothing to ask");
            return Ok(());
        }

        let cards: Vec<(String, String)> = self
            .deck
            .cards()
            .map(|(term, definition)| (term.to_owned(), definition.to_owned()))
            .collect();

        for (term, definition) in cards.iter().cycle().take(count) {
            self.question(term, definition)?;
        }
        Ok(())
    }

    fn question(&mut self, term: &str, definition: &str) -> Result<(), Error> {
        self.transcript
            .print(&format!("Print the definition of \"{term}\":\n"))?;
        let answer = self.read_line()?;

        match Verdict::grade(&self.deck, definition, &answer) {
            Verdict::Correct => {
                self.transcript.print_toned("Correct!", Tone::Success)?;
            }
            Verdict::BelongsTo(other) => {
                self.mistakes.record(term);
                self.transcript.print_toned(
                    &format!(
                        "Wrong. The right answer is \"{definition}\", but your definition is \
                         correct for \"{other}\".\n"
                    ),
                    Tone::Warning,
                )?;
            }
            Verdict::Wrong => {
                self.mistakes.record(term);
                self.transcript.print_toned(
                    &format!("Wrong. The right answer is \"{definition}\"\n"),
                    Tone::Warning,
                )?;
            }
        }
        Ok(())
    }

    /// Prompts for a file name and saves the transcript there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Create`] if the file cannot be created or written.
    #[instrument(skip(self))]
    pub fn save_log(&mut self) -> Result<(), Error> {
        let path = self.ask_file_name()?;
        let mut file = match File::create(&path) {
            Ok(file) => file,
            Err(source) => return Err(Error::Create { path, source }),
        };
        self.transcript.print("The log has been saved.")?;
        self.transcript
            .write_to(&mut file)
            .map_err(|source| Error::Create { path, source })
    }

    /// Reports the card(s) with the most mistakes.
    ///
    /// Cards below the maximum are forgotten as a side effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails.
    pub fn hardest_card(&mut self) -> Result<(), Error> {
        let report = self.mistakes.hardest().map_or_else(
            || "There are no cards with errors.".to_string(),
            |hardest| hardest.to_string(),
        );
        self.transcript.print(&report)?;
        Ok(())
    }

    /// Forgets all mistakes.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails.
    pub fn reset_stats(&mut self) -> Result<(), Error> {
        self.mistakes.reset();
        self.transcript.print("Card statistics have been reset.")?;
        Ok(())
    }

    fn ask_file_name(&mut self) -> Result<PathBuf, Error> {
        self.transcript.print("File name:")?;
        Ok(PathBuf::from(self.read_line()?))
    }

    /// Reads a trimmed line and records it in the transcript.
    fn read_line(&mut self) -> Result<String, Error> {
        let line = self.read_raw()?;
        self.transcript.record_input(&line);
        Ok(line)
    }

    /// Reads a trimmed line without recording it.
    fn read_raw(&mut self) -> Result<String, Error> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;
    use test_case::test_case;

    use super::*;

    type Scripted = Session<Cursor<String>, Vec<u8>>;

    fn session(script: &str) -> Scripted {
        Session::new(Cursor::new(script.to_string()), Vec::new())
    }

    fn session_with(cards: &[(&str, &str)], script: &str) -> Scripted {
        session(script).with_deck(cards.iter().copied().collect())
    }

    fn output(session: Scripted) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test_case("add", Some(Command::Add))]
    #[test_case("hardest card", Some(Command::HardestCard))]
    #[test_case("reset stats", Some(Command::ResetStats))]
    #[test_case("exit", Some(Command::Exit))]
    #[test_case("Add", None ; "commands are case sensitive")]
    #[test_case("hardest", None)]
    #[test_case("", None ; "empty line")]
    fn parse_command(action: &str, expected: Option<Command>) {
        assert_eq!(Command::parse(action), expected);
    }

    #[test]
    fn add_card_inserts_pair() {
        let mut session = session("cat\nanimal\n");

        session.add_card().unwrap();

        assert_eq!(session.deck().definition("cat"), Some("animal"));
        assert_eq!(session.deck().term_for("animal"), Some("cat"));
        assert_eq!(
            output(session),
            "The card\nThe definition of the card\nThe pair (\"cat\":\"animal\") has been added.\n\n"
        );
    }

    #[test]
    fn add_card_reprompts_on_duplicates() {
        let mut session = session_with(&[("cat", "animal")], "cat\ndog\nanimal\npet\n");

        session.add_card().unwrap();

        assert_eq!(session.deck().definition("dog"), Some("pet"));
        assert_eq!(session.deck().definition("cat"), Some("animal"));
        let output = output(session);
        assert!(output.contains("The card \"cat\" already exists. Try again:\n\n"));
        assert!(output.contains("The definition \"animal\" already exists. Try again:\n\n"));
    }

    #[test]
    fn add_card_fails_when_input_closes() {
        let mut session = session_with(&[("cat", "animal")], "cat\n");

        let error = session.add_card().unwrap_err();

        assert!(matches!(error, Error::InputClosed));
        assert_eq!(session.deck().len(), 1);
    }

    #[test]
    fn remove_card_frees_term() {
        let mut session = session_with(&[("cat", "animal")], "cat\ncat\nmeow\n");

        session.remove_card().unwrap();
        assert!(session.deck().is_empty());

        session.add_card().unwrap();
        assert_eq!(session.deck().definition("cat"), Some("meow"));
    }

    #[test]
    fn remove_missing_card_reports() {
        let mut session = session("cat\n");

        session.remove_card().unwrap();

        assert_eq!(
            output(session),
            "Which card?\nCan't remove \"cat\": there is no such card.\n"
        );
    }

    #[test]
    fn quiz_correct_answer_records_no_mistake() {
        let mut session = session_with(&[("cat", "animal")], "animal\n");

        session.quiz(1).unwrap();

        assert_eq!(session.mistakes().count("cat"), 0);
        assert_eq!(
            output(session),
            "Print the definition of \"cat\":\n\nCorrect!\n"
        );
    }

    #[test]
    fn quiz_answer_of_another_card() {
        let mut session = session_with(&[("cat", "animal"), ("dog", "animal2")], "animal2\n");

        session.quiz(1).unwrap();

        assert_eq!(session.mistakes().count("cat"), 1);
        assert_eq!(session.mistakes().count("dog"), 0);
        assert!(output(session).contains(
            "Wrong. The right answer is \"animal\", but your definition is correct for \"dog\".\n"
        ));
    }

    #[test]
    fn quiz_wrong_answer() {
        let mut session = session_with(&[("cat", "animal")], "plant\n");

        session.quiz(1).unwrap();

        assert_eq!(session.mistakes().count("cat"), 1);
        assert!(output(session).contains("Wrong. The right answer is \"animal\"\n"));
    }

    #[test]
    fn quiz_wraps_around_the_deck() {
        let mut session = session_with(&[("a", "1"), ("b", "2")], "x\nx\nx\n");

        session.quiz(3).unwrap();

        assert_eq!(session.mistakes().count("a"), 2);
        assert_eq!(session.mistakes().count("b"), 1);
    }

    #[test]
    fn quiz_on_empty_deck_returns_immediately() {
        let mut session = session("");

        session.quiz(5).unwrap();

        assert_eq!(output(session), "");
    }

    #[test_case("2", "2" ; "number")]
    #[test_case("two", "0" ; "not a number")]
    #[test_case("-1", "0" ; "negative")]
    fn ask_records_parsed_count(count: &str, recorded: &str) {
        let mut session = session_with(&[("cat", "animal")], &format!("{count}\nanimal\nanimal\n"));

        session.ask().unwrap();

        let expected = format!("How many times to ask?\n{recorded}\n");
        assert!(session.transcript().contents().starts_with(&expected));
    }

    #[test]
    fn hardest_card_after_quiz() {
        let mut session = session_with(&[("a", "1"), ("b", "2"), ("c", "3")], "x\nx\n3\nx\nx\n3\n");

        session.quiz(6).unwrap();
        session.hardest_card().unwrap();

        assert!(
            output(session)
                .ends_with("The hardest card is \"a, b\". You have 2 errors answering it.\n")
        );
    }

    #[test]
    fn reset_stats_then_report() {
        let mut session = session_with(&[("cat", "animal")], "x\n");
        session.quiz(1).unwrap();

        session.reset_stats().unwrap();
        session.hardest_card().unwrap();

        assert!(session.mistakes().is_empty());
        assert!(output(session).ends_with(
            "Card statistics have been reset.\nThere are no cards with errors.\n"
        ));
    }

    #[test]
    fn import_missing_file_continues() {
        let tmp = TempDir::new().unwrap();
        let mut session = session("");

        session
            .import_from(&tmp.path().join("missing.txt"))
            .unwrap();

        assert!(session.deck().is_empty());
        assert_eq!(output(session), "File not found.\n");
    }

    #[test]
    fn import_records_lines_and_loads_cards() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cards.txt");
        std::fs::write(&path, "cat\nanimal\ndog\npet\nfish\n").unwrap();
        let mut session = session("");

        session.import_from(&path).unwrap();

        assert_eq!(session.deck().len(), 2);
        assert_eq!(
            session.transcript().contents(),
            "cat\nanimal\ndog\npet\nfish\n2 cards have been loaded.\n\n"
        );
    }

    #[test]
    fn import_pairs_leftover_definition_with_next_term() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cards.txt");
        std::fs::write(&path, "\nanimal\ndog\npet\n").unwrap();
        let mut session = session("");

        session.import_from(&path).unwrap();

        assert_eq!(session.deck().definition("dog"), Some("animal"));
        assert_eq!(session.deck().len(), 1);
        assert!(output(session).ends_with("2 cards have been loaded.\n\n"));
    }

    #[test]
    fn import_overrides_conflicting_cards() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cards.txt");
        std::fs::write(&path, "cat\npet\n").unwrap();
        let mut session = session_with(&[("cat", "animal"), ("dog", "pet")], "");

        session.import_from(&path).unwrap();

        assert_eq!(session.deck().len(), 1);
        assert_eq!(session.deck().definition("cat"), Some("pet"));
        assert_eq!(session.deck().term_for("animal"), None);
    }

    #[test]
    fn export_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut session = session("");

        let error = session
            .export_to(&tmp.path().join("missing").join("cards.txt"))
            .unwrap_err();

        assert!(matches!(error, Error::Create { .. }));
    }

    #[test]
    fn exported_deck_can_be_imported() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cards.txt");
        let cards = [("cat", "animal"), ("dog", "pet")];
        let mut exporter = session_with(&cards, "");
        exporter.export_to(&path).unwrap();

        let mut importer = session("");
        importer.import_from(&path).unwrap();

        assert_eq!(importer.deck(), exporter.deck());
        assert!(output(exporter).ends_with("2 cards have been saved.\n\n"));
    }

    #[test]
    fn log_includes_its_own_confirmation() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.log");
        let mut session = session(&format!("{}\n", path.display()));

        session.save_log().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            format!("File name:\n{}\nThe log has been saved.\n", path.display())
        );
    }

    #[test]
    fn log_failure_does_not_claim_success() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("session.log");
        let mut session = session(&format!("{}\n", path.display()));

        let error = session.save_log().unwrap_err();

        assert!(matches!(error, Error::Create { .. }));
        assert!(!session.transcript().contents().contains("The log has been saved."));
        assert_eq!(output(session), "File name:\n");
    }

    #[test]
    fn run_dispatches_until_exit() {
        let mut session = session("add\ncat\nanimal\nunknown\nask\n1\nanimal\nexit\nadd\n");

        session.run().unwrap();

        assert_eq!(session.deck().len(), 1);
        let output = output(session);
        assert!(output.contains("Correct!\n"));
        assert!(output.ends_with("Bye bye!\n"));
        assert_eq!(output.matches(MENU).count(), 4);
    }

    #[test]
    fn run_ends_when_input_closes() {
        let mut session = session("add\ncat\nanimal\n");

        session.run().unwrap();

        assert_eq!(session.deck().len(), 1);
        assert!(!output(session).contains("Bye bye!"));
    }

    #[test]
    fn unrecognised_action_prints_separator_only() {
        let mut session = session("dance\nexit\n");

        session.run().unwrap();

        assert_eq!(output(session), format!("{MENU}\n\n{MENU}\nBye bye!\n"));
    }
}
