use thiserror::Error;

use super::Card;

/// This is the core error type for the poker odds library.
/// It uses `thiserror` to provide readable error messages.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PokerError {
    #[error("Unable to parse value")]
    UnexpectedValueChar,
    #[error("Unable to parse suit")]
    UnexpectedSuitChar,
    #[error("Error reading characters while parsing")]
    TooFewChars,
    #[error("Extra un-used characters found after parsing")]
    UnparsedCharsRemaining,
    #[error("Card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("A hand needs at least 5 cards to be ranked, got {0}")]
    InvalidHandSize(usize),
    #[error("Asked to draw {requested} cards but only {remaining} remain in the deck")]
    InsufficientCards { requested: usize, remaining: usize },
    #[error("Invalid simulation parameters: {0}")]
    InvalidSimulationParameters(String),
    #[error("Simulation worker failed: {0}")]
    WorkerFailed(String),
}
