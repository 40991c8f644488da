//! This is the core module. It exports the non-holdem
//! related code: cards, decks and five card hand ranking.

/// card.rs has value and suit.
mod card;
/// Re-export Card, Value, and Suit
pub use self::card::{Card, Suit, Value};

/// Error type shared by every fallible operation.
mod error;
pub use self::error::PokerError;

/// Bitset of cards, used to track known cards.
mod card_bit_set;
pub use self::card_bit_set::{CardBitSet, CardBitSetIter};

/// We want to be able to iterate over five card subsets.
mod card_iter;
/// Make that functionality public.
pub use self::card_iter::CardIter;

/// Deck is the pool of cards that haven't been seen yet.
mod deck;
/// Export `Deck`
pub use self::deck::Deck;

/// 5 Card hand ranking code.
mod rank;
/// Export the trait and the results.
pub use self::rank::{EvaluatedHand, HandRank, Rankable, best_hand, compare, rank_five};
