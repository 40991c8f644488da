use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use super::Card;

/// This struct is a bitset for cards
/// Each card is represented by a bit in a 64 bit integer
///
/// The bit is set if the card present
/// The bit is unset if the card not in the set
///
/// It is used to track known cards (hero hand, board) and to check that
/// no card shows up twice across hands, board and deck.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardBitSet {
    cards: u64,
}

const FIFTY_TWO_ONES: u64 = (1 << 52) - 1;

impl CardBitSet {
    /// Create a new empty bitset
    ///
    /// ```
    /// use poker_odds::core::CardBitSet;
    /// let cards = CardBitSet::new();
    /// assert!(cards.is_empty());
    /// ```
    pub fn new() -> Self {
        Self { cards: 0 }
    }

    /// Insert a card. Returns false if the card was already present.
    ///
    /// ```
    /// use poker_odds::core::{Card, CardBitSet, Suit, Value};
    /// let mut cards = CardBitSet::new();
    ///
    /// assert!(cards.insert(Card::new(Value::Six, Suit::Club)));
    /// assert!(!cards.insert(Card::new(Value::Six, Suit::Club)));
    /// assert_eq!(1, cards.count());
    /// ```
    pub fn insert(&mut self, card: Card) -> bool {
        let present = self.contains(card);
        self.cards |= 1 << u8::from(card);
        !present
    }

    /// Remove a card from the bitset
    pub fn remove(&mut self, card: Card) {
        self.cards &= !(1 << u8::from(card));
    }

    /// Is the card in the bitset ?
    pub fn contains(&self, card: Card) -> bool {
        (self.cards & (1 << u8::from(card))) != 0
    }

    /// Is the bitset empty ?
    pub fn is_empty(&self) -> bool {
        self.cards == 0
    }

    /// How many cards are in the bitset ?
    pub fn count(&self) -> usize {
        self.cards.count_ones() as usize
    }

    /// Collect cards into a set, failing on the first card seen twice.
    ///
    /// ```
    /// use poker_odds::core::{Card, CardBitSet, PokerError};
    ///
    /// let cards = Card::parse_many("AH KD AH").unwrap();
    /// assert!(matches!(
    ///     CardBitSet::try_from_unique(cards),
    ///     Err(PokerError::DuplicateCard(_))
    /// ));
    /// ```
    pub fn try_from_unique<I: IntoIterator<Item = Card>>(
        cards: I,
    ) -> Result<Self, super::PokerError> {
        let mut set = Self::new();
        for card in cards {
            if !set.insert(card) {
                return Err(super::PokerError::DuplicateCard(card));
            }
        }
        Ok(set)
    }
}

impl Default for CardBitSet {
    /// Create a new bitset with all the cards in it
    /// ```
    /// use poker_odds::core::CardBitSet;
    ///
    /// let cards = CardBitSet::default();
    ///
    /// assert_eq!(52, cards.count());
    /// assert!(!cards.is_empty());
    /// ```
    fn default() -> Self {
        Self {
            cards: FIFTY_TWO_ONES,
        }
    }
}

impl Debug for CardBitSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(*self).finish()
    }
}

impl BitOr for CardBitSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            cards: self.cards | rhs.cards,
        }
    }
}

impl BitOrAssign<Card> for CardBitSet {
    fn bitor_assign(&mut self, rhs: Card) {
        self.cards |= 1 << u8::from(rhs);
    }
}

impl BitAnd for CardBitSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            cards: self.cards & rhs.cards,
        }
    }
}

impl Not for CardBitSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self {
            cards: !self.cards & FIFTY_TWO_ONES, // Ensure we only keep the first 52 bits
        }
    }
}

impl FromIterator<Card> for CardBitSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        let mut set = Self::new();
        for card in iter {
            set |= card;
        }
        set
    }
}

/// The iterator for the CardBitSet
/// It iterates over the cards in the bitset, lowest index first.
pub struct CardBitSetIter(u64);

impl IntoIterator for CardBitSet {
    type Item = Card;
    type IntoIter = CardBitSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CardBitSetIter(self.cards)
    }
}

impl Iterator for CardBitSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }

        let card = self.0.trailing_zeros();
        self.0 &= !(1 << card);

        Some(Card::from(card as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Suit, Value};

    #[test]
    fn test_insert_all() {
        let mut all_cards = CardBitSet::new();
        for card in Card::all() {
            assert!(all_cards.insert(card));
            assert!(all_cards.contains(card));
        }
        assert_eq!(all_cards, CardBitSet::default());
    }

    #[test]
    fn test_default_contains() {
        let mut cards = CardBitSet::default();
        for card in Card::all() {
            assert!(cards.contains(card));
            cards.remove(card);
        }
        assert!(cards.is_empty());
    }

    #[test]
    fn test_not_is_complement() {
        let known: CardBitSet = Card::parse_many("AH AC").unwrap().into_iter().collect();
        let unseen = !known;
        assert_eq!(50, unseen.count());
        assert!((known & unseen).is_empty());
        assert_eq!(CardBitSet::default(), known | unseen);
    }

    #[test]
    fn test_iter_is_canonical_order() {
        let cards: Vec<Card> = CardBitSet::default().into_iter().collect();
        assert_eq!(Card::all(), cards);
    }

    #[test]
    fn test_duplicate_detected() {
        let cards = vec![
            Card::new(Value::Ace, Suit::Club),
            Card::new(Value::King, Suit::Club),
            Card::new(Value::Ace, Suit::Club),
        ];
        assert_eq!(
            Err(crate::core::PokerError::DuplicateCard(Card::new(
                Value::Ace,
                Suit::Club
            ))),
            CardBitSet::try_from_unique(cards)
        );
    }

    #[test]
    fn test_formatting_cards() {
        let cards: CardBitSet = Card::parse_many("AC KD 3H").unwrap().into_iter().collect();
        assert_eq!(format!("{:?}", cards), "{Card(3H), Card(KD), Card(AC)}");
    }
}
