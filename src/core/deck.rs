use rand::Rng;
use rand::seq::SliceRandom;

use super::{Card, CardBitSet, PokerError};

/// Deck holds the cards that are not yet known to be in any hand.
///
/// Cards are dealt uniformly at random without replacement. Every
/// playout clones the deck it starts from so the shared starting deck is
/// never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    /// Card storage.
    cards: Vec<Card>,
}

impl Deck {
    /// Build the pool of every card not in `excluding`.
    ///
    /// ```
    /// use poker_odds::core::{Card, Deck};
    ///
    /// let known = Card::parse_many("AH AC").unwrap();
    /// let deck = Deck::new(&known);
    /// assert_eq!(50, deck.len());
    /// assert!(!deck.contains(&known[0]));
    /// ```
    pub fn new(excluding: &[Card]) -> Self {
        let known: CardBitSet = excluding.iter().copied().collect();
        Self::from(!known)
    }

    /// Given a card, is it in the current deck?
    pub fn contains(&self, c: &Card) -> bool {
        self.cards.contains(c)
    }

    /// Given a card remove it from the deck if it is present.
    ///
    /// Removing a card that is already gone is not an error, the
    /// return value only says whether anything changed.
    pub fn remove(&mut self, c: &Card) -> bool {
        match self.cards.iter().position(|card| card == c) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    /// How many cards are there in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Have all of the cards been dealt from this deck?
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get an iterator from this deck
    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Deal one card picked uniformly from what is left.
    /// None if the deck is empty
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.cards.len());
        Some(self.cards.swap_remove(idx))
    }

    /// Remove and return `n` cards chosen uniformly at random without
    /// replacement.
    ///
    /// ```
    /// use poker_odds::core::{Deck, PokerError};
    /// use rand::{SeedableRng, rngs::StdRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut deck = Deck::default();
    /// let flop = deck.draw(3, &mut rng).unwrap();
    /// assert_eq!(3, flop.len());
    /// assert_eq!(49, deck.len());
    ///
    /// assert_eq!(
    ///     Err(PokerError::InsufficientCards { requested: 50, remaining: 49 }),
    ///     deck.draw(50, &mut rng)
    /// );
    /// ```
    pub fn draw<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Result<Vec<Card>, PokerError> {
        let mut out = Vec::with_capacity(n);
        self.draw_into(n, rng, &mut out)?;
        Ok(out)
    }

    /// Same as [`Deck::draw`] but appends to an existing buffer so the
    /// playout loop does not allocate.
    pub fn draw_into<R: Rng + ?Sized>(
        &mut self,
        n: usize,
        rng: &mut R,
        out: &mut Vec<Card>,
    ) -> Result<(), PokerError> {
        if n > self.cards.len() {
            return Err(PokerError::InsufficientCards {
                requested: n,
                remaining: self.cards.len(),
            });
        }
        for _ in 0..n {
            let idx = rng.random_range(0..self.cards.len());
            out.push(self.cards.swap_remove(idx));
        }
        Ok(())
    }

    /// Randomly shuffle the remaining cards.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng)
    }
}

impl Default for Deck {
    /// Create the default 52 card deck
    ///
    /// ```
    /// use poker_odds::core::Deck;
    ///
    /// assert_eq!(52, Deck::default().len());
    /// ```
    fn default() -> Self {
        Self { cards: Card::all() }
    }
}

impl From<CardBitSet> for Deck {
    fn from(value: CardBitSet) -> Self {
        Self {
            cards: value.into_iter().collect(),
        }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::core::{Suit, Value};

    #[test]
    fn test_contains_in() {
        let d = Deck::default();
        assert!(d.contains(&Card::new(Value::Eight, Suit::Heart)));
    }

    #[test]
    fn test_remove() {
        let mut d = Deck::default();
        let c = Card::new(Value::Ace, Suit::Heart);
        assert!(d.contains(&c));
        assert!(d.remove(&c));
        assert!(!d.contains(&c));
        // A second removal is a silent no-op
        assert!(!d.remove(&c));
        assert_eq!(51, d.len());
    }

    #[test]
    fn test_draws_are_distinct_and_disjoint() {
        let known = Card::parse_many("AH AC 2D 7S 9H").unwrap();
        let mut rng = StdRng::seed_from_u64(420);
        let mut deck = Deck::new(&known);

        let mut seen: HashSet<Card> = HashSet::new();
        for n in [2, 3, 5, 10, 27] {
            for card in deck.draw(n, &mut rng).unwrap() {
                assert!(!known.contains(&card), "drew known card {card}");
                assert!(seen.insert(card), "drew {card} twice");
            }
        }
        assert_eq!(47, seen.len());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = Deck::new(&Card::parse_many("KS KH").unwrap());
        let mut copy = base.clone();
        copy.draw(20, &mut rng).unwrap();
        assert_eq!(50, base.len());
        assert_eq!(30, copy.len());
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let mut deck_one = Deck::default();
        let mut deck_two = Deck::default();
        let mut rng_one = StdRng::seed_from_u64(420);
        let mut rng_two = StdRng::seed_from_u64(420);

        assert_eq!(
            deck_one.draw(9, &mut rng_one).unwrap(),
            deck_two.draw(9, &mut rng_two).unwrap()
        );
    }

    #[test]
    fn test_draw_too_many() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = Deck::new(&Card::all()[..50]);
        assert_eq!(
            Err(PokerError::InsufficientCards {
                requested: 3,
                remaining: 2
            }),
            deck.draw(3, &mut rng)
        );
        // A failed draw leaves the deck untouched.
        assert_eq!(2, deck.len());
    }

    #[test]
    fn test_draw_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0usize; 52];
        let trials = 52_000;
        for _ in 0..trials {
            let mut deck = Deck::default();
            let card = deck.deal(&mut rng).unwrap();
            counts[usize::from(u8::from(card))] += 1;
        }
        // Expect ~1000 per card.
        for count in counts {
            assert!((800..1200).contains(&count), "count {count} out of range");
        }
    }
}
