use super::Card;

/// Iterator over every `num_cards` sized subset of a set of cards.
///
/// Subsets come out in lexicographic order of their positions in the
/// input, so the first subset is the first `num_cards` cards.
#[derive(Debug)]
pub struct CardIter<'a> {
    // All the possible cards that can be dealt
    possible_cards: &'a [Card],

    // Set of current offsets being used to create card sets.
    idx: Vec<usize>,

    // size of card sets requested.
    num_cards: usize,

    done: bool,
}

impl<'a> CardIter<'a> {
    /// ```
    /// use poker_odds::core::{Card, CardIter};
    ///
    /// let cards = Card::parse_many("AH KH QH JH TH 9H 8H").unwrap();
    /// assert_eq!(21, CardIter::new(&cards, 5).count());
    /// ```
    pub fn new(possible_cards: &'a [Card], num_cards: usize) -> CardIter<'a> {
        CardIter {
            possible_cards,
            idx: (0..num_cards).collect(),
            num_cards,
            done: num_cards > possible_cards.len(),
        }
    }

    /// Write the next subset into `out`, which must hold `num_cards`
    /// cards. Returns false once every subset has been produced.
    pub fn next_into(&mut self, out: &mut [Card]) -> bool {
        if self.done {
            return false;
        }
        for (slot, i) in out.iter_mut().zip(self.idx.iter()) {
            *slot = self.possible_cards[*i];
        }
        self.done = !self.advance();
        true
    }

    /// Move the offsets to the next subset. Returns false once every
    /// subset has been produced.
    fn advance(&mut self) -> bool {
        let n = self.possible_cards.len();
        let k = self.num_cards;
        // Find the right most offset that can still move forward.
        let Some(level) = (0..k).rev().find(|&i| self.idx[i] < n - k + i) else {
            return false;
        };
        self.idx[level] += 1;
        for i in level + 1..k {
            self.idx[i] = self.idx[i - 1] + 1;
        }
        true
    }
}

impl Iterator for CardIter<'_> {
    type Item = Vec<Card>;

    fn next(&mut self) -> Option<Vec<Card>> {
        if self.done {
            return None;
        }

        let result_cards: Vec<Card> = self.idx.iter().map(|i| self.possible_cards[*i]).collect();
        self.done = !self.advance();
        Some(result_cards)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::Deck;

    #[test]
    fn test_iter_one() {
        let cards = Card::parse_many("2S").unwrap();
        for subset in CardIter::new(&cards, 1) {
            assert_eq!(1, subset.len());
        }
        assert_eq!(1, CardIter::new(&cards, 1).count());
    }

    #[test]
    fn test_iter_two() {
        let cards = Card::parse_many("2S 3S 4S").unwrap();

        // Make sure that we get the correct number back.
        assert_eq!(3, CardIter::new(&cards, 2).count());

        // Make sure that everything has two cards and they are different.
        for subset in CardIter::new(&cards, 2) {
            assert_eq!(2, subset.len());
            assert!(subset[0] != subset[1]);
        }
    }

    #[test]
    fn test_iter_too_few_cards() {
        let cards = Card::parse_many("2S 3S 4S").unwrap();
        assert_eq!(0, CardIter::new(&cards, 5).count());
    }

    #[test]
    fn test_iter_subsets_unique() {
        let cards = Card::parse_many("AH KH QH JH TH 9H 8H").unwrap();
        let subsets: HashSet<Vec<Card>> = CardIter::new(&cards, 5).collect();
        assert_eq!(21, subsets.len());
    }

    #[test]
    fn test_next_into_matches_iter() {
        let cards = Card::parse_many("AH KD QC JS TH 9D 8C").unwrap();
        let expected: Vec<Vec<Card>> = CardIter::new(&cards, 5).collect();

        let mut subsets = CardIter::new(&cards, 5);
        let mut five = [cards[0]; 5];
        let mut seen = Vec::new();
        while subsets.next_into(&mut five) {
            seen.push(five.to_vec());
        }
        assert_eq!(expected, seen);
        // Exhausted iterators stay exhausted.
        assert!(!subsets.next_into(&mut five));
    }

    #[test]
    fn test_iter_deck_pairs() {
        let d: Vec<Card> = Deck::default().into_iter().collect();
        assert_eq!(1326, CardIter::new(&d, 2).count());
    }
}
