use std::cmp::Ordering;
use std::fmt;

use super::{Card, CardIter, PokerError};

/// All the different possible hand categories, weakest first.
///
/// The discriminant is the category's numeric strength, so a higher
/// number always beats a lower one.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandRank {
    /// The lowest rank.
    /// No matches
    HighCard = 0,
    /// One Card matches another.
    OnePair = 1,
    /// Two diffent pair of matching cards.
    TwoPair = 2,
    /// Three of the same value.
    ThreeOfAKind = 3,
    /// Five cards in a sequence
    Straight = 4,
    /// Five cards of the same suit
    Flush = 5,
    /// Three of one value and two of another value
    FullHouse = 6,
    /// Four of the same value.
    FourOfAKind = 7,
    /// Five cards in a sequence all of the same suit.
    StraightFlush = 8,
    /// Ten through ace, all of the same suit.
    RoyalFlush = 9,
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandRank::RoyalFlush => "Royal Flush",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::FullHouse => "Full House",
            HandRank::Flush => "Flush",
            HandRank::Straight => "Straight",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::TwoPair => "Two Pair",
            HandRank::OnePair => "One Pair",
            HandRank::HighCard => "High Card",
        };
        f.write_str(name)
    }
}

/// The result of ranking five cards.
///
/// `kickers` holds the tiebreak scores for the category, most significant
/// first. Categories that need fewer than five tiebreak values leave the
/// tail as zero, and since every hand of a category has the same number
/// of meaningful values the padding never decides a comparison.
///
/// Equality and ordering only look at the rank and the tiebreak key. Two
/// hands with the same values in different suits are equal.
#[derive(Debug, Clone, Copy)]
pub struct EvaluatedHand {
    pub rank: HandRank,
    pub kickers: [u8; 5],
    pub cards: [Card; 5],
}

impl EvaluatedHand {
    /// The meaningful part of the tiebreak key.
    pub fn tiebreak(&self) -> &[u8] {
        let len = self.kickers.iter().take_while(|k| **k != 0).count();
        &self.kickers[..len]
    }
}

impl PartialEq for EvaluatedHand {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EvaluatedHand {}

impl PartialOrd for EvaluatedHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvaluatedHand {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

/// Settle a showdown between two ranked hands. Category first, then the
/// tiebreak key element by element.
pub fn compare(a: &EvaluatedHand, b: &EvaluatedHand) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| a.kickers.cmp(&b.kickers))
}

/// Rank exactly five cards.
///
/// Straights are plain runs of five consecutive scores, the ace only
/// plays high.
pub fn rank_five(cards: [Card; 5]) -> EvaluatedHand {
    let mut scores = cards.map(|c| c.score());
    scores.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);

    // Count how often each score appears.
    let mut counts = [0u8; 15];
    for s in scores {
        counts[usize::from(s)] += 1;
    }

    // Distinct scores ordered by how often they appear, then by score.
    let mut grouped = [(0u8, 0u8); 5];
    let mut distinct = 0;
    for s in (2..15u8).rev() {
        let count = counts[usize::from(s)];
        if count > 0 {
            grouped[distinct] = (count, s);
            distinct += 1;
        }
    }
    let grouped = &mut grouped[..distinct];
    grouped.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let mut grouped_key = [0u8; 5];
    for (slot, (_, score)) in grouped_key.iter_mut().zip(grouped.iter()) {
        *slot = *score;
    }

    let is_run = distinct == 5 && scores[0] - scores[4] == 4;

    let (rank, kickers) = if is_flush {
        if scores == [14, 13, 12, 11, 10] {
            (HandRank::RoyalFlush, scores)
        } else if is_run {
            (HandRank::StraightFlush, scores)
        } else {
            (HandRank::Flush, scores)
        }
    } else {
        match (grouped[0].0, grouped.get(1).map(|g| g.0)) {
            (4, _) => (HandRank::FourOfAKind, grouped_key),
            (3, Some(2)) => (HandRank::FullHouse, grouped_key),
            _ if is_run => (HandRank::Straight, scores),
            (3, _) => (HandRank::ThreeOfAKind, grouped_key),
            (2, Some(2)) => (HandRank::TwoPair, grouped_key),
            (2, _) => (HandRank::OnePair, grouped_key),
            _ => (HandRank::HighCard, scores),
        }
    };

    EvaluatedHand {
        rank,
        kickers,
        cards,
    }
}

/// Find the best five card hand out of five or more cards.
///
/// Every five card subset is ranked and the strongest one wins. When
/// several subsets tie the first one found is kept.
pub fn best_hand(cards: &[Card]) -> Result<EvaluatedHand, PokerError> {
    if cards.len() < 5 {
        return Err(PokerError::InvalidHandSize(cards.len()));
    }

    let mut subsets = CardIter::new(cards, 5);
    let mut five = [cards[0]; 5];
    let mut best: Option<EvaluatedHand> = None;
    while subsets.next_into(&mut five) {
        let ranked = rank_five(five);
        if best.is_none_or(|current| ranked > current) {
            best = Some(ranked);
        }
    }
    best.ok_or(PokerError::InvalidHandSize(cards.len()))
}

/// Can this turn into a hand rank?
pub trait Rankable {
    /// The cards to rank.
    fn cards(&self) -> &[Card];

    /// Rank a hand of exactly five cards.
    fn rank_five(&self) -> Result<EvaluatedHand, PokerError> {
        let cards = self.cards();
        match cards {
            &[a, b, c, d, e] => Ok(rank_five([a, b, c, d, e])),
            _ => Err(PokerError::InvalidHandSize(cards.len())),
        }
    }

    /// Rank the best five cards out of all the cards. It doesn't do any
    /// caching so it's left up to the user to understand that duplicate
    /// work will be done if this is called more than once.
    fn rank(&self) -> Result<EvaluatedHand, PokerError> {
        best_hand(self.cards())
    }
}

impl Rankable for [Card] {
    fn cards(&self) -> &[Card] {
        self
    }
}

impl Rankable for Vec<Card> {
    fn cards(&self) -> &[Card] {
        self
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::core::Deck;

    fn ranked(s: &str) -> EvaluatedHand {
        Card::parse_many(s).unwrap().rank_five().unwrap()
    }

    fn best(s: &str) -> EvaluatedHand {
        Card::parse_many(s).unwrap().rank().unwrap()
    }

    #[test]
    fn test_cmp() {
        assert!(HandRank::HighCard < HandRank::StraightFlush);
        assert!(HandRank::HighCard < HandRank::FourOfAKind);
        assert!(HandRank::StraightFlush < HandRank::RoyalFlush);
        assert_eq!(9, HandRank::RoyalFlush as u8);
        assert_eq!(0, HandRank::HighCard as u8);
    }

    #[test]
    fn test_category_fixtures() {
        let fixtures = [
            ("AH KH QH JH TH", HandRank::RoyalFlush),
            ("9S 8S 7S 6S 5S", HandRank::StraightFlush),
            ("2C 2D 2H 2S 7C", HandRank::FourOfAKind),
            ("3C 3D 3H 7C 7D", HandRank::FullHouse),
            ("2C 4C 6C 8C TC", HandRank::Flush),
            ("5C 6D 7H 8S 9C", HandRank::Straight),
            ("QC QD QH 4S 9C", HandRank::ThreeOfAKind),
            ("JC JD 4H 4S 9C", HandRank::TwoPair),
            ("JC JD 4H 8S 9C", HandRank::OnePair),
            ("2C 3D 5H 9S KC", HandRank::HighCard),
        ];
        for (hand, expected) in fixtures {
            assert_eq!(expected, ranked(hand).rank, "{hand}");
        }
    }

    #[test]
    fn test_wheel_is_not_a_straight() {
        let hand = ranked("AD 2C 3S 4H 5S");
        assert_eq!(HandRank::HighCard, hand.rank);
        assert_eq!(&[14, 5, 4, 3, 2], hand.tiebreak());

        let hand = ranked("AD 2D 3D 4D 5D");
        assert_eq!(HandRank::Flush, hand.rank);
    }

    #[test]
    fn test_tiebreak_keys() {
        assert_eq!(&[2, 7], ranked("2C 2D 2H 2S 7C").tiebreak());
        assert_eq!(&[3, 7], ranked("3C 3D 3H 7C 7D").tiebreak());
        assert_eq!(&[12, 9, 4], ranked("QC QD QH 4S 9C").tiebreak());
        assert_eq!(&[11, 4, 9], ranked("JC JD 4H 4S 9C").tiebreak());
        assert_eq!(&[11, 9, 8, 4], ranked("JC JD 4H 8S 9C").tiebreak());
        assert_eq!(&[13, 9, 5, 3, 2], ranked("2C 3D 5H 9S KC").tiebreak());
        assert_eq!(&[9, 8, 7, 6, 5], ranked("5C 6D 7H 8S 9C").tiebreak());
    }

    #[test]
    fn test_kicker_decides() {
        let a = ranked("AC AD 9H 8S 2C");
        let b = ranked("AH AS 9C 7S 6C");
        assert_eq!(Ordering::Greater, compare(&a, &b));
        assert_eq!(Ordering::Less, compare(&b, &a));
    }

    #[test]
    fn test_full_house_trips_first() {
        let threes_full = ranked("3C 3D 3H AC AD");
        let twos_full = ranked("2C 2D 2H KC KD");
        let kings_full = ranked("KC KD KH 2C 2D");
        assert!(threes_full > twos_full);
        assert!(kings_full > threes_full);
    }

    #[test]
    fn test_same_values_different_suits_are_equal() {
        let a = ranked("AC KD 9H 8S 2C");
        let b = ranked("AD KC 9S 8H 2D");
        assert_eq!(Ordering::Equal, compare(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rank_five_wrong_size() {
        let cards = Card::parse_many("AC KD 9H 8S").unwrap();
        assert_eq!(Err(PokerError::InvalidHandSize(4)), cards.rank_five());
        assert_eq!(Err(PokerError::InvalidHandSize(4)), cards.rank());
    }

    #[test]
    fn test_best_of_seven() {
        let hand = best("AH KH 2C 3D QH JH TH");
        assert_eq!(HandRank::RoyalFlush, hand.rank);
        let mut cards = hand.cards.to_vec();
        cards.sort();
        assert_eq!(Card::parse_many("TH JH QH KH AH").unwrap(), cards);

        let hand = best("2C 2D 5H 5S 9C 9D KH");
        assert_eq!(HandRank::TwoPair, hand.rank);
        assert_eq!(&[9, 5, 13], hand.tiebreak());
    }

    #[test]
    fn test_best_six_cards() {
        let hand = best("7C 8D 9H TS JC 2D");
        assert_eq!(HandRank::Straight, hand.rank);
        assert_eq!(&[11, 10, 9, 8, 7], hand.tiebreak());
    }

    #[test]
    fn test_best_is_maximal_and_order_invariant() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let mut deck = Deck::default();
            let mut cards = deck.draw(7, &mut rng).unwrap();
            let found = cards.rank().unwrap();

            for subset in CardIter::new(&cards, 5) {
                assert!(found >= subset.rank_five().unwrap());
            }

            cards.reverse();
            assert_eq!(found, cards.rank().unwrap());
            cards.rotate_left(3);
            assert_eq!(found, cards.rank().unwrap());
        }
    }

    #[test]
    fn test_compare_is_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        let hands: Vec<EvaluatedHand> = (0..60)
            .map(|_| Deck::default().draw(7, &mut rng).unwrap().rank().unwrap())
            .collect();

        for a in &hands {
            assert_eq!(Ordering::Equal, compare(a, a));
            for b in &hands {
                assert_eq!(compare(a, b), compare(b, a).reverse());
                for c in &hands {
                    if compare(a, b) == Ordering::Greater && compare(b, c) == Ordering::Greater {
                        assert_eq!(Ordering::Greater, compare(a, c));
                    }
                }
            }
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!("Royal Flush", HandRank::RoyalFlush.to_string());
        assert_eq!("Two Pair", HandRank::TwoPair.to_string());
        assert_eq!("High Card", HandRank::HighCard.to_string());
    }
}
