use std::fmt;
use std::str::FromStr;

use super::PokerError;

/// Card rank or value.
/// This is basically the face value - 2
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
pub enum Value {
    /// 2
    Two = 0,
    /// 3
    Three = 1,
    /// 4
    Four = 2,
    /// 5
    Five = 3,
    /// 6
    Six = 4,
    /// 7
    Seven = 5,
    /// 8
    Eight = 6,
    /// 9
    Nine = 7,
    /// T
    Ten = 8,
    /// J
    Jack = 9,
    /// Q
    Queen = 10,
    /// K
    King = 11,
    /// A
    Ace = 12,
}

/// Constant of all the values.
/// This is what `Value::values()` returns
const VALUES: [Value; 13] = [
    Value::Two,
    Value::Three,
    Value::Four,
    Value::Five,
    Value::Six,
    Value::Seven,
    Value::Eight,
    Value::Nine,
    Value::Ten,
    Value::Jack,
    Value::Queen,
    Value::King,
    Value::Ace,
];

impl Value {
    /// Get all of the `Value`'s that are possible.
    /// This is used to iterate through all possible
    /// values when creating a new deck.
    pub const fn values() -> [Value; 13] {
        VALUES
    }

    /// Numeric score used for hand comparison. Two scores 2 and the
    /// ace scores 14.
    ///
    /// ```
    /// use poker_odds::core::Value;
    ///
    /// assert_eq!(2, Value::Two.score());
    /// assert_eq!(10, Value::Ten.score());
    /// assert_eq!(14, Value::Ace.score());
    /// ```
    pub const fn score(self) -> u8 {
        self as u8 + 2
    }

    pub fn from_char(c: char) -> Option<Value> {
        match c.to_ascii_uppercase() {
            'A' => Some(Value::Ace),
            'K' => Some(Value::King),
            'Q' => Some(Value::Queen),
            'J' => Some(Value::Jack),
            'T' => Some(Value::Ten),
            '9' => Some(Value::Nine),
            '8' => Some(Value::Eight),
            '7' => Some(Value::Seven),
            '6' => Some(Value::Six),
            '5' => Some(Value::Five),
            '4' => Some(Value::Four),
            '3' => Some(Value::Three),
            '2' => Some(Value::Two),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Value::Ace => 'A',
            Value::King => 'K',
            Value::Queen => 'Q',
            Value::Jack => 'J',
            Value::Ten => 'T',
            Value::Nine => '9',
            Value::Eight => '8',
            Value::Seven => '7',
            Value::Six => '6',
            Value::Five => '5',
            Value::Four => '4',
            Value::Three => '3',
            Value::Two => '2',
        }
    }
}

/// Enum for the four different suits.
/// While this has support for ordering it's not
/// sensical. The sorting is only there to allow sorting cards.
#[derive(PartialEq, PartialOrd, Eq, Ord, Debug, Clone, Copy, Hash)]
pub enum Suit {
    /// Clubs
    Club = 0,
    /// Diamonds
    Diamond = 1,
    /// Hearts
    Heart = 2,
    /// Spades
    Spade = 3,
}

/// All of the `Suit`'s. This is what `Suit::suits()` returns.
const SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];

impl Suit {
    /// Provide all the Suit's that there are.
    pub const fn suits() -> [Suit; 4] {
        SUITS
    }

    pub fn from_char(s: char) -> Option<Suit> {
        match s.to_ascii_uppercase() {
            'C' => Some(Suit::Club),
            'D' => Some(Suit::Diamond),
            'H' => Some(Suit::Heart),
            'S' => Some(Suit::Spade),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Club => 'C',
            Suit::Diamond => 'D',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        }
    }
}

/// The main struct of this library.
/// This is a carrier for Suit and Value combined.
///
/// Cards order by value first and suit second, so sorting a slice of
/// cards yields the canonical rank-major, suit-minor order.
#[derive(PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub struct Card {
    /// The face value of this card.
    pub value: Value,
    /// The suit of this card.
    pub suit: Suit,
}

impl Card {
    pub const fn new(value: Value, suit: Suit) -> Self {
        Self { value, suit }
    }

    /// Numeric rank score of this card, 2 through 14.
    pub const fn score(&self) -> u8 {
        self.value.score()
    }

    /// All 52 cards in canonical order: every suit of the deuce, then
    /// every suit of the trey, and so on up to the aces.
    ///
    /// ```
    /// use poker_odds::core::{Card, Suit, Value};
    ///
    /// let cards = Card::all();
    /// assert_eq!(52, cards.len());
    /// assert_eq!(Card::new(Value::Two, Suit::Club), cards[0]);
    /// assert_eq!(Card::new(Value::Ace, Suit::Spade), cards[51]);
    /// ```
    pub fn all() -> Vec<Card> {
        Value::values()
            .iter()
            .flat_map(|v| Suit::suits().into_iter().map(move |s| Card::new(*v, s)))
            .collect()
    }

    /// Parse any number of cards from text.
    ///
    /// Cards are two characters each, value then suit. They can be written
    /// back to back or separated by commas and whitespace.
    ///
    /// ```
    /// use poker_odds::core::Card;
    ///
    /// let cards = Card::parse_many("AH KD, 7c").unwrap();
    /// assert_eq!(3, cards.len());
    /// assert_eq!("KD", cards[1].to_string());
    /// ```
    pub fn parse_many(text: &str) -> Result<Vec<Card>, PokerError> {
        let mut chars = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .peekable();
        let mut cards = Vec::new();

        while let Some(vc) = chars.next() {
            let v = Value::from_char(vc).ok_or(PokerError::UnexpectedValueChar)?;
            let s = chars
                .next()
                .ok_or(PokerError::TooFewChars)
                .and_then(|sc| Suit::from_char(sc).ok_or(PokerError::UnexpectedSuitChar))?;
            cards.push(Card::new(v, s));
        }

        Ok(cards)
    }
}

/// Each card maps to a unique index in `0..52`, value-major.
impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.value as u8 * 4 + card.suit as u8
    }
}

impl From<u8> for Card {
    fn from(idx: u8) -> Self {
        let idx = idx % 52;
        Card {
            value: Value::values()[usize::from(idx / 4)],
            suit: Suit::suits()[usize::from(idx % 4)],
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value.to_char(), self.suit.to_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({})", self)
    }
}

impl FromStr for Card {
    type Err = PokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let v = chars
            .next()
            .ok_or(PokerError::TooFewChars)
            .and_then(|c| Value::from_char(c).ok_or(PokerError::UnexpectedValueChar))?;
        let s = chars
            .next()
            .ok_or(PokerError::TooFewChars)
            .and_then(|c| Suit::from_char(c).ok_or(PokerError::UnexpectedSuitChar))?;
        if chars.next().is_some() {
            return Err(PokerError::UnparsedCharsRemaining);
        }
        Ok(Card::new(v, s))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
