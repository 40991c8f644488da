use rand::Rng;

use crate::core::{Card, CardBitSet, Deck, PokerError, Rankable};

/// Largest possible number of opponents. The hero's hole cards leave 50
/// unseen cards and the five board cards plus two per opponent have to
/// fit in them.
pub const MAX_OPPONENTS: usize = 22;

/// One hero hand against a number of opponents holding unknown cards.
///
/// The base deck already has the hero's hole cards and the known board
/// removed. Every playout clones it, completes the board, deals every
/// opponent two cards and then compares hands.
#[derive(Debug, Clone)]
pub struct MonteCarloGame {
    hero: [Card; 2],
    board: Vec<Card>,
    num_opponents: usize,
    deck: Deck,
}

impl MonteCarloGame {
    /// Check the inputs and build the starting deck.
    ///
    /// ```
    /// use poker_odds::core::Card;
    /// use poker_odds::holdem::MonteCarloGame;
    ///
    /// let hero = Card::parse_many("AH AC").unwrap();
    /// let board = Card::parse_many("2D 7S 9H").unwrap();
    /// let game = MonteCarloGame::new(&hero, &board, 3).unwrap();
    /// assert_eq!(47, game.deck().len());
    /// assert_eq!(2 + 3 * 2, game.cards_needed());
    /// ```
    pub fn new(hero: &[Card], board: &[Card], num_opponents: usize) -> Result<Self, PokerError> {
        let hero: [Card; 2] = hero.try_into().map_err(|_| {
            PokerError::InvalidSimulationParameters(format!(
                "hero needs exactly 2 hole cards, got {}",
                hero.len()
            ))
        })?;
        if board.len() > 5 {
            return Err(PokerError::InvalidSimulationParameters(format!(
                "at most 5 community cards, got {}",
                board.len()
            )));
        }
        if num_opponents == 0 {
            return Err(PokerError::InvalidSimulationParameters(String::from(
                "at least one opponent is needed",
            )));
        }

        let known = CardBitSet::try_from_unique(hero.iter().chain(board.iter()).copied())
            .map_err(|e| PokerError::InvalidSimulationParameters(e.to_string()))?;
        let deck = Deck::from(!known);

        let needed = (5 - board.len()) + 2 * num_opponents;
        if needed > deck.len() {
            return Err(PokerError::InvalidSimulationParameters(format!(
                "{} opponents need {} unseen cards but only {} remain",
                num_opponents,
                needed,
                deck.len()
            )));
        }

        Ok(Self {
            hero,
            board: board.to_vec(),
            num_opponents,
            deck,
        })
    }

    pub fn hero(&self) -> &[Card; 2] {
        &self.hero
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn num_opponents(&self) -> usize {
        self.num_opponents
    }

    /// The unseen cards every playout starts from.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Number of cards each playout deals.
    pub fn cards_needed(&self) -> usize {
        (5 - self.board.len()) + 2 * self.num_opponents
    }

    /// Run one playout. Returns true if the hero's best hand is at least
    /// as good as every opponent's. Ties count as a win.
    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<bool, PokerError> {
        let mut deck = self.deck.clone();

        let mut board = Vec::with_capacity(5);
        board.extend_from_slice(&self.board);
        deck.draw_into(5 - self.board.len(), rng, &mut board)?;

        // Every opponent is dealt before anything is evaluated.
        let mut opponents = Vec::with_capacity(2 * self.num_opponents);
        deck.draw_into(2 * self.num_opponents, rng, &mut opponents)?;

        let mut cards = Vec::with_capacity(7);
        cards.extend_from_slice(&self.hero);
        cards.extend_from_slice(&board);
        let hero_best = cards.rank()?;

        for hole in opponents.chunks_exact(2) {
            cards.clear();
            cards.extend_from_slice(hole);
            cards.extend_from_slice(&board);
            if cards.rank()? > hero_best {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Run a fixed number of playouts and return the fraction won.
    pub fn estimate_equity<R: Rng + ?Sized>(
        &self,
        iterations: usize,
        rng: &mut R,
    ) -> Result<f64, PokerError> {
        if iterations == 0 {
            return Err(PokerError::InvalidSimulationParameters(String::from(
                "iteration count must be positive",
            )));
        }
        let mut wins = 0usize;
        for _ in 0..iterations {
            if self.simulate(rng)? {
                wins += 1;
            }
        }
        Ok(wins as f64 / iterations as f64)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::core::{CardIter, compare};

    fn cards(s: &str) -> Vec<Card> {
        Card::parse_many(s).unwrap()
    }

    #[test]
    fn test_rejects_bad_hero() {
        let err = MonteCarloGame::new(&cards("AH"), &[], 1).unwrap_err();
        assert!(matches!(err, PokerError::InvalidSimulationParameters(_)));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = MonteCarloGame::new(&cards("AH AC"), &cards("AH 2D 3D"), 1).unwrap_err();
        assert!(matches!(err, PokerError::InvalidSimulationParameters(_)));
    }

    #[test]
    fn test_rejects_too_many_board_cards() {
        let err = MonteCarloGame::new(&cards("AH AC"), &cards("2D 3D 4D 5D 6D 7D"), 1).unwrap_err();
        assert!(matches!(err, PokerError::InvalidSimulationParameters(_)));
    }

    #[test]
    fn test_opponent_limits() {
        let hero = cards("AH AC");
        assert!(MonteCarloGame::new(&hero, &[], 0).is_err());
        assert!(MonteCarloGame::new(&hero, &[], MAX_OPPONENTS).is_ok());
        assert!(MonteCarloGame::new(&hero, &[], MAX_OPPONENTS + 1).is_err());
    }

    #[test]
    fn test_royal_flush_never_loses() {
        let g = MonteCarloGame::new(&cards("AH KH"), &cards("QH JH TH"), 5).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            assert!(g.simulate(&mut rng).unwrap());
        }
    }

    #[test]
    fn test_base_deck_untouched() {
        let g = MonteCarloGame::new(&cards("2C 7D"), &[], 4).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        g.estimate_equity(100, &mut rng).unwrap();
        assert_eq!(50, g.deck().len());
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let g = MonteCarloGame::new(&cards("9S 9D"), &cards("2C"), 2).unwrap();
        let one = g.estimate_equity(2_000, &mut StdRng::seed_from_u64(420)).unwrap();
        let two = g.estimate_equity(2_000, &mut StdRng::seed_from_u64(420)).unwrap();
        assert_eq!(one, two);
    }

    #[test]
    fn test_more_opponents_lower_equity() {
        let g_one = MonteCarloGame::new(&cards("AS AD"), &[], 1).unwrap();
        let g_six = MonteCarloGame::new(&cards("AS AD"), &[], 6).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let one = g_one.estimate_equity(5_000, &mut rng).unwrap();
        let six = g_six.estimate_equity(5_000, &mut rng).unwrap();
        assert!(one > six, "{one} should beat {six}");
    }

    #[test]
    fn test_matches_enumeration_on_full_board() {
        let hero = cards("AH AC");
        // No pair, no straight and no flush possible on this board.
        let board = cards("2D 7S 9H JC 4D");
        let g = MonteCarloGame::new(&hero, &board, 1).unwrap();

        // Count every possible opponent holding.
        let unseen: Vec<Card> = g.deck().iter().copied().collect();
        let mut all = hero.clone();
        all.extend_from_slice(&board);
        let hero_best = all.rank().unwrap();
        let (mut wins, mut total) = (0usize, 0usize);
        for hole in CardIter::new(&unseen, 2) {
            let mut opp = hole.clone();
            opp.extend_from_slice(&board);
            if compare(&hero_best, &opp.rank().unwrap()).is_ge() {
                wins += 1;
            }
            total += 1;
        }
        let exact = wins as f64 / total as f64;

        let mut rng = StdRng::seed_from_u64(1234);
        let estimate = g.estimate_equity(50_000, &mut rng).unwrap();
        assert_abs_diff_eq!(exact, estimate, epsilon = 0.01);
    }
}
