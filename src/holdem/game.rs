use std::sync::atomic::AtomicBool;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::event;

use crate::core::{Card, Deck, PokerError};

use super::{
    Decision, DecisionConfig, DecisionEngine, MonteCarloGame, Simulation, SimulationOutcome,
    StoppingRule, expected_value_of_call,
};

/// The inputs an equity estimate depends on. Pot size and the amount to
/// call are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EquityKey {
    pub hero: [Card; 2],
    pub board: Vec<Card>,
    pub num_opponents: usize,
}

/// A win probability remembered for one [`EquityKey`].
///
/// A lookup with any other key misses, so changing the hero hand, the
/// board or the opponent count always forces a fresh simulation.
#[derive(Debug, Clone, Default)]
pub struct EquityCache {
    entry: Option<(EquityKey, f64)>,
}

impl EquityCache {
    pub fn get(&self, key: &EquityKey) -> Option<f64> {
        match &self.entry {
            Some((k, v)) if k == key => Some(*v),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: EquityKey, value: f64) {
        self.entry = Some((key, value));
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// The state of one hand from the hero's point of view.
///
/// Holds the hero's hole cards, the community cards seen so far, the
/// number of opponents and the betting numbers. The win probability is
/// simulated on demand and cached until one of its inputs changes.
#[derive(Debug, Clone)]
pub struct Game {
    hero: [Card; 2],
    board: Vec<Card>,
    num_opponents: usize,
    pot_size: u32,
    amount_to_call: u32,
    /// Cards that are neither in the hero's hand nor on the board.
    deck: Deck,
    stopping_rule: StoppingRule,
    engine: DecisionEngine,
    cache: EquityCache,
    rng: StdRng,
}

impl Game {
    pub fn new(hero: [Card; 2], num_opponents: usize) -> Result<Self, PokerError> {
        // Fail early on a bad hand or opponent count.
        MonteCarloGame::new(&hero, &[], num_opponents)?;
        Ok(Self {
            hero,
            board: Vec::with_capacity(5),
            num_opponents,
            pot_size: 0,
            amount_to_call: 0,
            deck: Deck::new(&hero),
            stopping_rule: StoppingRule::default(),
            engine: DecisionEngine::default(),
            cache: EquityCache::default(),
            rng: StdRng::from_rng(&mut rand::rng()),
        })
    }

    /// Use a fixed seed for every simulation this game runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_stopping_rule(mut self, stopping_rule: StoppingRule) -> Self {
        self.stopping_rule = stopping_rule;
        self
    }

    pub fn with_decision_config(mut self, config: DecisionConfig) -> Self {
        self.engine = DecisionEngine::new(config);
        self
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

    pub fn pot_size(&self) -> u32 {
        self.pot_size
    }

    pub fn amount_to_call(&self) -> u32 {
        self.amount_to_call
    }

    /// Doesn't touch the cached win probability.
    pub fn set_pot_size(&mut self, pot_size: u32) {
        self.pot_size = pot_size;
    }

    /// Doesn't touch the cached win probability.
    pub fn set_amount_to_call(&mut self, amount_to_call: u32) {
        self.amount_to_call = amount_to_call;
    }

    pub fn set_num_players(&mut self, num_opponents: usize) -> Result<(), PokerError> {
        MonteCarloGame::new(&self.hero, &self.board, num_opponents)?;
        self.num_opponents = num_opponents;
        self.cache.invalidate();
        Ok(())
    }

    /// Put a known card on the board.
    pub fn add_community_card(&mut self, card: Card) -> Result<(), PokerError> {
        if self.board.len() >= 5 {
            return Err(PokerError::InvalidSimulationParameters(String::from(
                "the board already has 5 cards",
            )));
        }
        if !self.deck.remove(&card) {
            return Err(PokerError::DuplicateCard(card));
        }
        self.board.push(card);
        self.cache.invalidate();
        Ok(())
    }

    /// Deal random cards onto the board.
    pub fn draw_community_cards(&mut self, n: usize) -> Result<Vec<Card>, PokerError> {
        if self.board.len() + n > 5 {
            return Err(PokerError::InvalidSimulationParameters(format!(
                "can't deal {} more cards onto a board of {}",
                n,
                self.board.len()
            )));
        }
        let cards = self.deck.draw(n, &mut self.rng)?;
        self.board.extend_from_slice(&cards);
        self.cache.invalidate();
        Ok(cards)
    }

    fn equity_key(&self) -> EquityKey {
        EquityKey {
            hero: self.hero,
            board: self.board.clone(),
            num_opponents: self.num_opponents,
        }
    }

    /// Estimated chance the hero wins the showdown. Only simulated when
    /// nothing is cached for the current cards and opponent count.
    pub fn win_probability(&mut self) -> Result<f64, PokerError> {
        let key = self.equity_key();
        if let Some(p) = self.cache.get(&key) {
            return Ok(p);
        }

        let game = MonteCarloGame::new(&self.hero, &self.board, self.num_opponents)?;
        let mut simulation = Simulation::new(game, self.stopping_rule, usize::MAX)?;
        let result = match simulation.run(&mut self.rng, &AtomicBool::new(false), |_| {}) {
            SimulationOutcome::Failed(e) => return Err(e),
            other => other.result().unwrap_or_default(),
        };

        let p = result.win_probability();
        event!(
            tracing::Level::DEBUG,
            playouts = result.playouts,
            win_probability = p,
            "Win probability simulated"
        );
        self.cache.insert(key, p);
        Ok(p)
    }

    pub fn expected_value_of_call(&mut self) -> Result<f64, PokerError> {
        let p = self.win_probability()?;
        Ok(expected_value_of_call(p, self.pot_size, self.amount_to_call))
    }

    /// The raise with the highest expected value, or 0 when calling is
    /// better. That raise can still lose money on average, for example
    /// with no chance of winning and a bet to call, so use
    /// [`Game::decide`] for what to actually do.
    pub fn ideal_raise_amount(&mut self) -> Result<u32, PokerError> {
        let p = self.win_probability()?;
        Ok(self
            .engine
            .ideal_raise(p, self.pot_size, self.amount_to_call, self.num_opponents)
            .0)
    }

    /// Call, raise or fold for the current state.
    pub fn decide(&mut self) -> Result<Decision, PokerError> {
        let p = self.win_probability()?;
        Ok(self
            .engine
            .decide(p, self.pot_size, self.amount_to_call, self.num_opponents))
    }
}
