use std::time::Duration;

use crate::core::{Card, PokerError};

use super::{MonteCarloGame, Simulation, StoppingRule};

const DEFAULT_ITERATIONS: usize = 10_000;
const DEFAULT_PROGRESS_INTERVAL: usize = 1_000;

fn default_progress_interval() -> usize {
    DEFAULT_PROGRESS_INTERVAL
}

/// Everything a caller sends to start a simulation.
///
/// On the wire this is JSON with camelCase keys and two character
/// cards:
///
/// ```
/// use poker_odds::holdem::SimulationRequest;
///
/// let request: SimulationRequest = serde_json::from_str(
///     r#"{
///         "heroHand": ["AH", "AC"],
///         "communityCards": ["2D", "7S", "9H"],
///         "numPlayers": 2,
///         "potSize": 100,
///         "amountToCall": 20,
///         "simulationIterations": 5000,
///         "progressInterval": 500
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(2, request.num_players);
/// assert!(request.build_simulation().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SimulationRequest {
    #[cfg_attr(feature = "serde", serde(alias = "myHand"))]
    pub hero_hand: Vec<Card>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub community_cards: Vec<Card>,
    /// Number of opponents.
    pub num_players: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pot_size: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub amount_to_call: u32,
    /// Playout budget. Can't be combined with `milliseconds`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub simulation_iterations: Option<usize>,
    /// Wall clock budget. Can't be combined with `simulation_iterations`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub milliseconds: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default = "default_progress_interval"))]
    pub progress_interval: usize,
}

impl SimulationRequest {
    pub fn new(hero_hand: Vec<Card>, community_cards: Vec<Card>, num_players: usize) -> Self {
        Self {
            hero_hand,
            community_cards,
            num_players,
            pot_size: 0,
            amount_to_call: 0,
            simulation_iterations: None,
            milliseconds: None,
            progress_interval: default_progress_interval(),
        }
    }

    /// Which budget this request asks for. With neither set the default
    /// playout count is used.
    pub fn stopping_rule(&self) -> Result<StoppingRule, PokerError> {
        match (self.simulation_iterations, self.milliseconds) {
            (Some(_), Some(_)) => Err(PokerError::InvalidSimulationParameters(String::from(
                "iteration count and time budget are mutually exclusive",
            ))),
            (Some(n), None) => Ok(StoppingRule::Iterations(n)),
            (None, Some(ms)) => Ok(StoppingRule::Duration(Duration::from_millis(ms))),
            (None, None) => Ok(StoppingRule::Iterations(DEFAULT_ITERATIONS)),
        }
    }

    /// Check every parameter and build a ready to run simulation. Nothing
    /// about a request can fail once this returns Ok.
    pub fn build_simulation(&self) -> Result<Simulation, PokerError> {
        let game = MonteCarloGame::new(&self.hero_hand, &self.community_cards, self.num_players)?;
        Simulation::new(game, self.stopping_rule()?, self.progress_interval)
    }
}
