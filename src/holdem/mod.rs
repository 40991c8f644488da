/// A single hand with known cards that can be played out at random.
mod monte_carlo_game;
/// Export `MonteCarloGame`
pub use self::monte_carlo_game::{MAX_OPPONENTS, MonteCarloGame};

/// Budgeted, cancellable runs of many playouts.
mod simulation;
pub use self::simulation::{
    Progress, Simulation, SimulationOutcome, SimulationResult, SimulationStatus, StoppingRule,
};

/// What a caller sends to start a run.
mod request;
pub use self::request::SimulationRequest;

/// Running simulations on a background thread.
mod worker;
pub use self::worker::{SimulationEvent, SimulationHandle, SimulationSession};

/// Expected value based call, raise or fold.
mod decision;
pub use self::decision::{Action, Decision, DecisionConfig, DecisionEngine, expected_value_of_call};

/// Module for `Game` that will hold the current state of the game.
mod game;
/// Export `Game`
pub use self::game::{EquityCache, EquityKey, Game};
