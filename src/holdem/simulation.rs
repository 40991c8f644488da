use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{event, trace_span};

use crate::core::PokerError;

use super::MonteCarloGame;

/// How long a simulation keeps running. The two budgets are mutually
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoppingRule {
    /// Run exactly this many playouts.
    Iterations(usize),
    /// Keep running playouts until this much wall clock time has passed.
    Duration(Duration),
}

impl Default for StoppingRule {
    fn default() -> Self {
        StoppingRule::Iterations(10_000)
    }
}

/// Where a simulation is in its life.
///
/// `Idle -> Running -> {Completed | Cancelled | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// A snapshot of a running simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Progress {
    /// Completed share of the budget, 0 to 100.
    pub pct: f64,
    /// Wins divided by playouts so far.
    pub win_probability: f64,
    /// Whole playouts finished so far.
    pub playouts: usize,
}

/// Tally of whole playouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    pub wins: usize,
    pub playouts: usize,
}

impl SimulationResult {
    /// Wins over playouts, zero before the first playout.
    pub fn win_probability(&self) -> f64 {
        if self.playouts == 0 {
            0.0
        } else {
            self.wins as f64 / self.playouts as f64
        }
    }

    fn merge(self, other: SimulationResult) -> SimulationResult {
        SimulationResult {
            wins: self.wins + other.wins,
            playouts: self.playouts + other.playouts,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    /// The budget was used up.
    Completed(SimulationResult),
    /// The caller asked to stop. Only whole playouts are counted.
    Cancelled(SimulationResult),
    /// A playout failed. The run is over and no 100% progress is sent.
    Failed(PokerError),
}

impl SimulationOutcome {
    pub fn status(&self) -> SimulationStatus {
        match self {
            SimulationOutcome::Completed(_) => SimulationStatus::Completed,
            SimulationOutcome::Cancelled(_) => SimulationStatus::Cancelled,
            SimulationOutcome::Failed(_) => SimulationStatus::Failed,
        }
    }

    /// The tally, if the run didn't fail.
    pub fn result(&self) -> Option<SimulationResult> {
        match self {
            SimulationOutcome::Completed(r) | SimulationOutcome::Cancelled(r) => Some(*r),
            SimulationOutcome::Failed(_) => None,
        }
    }
}

/// A single equity estimation run.
///
/// Playouts run one after another. After every `progress_interval`
/// playouts a [`Progress`] is handed to the caller, and once the budget
/// is used up one last progress at 100% is sent. The cancel flag is
/// checked between playouts.
#[derive(Debug, Clone)]
pub struct Simulation {
    game: MonteCarloGame,
    stopping_rule: StoppingRule,
    progress_interval: usize,
    status: SimulationStatus,
}

impl Simulation {
    pub fn new(
        game: MonteCarloGame,
        stopping_rule: StoppingRule,
        progress_interval: usize,
    ) -> Result<Self, PokerError> {
        match stopping_rule {
            StoppingRule::Iterations(0) => {
                return Err(PokerError::InvalidSimulationParameters(String::from(
                    "iteration count must be positive",
                )));
            }
            StoppingRule::Duration(d) if d.is_zero() => {
                return Err(PokerError::InvalidSimulationParameters(String::from(
                    "time budget must be positive",
                )));
            }
            _ => {}
        }
        if progress_interval == 0 {
            return Err(PokerError::InvalidSimulationParameters(String::from(
                "progress interval must be positive",
            )));
        }
        Ok(Self {
            game,
            stopping_rule,
            progress_interval,
            status: SimulationStatus::Idle,
        })
    }

    pub fn game(&self) -> &MonteCarloGame {
        &self.game
    }

    pub fn stopping_rule(&self) -> StoppingRule {
        self.stopping_rule
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    /// Run the simulation to the end of its budget, or until `cancel` is
    /// set.
    pub fn run<R, F>(&mut self, rng: &mut R, cancel: &AtomicBool, mut on_progress: F) -> SimulationOutcome
    where
        R: Rng + ?Sized,
        F: FnMut(Progress),
    {
        let span = trace_span!(
            "simulation",
            opponents = self.game.num_opponents(),
            board = self.game.board().len()
        );
        let _enter = span.enter();

        self.status = SimulationStatus::Running;
        event!(tracing::Level::DEBUG, rule = ?self.stopping_rule, "Simulation started");

        let start = Instant::now();
        let mut tally = SimulationResult::default();

        loop {
            if self.completed_pct(start, tally.playouts).is_none() {
                break;
            }

            if cancel.load(Ordering::Relaxed) {
                self.status = SimulationStatus::Cancelled;
                event!(
                    tracing::Level::INFO,
                    playouts = tally.playouts,
                    "Simulation cancelled"
                );
                return SimulationOutcome::Cancelled(tally);
            }

            match self.game.simulate(rng) {
                Ok(won) => {
                    tally.playouts += 1;
                    if won {
                        tally.wins += 1;
                    }
                }
                Err(e) => {
                    self.status = SimulationStatus::Failed;
                    event!(tracing::Level::ERROR, error = %e, "Playout failed");
                    return SimulationOutcome::Failed(e);
                }
            }

            if tally.playouts % self.progress_interval != 0 || cancel.load(Ordering::Relaxed) {
                continue;
            }
            // The last playout is reported by the 100% progress below.
            if let Some(pct) = self.completed_pct(start, tally.playouts) {
                let progress = Progress {
                    pct,
                    win_probability: tally.win_probability(),
                    playouts: tally.playouts,
                };
                event!(tracing::Level::TRACE, ?progress, "Simulation progress");
                on_progress(progress);
            }
        }

        on_progress(Progress {
            pct: 100.0,
            win_probability: tally.win_probability(),
            playouts: tally.playouts,
        });

        let elapsed = start.elapsed().as_secs_f64();
        event!(
            tracing::Level::INFO,
            playouts = tally.playouts,
            win_probability = tally.win_probability(),
            per_second = tally.playouts as f64 / elapsed.max(f64::EPSILON),
            "Simulation finished"
        );
        self.status = SimulationStatus::Completed;
        SimulationOutcome::Completed(tally)
    }

    /// Share of the budget used so far, None once all of it is used.
    fn completed_pct(&self, start: Instant, playouts: usize) -> Option<f64> {
        match self.stopping_rule {
            StoppingRule::Iterations(n) if playouts >= n => None,
            StoppingRule::Iterations(n) => Some(playouts as f64 * 100.0 / n as f64),
            StoppingRule::Duration(d) => {
                let elapsed = start.elapsed();
                (elapsed < d).then(|| elapsed.as_secs_f64() / d.as_secs_f64() * 100.0)
            }
        }
    }

    /// Split the budget across `shards` and run them on the rayon pool.
    ///
    /// Each shard clones the game, seeds its own rng from `seed` and its
    /// index, and the tallies are added together once every shard has
    /// finished. No progress is reported. With a time budget every shard
    /// runs for the whole duration.
    pub fn estimate_parallel(&self, shards: usize, seed: u64) -> Result<SimulationResult, PokerError> {
        if shards == 0 {
            return Err(PokerError::InvalidSimulationParameters(String::from(
                "at least one shard is needed",
            )));
        }

        let budgets: Vec<StoppingRule> = match self.stopping_rule {
            StoppingRule::Iterations(n) => (0..shards)
                .map(|i| StoppingRule::Iterations(n / shards + usize::from(i < n % shards)))
                .filter(|rule| *rule != StoppingRule::Iterations(0))
                .collect(),
            StoppingRule::Duration(d) => vec![StoppingRule::Duration(d); shards],
        };

        let never = AtomicBool::new(false);
        budgets
            .into_par_iter()
            .enumerate()
            .map(|(idx, rule)| {
                let mut shard = Simulation {
                    game: self.game.clone(),
                    stopping_rule: rule,
                    progress_interval: usize::MAX,
                    status: SimulationStatus::Idle,
                };
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(idx as u64));
                match shard.run(&mut rng, &never, |_| {}) {
                    SimulationOutcome::Failed(e) => Err(e),
                    other => Ok(other.result().unwrap_or_default()),
                }
            })
            .try_reduce(SimulationResult::default, |a, b| Ok(a.merge(b)))
    }
}
