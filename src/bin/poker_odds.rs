use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use poker_odds::core::Card;
use poker_odds::holdem::{
    DecisionConfig, DecisionEngine, SimulationEvent, SimulationHandle, SimulationOutcome,
    SimulationRequest,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "poker-odds",
    about = "Estimate hold'em equity and recommend a call, raise or fold",
    long_about = "Run Monte Carlo playouts for the hero's hand against random opponents.\n\
                  Set RUST_LOG (e.g. RUST_LOG=poker_odds=debug) for more output."
)]
struct Args {
    /// Read the whole request from a JSON file instead of the flags below.
    #[arg(long, conflicts_with_all = ["hero", "board", "opponents"])]
    request: Option<PathBuf>,

    /// Hero hole cards, e.g. "AH,AC".
    #[arg(long, required_unless_present = "request")]
    hero: Option<String>,

    /// Community cards seen so far, e.g. "2D,7S,9H".
    #[arg(long, default_value = "")]
    board: String,

    /// Number of opponents.
    #[arg(long, default_value_t = 1)]
    opponents: usize,

    #[arg(long, default_value_t = 0)]
    pot: u32,

    #[arg(long, default_value_t = 0)]
    call: u32,

    /// Number of playouts. Defaults to 10000 when no time budget is set.
    #[arg(short = 'n', long, conflicts_with = "millis")]
    iterations: Option<usize>,

    /// Wall clock budget in milliseconds.
    #[arg(long)]
    millis: Option<u64>,

    /// Playouts between progress lines.
    #[arg(long, default_value_t = 1_000)]
    interval: usize,

    /// Seed the rng for a repeatable run.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = DecisionConfig::default().max_raise_amount)]
    max_raise: u32,

    #[arg(long, default_value_t = DecisionConfig::default().fold_probability)]
    fold_probability: f64,
}

impl Args {
    fn to_request(&self) -> Result<SimulationRequest, Box<dyn Error>> {
        if let Some(path) = &self.request {
            let text = fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&text)?);
        }

        let hero = Card::parse_many(self.hero.as_deref().unwrap_or_default())?;
        let board = Card::parse_many(&self.board)?;
        let mut request = SimulationRequest::new(hero, board, self.opponents);
        request.pot_size = self.pot;
        request.amount_to_call = self.call;
        request.simulation_iterations = self.iterations;
        request.milliseconds = self.millis;
        request.progress_interval = self.interval;
        Ok(request)
    }
}

fn join(cards: &[Card]) -> String {
    cards.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let request = args.to_request()?;
    let simulation = request.build_simulation()?;

    println!(
        "Hero: {}  Board: {}  Opponents: {}",
        join(&request.hero_hand),
        join(&request.community_cards),
        request.num_players
    );

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let handle = SimulationHandle::spawn_with_rng(simulation, rng);

    let mut outcome = None;
    for event in handle {
        match event {
            SimulationEvent::Progress(p) => {
                println!(
                    "{:>6.2}%  {:>8} playouts  win {:.4}",
                    p.pct, p.playouts, p.win_probability
                );
            }
            SimulationEvent::Finished(o) => outcome = Some(o),
        }
    }

    let result = match outcome {
        Some(SimulationOutcome::Completed(r)) | Some(SimulationOutcome::Cancelled(r)) => r,
        Some(SimulationOutcome::Failed(e)) => return Err(e.into()),
        None => return Err("simulation ended without a result".into()),
    };

    let engine = DecisionEngine::new(DecisionConfig {
        max_raise_amount: args.max_raise,
        fold_probability: args.fold_probability,
    });
    let p = result.win_probability();
    let decision = engine.decide(p, request.pot_size, request.amount_to_call, request.num_players);

    println!();
    println!("Win probability: {:.2}% over {} playouts", p * 100.0, result.playouts);
    println!("Decision: {} {}", decision.action, decision.amount);
    Ok(())
}
