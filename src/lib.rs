//! Texas hold'em odds and decisions.
//!
//! Ranks five to seven card hands, estimates the hero's chance of winning
//! a showdown by Monte Carlo playouts, and turns that estimate into a
//! call, raise or fold recommendation.
//!
//! ```
//! use poker_odds::core::Card;
//! use poker_odds::holdem::{Game, StoppingRule};
//!
//! let hero = Card::parse_many("AS AD").unwrap();
//! let mut game = Game::new([hero[0], hero[1]], 2)
//!     .unwrap()
//!     .with_seed(7)
//!     .with_stopping_rule(StoppingRule::Iterations(1_000));
//! game.set_pot_size(100);
//! game.set_amount_to_call(10);
//!
//! let p = game.win_probability().unwrap();
//! assert!(p > 0.5);
//! let decision = game.decide().unwrap();
//! println!("{} {}", decision.action, decision.amount);
//! ```

/// Cards, decks and hand ranking. Nothing in core knows about betting.
pub mod core;
/// Equity simulation and betting decisions for hold'em.
pub mod holdem;
