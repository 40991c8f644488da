use std::fmt;

use tracing::event;

/// Knobs for the raise search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct DecisionConfig {
    /// Largest raise the search will consider.
    pub max_raise_amount: u32,
    /// Chance that any single opponent folds to a raise. The same for
    /// every opponent and every raise size.
    pub fold_probability: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            max_raise_amount: 1_000,
            fold_probability: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Action {
    Call,
    Raise,
    Fold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Call => "call",
            Action::Raise => "raise",
            Action::Fold => "fold",
        };
        f.write_str(s)
    }
}

/// What to do, and for how much. Folding is always for 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub action: Action,
    pub amount: u32,
}

impl Decision {
    pub fn fold() -> Self {
        Self {
            action: Action::Fold,
            amount: 0,
        }
    }
}

/// Expected value of calling: win the pot plus the call, pay the call.
///
/// ```
/// use poker_odds::holdem::expected_value_of_call;
///
/// assert_eq!(10.0, expected_value_of_call(0.5, 100, 80));
/// assert_eq!(-80.0, expected_value_of_call(0.0, 100, 80));
/// ```
pub fn expected_value_of_call(win_probability: f64, pot_size: u32, amount_to_call: u32) -> f64 {
    win_probability * (f64::from(pot_size) + f64::from(amount_to_call)) - f64::from(amount_to_call)
}

/// Picks call, raise or fold from an equity estimate.
///
/// Raises are modelled with a single fold probability per opponent.
/// For every count `k` of opponents who stay in, the outcome is weighted
/// by `(1 - f)^k * f^(n - k)` and the equity is discounted by the same
/// `f^(n - k)` factor.
// TODO: give the equity discount its own factor instead of reusing the
// fold weight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Expected value of raising to `raise_amount` against
    /// `num_opponents` opponents.
    pub fn expected_value_of_raise(
        &self,
        win_probability: f64,
        pot_size: u32,
        num_opponents: usize,
        raise_amount: u32,
    ) -> f64 {
        let f = self.config.fold_probability;
        let raise = f64::from(raise_amount);
        let pot = f64::from(pot_size);
        let n = num_opponents as i32;

        (0..=n)
            .map(|k| {
                let stays = (1.0 - f).powi(k) * f.powi(n - k);
                let pot_after_raise = pot + raise * f64::from(k + 1);
                let adjusted = win_probability * f.powi(n - k);
                stays * (adjusted * pot_after_raise - raise)
            })
            .sum()
    }

    /// Search every whole raise from the amount to call up to the
    /// configured maximum. Returns the best raise and its expected value,
    /// or `(0, call_ev)` when no raise beats calling.
    ///
    /// The best raise only has to beat calling, so its expected value can
    /// still be negative. [`DecisionEngine::decide`] never raises then.
    pub fn ideal_raise(
        &self,
        win_probability: f64,
        pot_size: u32,
        amount_to_call: u32,
        num_opponents: usize,
    ) -> (u32, f64) {
        let mut best = (0, expected_value_of_call(win_probability, pot_size, amount_to_call));
        for raise in amount_to_call..=self.config.max_raise_amount {
            let ev = self.expected_value_of_raise(win_probability, pot_size, num_opponents, raise);
            if ev > best.1 {
                best = (raise, ev);
            }
        }
        best
    }

    /// Decide what to do.
    ///
    /// Raise when the best raise is worth more than calling and more than
    /// nothing. Otherwise call when calling is worth something, or when
    /// it is free and there is any chance of winning. Otherwise fold.
    ///
    /// ```
    /// use poker_odds::holdem::{Action, DecisionEngine};
    ///
    /// let engine = DecisionEngine::default();
    /// assert_eq!(Action::Fold, engine.decide(0.0, 100, 50, 3).action);
    /// assert_ne!(Action::Fold, engine.decide(1.0, 100, 0, 3).action);
    /// ```
    pub fn decide(
        &self,
        win_probability: f64,
        pot_size: u32,
        amount_to_call: u32,
        num_opponents: usize,
    ) -> Decision {
        let call_ev = expected_value_of_call(win_probability, pot_size, amount_to_call);
        let (raise, raise_ev) = self.ideal_raise(win_probability, pot_size, amount_to_call, num_opponents);

        let decision = if raise > 0 && raise_ev > call_ev && raise_ev > 0.0 {
            Decision {
                action: Action::Raise,
                amount: raise,
            }
        } else if call_ev > 0.0 || (amount_to_call == 0 && win_probability > 0.0) {
            Decision {
                action: Action::Call,
                amount: amount_to_call,
            }
        } else {
            Decision::fold()
        };

        event!(
            tracing::Level::DEBUG,
            win_probability,
            call_ev,
            raise,
            raise_ev,
            action = %decision.action,
            amount = decision.amount,
            "Decided"
        );
        decision
    }
}
