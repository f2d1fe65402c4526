//! Preflop betting actions.
//!
//! The action set is closed — heads-up preflop play admits exactly these six
//! behaviors — so actions are a plain enum matched exhaustively. Sizing
//! parameters are stored in centi units (`Bet(100)` = a full-pot bet,
//! `Raise(250)` = 2.5x the current wager level) so that structurally
//! identical actions are `Eq` and hash identically anywhere in the tree.
//!
//! Legality and sizing read the state *before* the action; whether an action
//! closes the betting round is asked of the state that already contains it
//! (see [`GameState::is_terminal`]). `GameState::apply` never re-checks
//! legality — callers test [`PreflopAction::is_legal`] first, and applying an
//! illegal action is undefined.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{GameState, EPS};

/// A single preflop betting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreflopAction {
    /// Surrender the hand and everything contributed so far.
    Fold,
    /// Pass the action with no outstanding bet.
    Check,
    /// Match the outstanding bet.
    Call,
    /// Wager a fraction of the current pot, in centi-pot units.
    Bet(u32),
    /// Multiply the current wager level, in centi units (must exceed 100).
    Raise(u32),
    /// Commit the effective remaining stack.
    AllIn,
}

impl PreflopAction {
    /// Pot-fraction bet; `fraction` must be positive.
    pub fn bet(fraction: f64) -> Result<Self, ActionError> {
        if fraction <= 0.0 || !fraction.is_finite() {
            return Err(ActionError::BetFraction(fraction));
        }
        Ok(PreflopAction::Bet(to_centi(fraction)))
    }

    /// Level-multiplier raise; `multiplier` must exceed 1.
    pub fn raise(multiplier: f64) -> Result<Self, ActionError> {
        if multiplier <= 1.0 || !multiplier.is_finite() {
            return Err(ActionError::RaiseMultiplier(multiplier));
        }
        Ok(PreflopAction::Raise(to_centi(multiplier)))
    }

    /// Raise-type actions move the wager level.
    pub fn is_aggressive(&self) -> bool {
        matches!(
            self,
            PreflopAction::Bet(_) | PreflopAction::Raise(_) | PreflopAction::AllIn
        )
    }

    /// Only Bet and Raise count against the raise cap; AllIn is the escape
    /// hatch once the cap is reached or proportional raising stops fitting.
    pub fn counts_toward_cap(&self) -> bool {
        matches!(self, PreflopAction::Bet(_) | PreflopAction::Raise(_))
    }

    /// Whether this action may be played on `state`.
    pub fn is_legal(&self, state: &GameState) -> bool {
        let (c1, c2) = state.total_bets();
        let outstanding = (c1 - c2).abs() > EPS;

        match *self {
            PreflopAction::Fold => outstanding,
            PreflopAction::Check => !outstanding,
            PreflopAction::Call => outstanding,
            PreflopAction::Bet(_) => {
                let amount = self.bet_amount(state);
                state.can_raise()
                    && amount + EPS >= 2.0 * state.last_raise()
                    && amount <= state.chips_remaining(state.to_move()) + EPS
            }
            PreflopAction::Raise(centi) => {
                let target = from_centi(centi) * state.last_raise();
                state.can_raise()
                    && state.last_raise() > 0.0
                    && target <= state.chips_remaining(0) + EPS
                    && target <= state.chips_remaining(1) + EPS
            }
            PreflopAction::AllIn => {
                let effective = state.chips_remaining(0).min(state.chips_remaining(1));
                let min_raise_fits = state.can_raise()
                    && 2.0 * state.last_raise() <= effective + EPS;
                // Facing a shove the options are call or fold.
                let facing_shove = matches!(state.history().last(), Some(PreflopAction::AllIn));
                !min_raise_fits && !facing_shove && effective > EPS
            }
        }
    }

    /// Chips this action adds to the mover's contribution, given the state
    /// before the action.
    pub fn bet_amount(&self, state: &GameState) -> f64 {
        let (c1, c2) = state.total_bets();
        match *self {
            PreflopAction::Fold | PreflopAction::Check => 0.0,
            PreflopAction::Call => (c1 - c2).abs(),
            PreflopAction::Bet(centi) => (c1 + c2) * from_centi(centi),
            PreflopAction::Raise(centi) => {
                // Raise moves the wager level to m x the previous level; the
                // mover pays the difference from what they already have in
                // (for the opening raise, that is the posted blind).
                from_centi(centi) * state.last_raise() - state.contribution(state.to_move())
            }
            PreflopAction::AllIn => state.chips_remaining(0).min(state.chips_remaining(1)),
        }
    }

    /// Whether this action ends the betting round. `state_after` is the
    /// state with this action already applied as the last history entry.
    pub fn closes_round(&self, state_after: &GameState) -> bool {
        match *self {
            PreflopAction::Fold | PreflopAction::Check => true,
            // The small blind completing the blind does not close the round:
            // the big blind keeps the option to check or raise.
            PreflopAction::Call => state_after.history().len() > 1,
            PreflopAction::Bet(_) | PreflopAction::Raise(_) | PreflopAction::AllIn => false,
        }
    }

    /// Structural hash: action kind mixed with its sizing parameter, so the
    /// same move hashes identically on every branch.
    pub fn hash_code(&self) -> u64 {
        let (tag, param) = match *self {
            PreflopAction::Fold => (0u64, 0u64),
            PreflopAction::Check => (1, 0),
            PreflopAction::Call => (2, 0),
            PreflopAction::Bet(c) => (3, c as u64),
            PreflopAction::Raise(c) => (4, c as u64),
            PreflopAction::AllIn => (5, 0),
        };
        hash_combine(tag, param)
    }

    /// Short code for info-set keys and range tables.
    pub fn short_code(&self) -> String {
        match *self {
            PreflopAction::Fold => "F".to_string(),
            PreflopAction::Check => "X".to_string(),
            PreflopAction::Call => "C".to_string(),
            PreflopAction::Bet(c) => format!("B{}", c),
            PreflopAction::Raise(c) => format!("R{}", c),
            PreflopAction::AllIn => "A".to_string(),
        }
    }
}

impl fmt::Display for PreflopAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PreflopAction::Fold => write!(f, "Fold"),
            PreflopAction::Check => write!(f, "Check"),
            PreflopAction::Call => write!(f, "Call"),
            PreflopAction::Bet(c) => write!(f, "Bet {:.0}% pot", from_centi(c) * 100.0),
            PreflopAction::Raise(c) => write!(f, "Raise {:.1}x", from_centi(c)),
            PreflopAction::AllIn => write!(f, "All-In"),
        }
    }
}

/// Error for invalid action parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    /// Bet fraction was not a positive finite number.
    BetFraction(f64),
    /// Raise multiplier must be a finite number greater than 1.
    RaiseMultiplier(f64),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::BetFraction(v) => {
                write!(f, "bet fraction {} must be positive", v)
            }
            ActionError::RaiseMultiplier(v) => {
                write!(f, "raise multiplier {} must be greater than 1", v)
            }
        }
    }
}

impl std::error::Error for ActionError {}

/// Convert a sizing value to centi units.
#[inline]
pub fn to_centi(value: f64) -> u32 {
    (value * 100.0).round() as u32
}

/// Convert centi units back to a sizing value.
#[inline]
pub fn from_centi(centi: u32) -> f64 {
    centi as f64 / 100.0
}

/// Boost-style 64-bit mix, shared by action and info-set hashing.
pub(crate) fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ value
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}
