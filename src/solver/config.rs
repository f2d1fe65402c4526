//! Solver configuration.
//!
//! Everything is fixed at construction time: stack depths, seat assignments,
//! the raise cap, the equity-realization discount, and one action catalog
//! per player (the seats may use different menus). There is no CLI surface
//! here — binaries build a config and hand it to the solver.

use serde::{Deserialize, Serialize};

use super::action::{ActionError, PreflopAction};
use super::state::{GameState, Seat};

/// Construction-time parameters for a [`PreflopSolver`].
///
/// [`PreflopSolver`]: super::solver::PreflopSolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Starting stack depth per player, in big blinds.
    pub stacks: [f64; 2],

    /// Blind seat per player.
    pub seats: [Seat; 2],

    /// Maximum number of Bet/Raise actions in a hand. With a cap of 4, a
    /// 4-bet cannot be 5-bet over the top.
    pub max_raises: u8,

    /// Fraction of equity the out-of-position seat realizes, in (0, 1].
    pub equity_multiplier: f64,

    /// Permitted actions per player; the two menus may differ.
    pub catalogs: [Vec<PreflopAction>; 2],

    /// Seed for the training RNG; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            stacks: [100.0, 100.0],
            seats: [Seat::SB, Seat::BB],
            max_raises: 4,
            equity_multiplier: 0.7,
            catalogs: [default_catalog(), default_catalog()],
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Symmetric game: both players at `stack_depth` with the same menu.
    pub fn symmetric(stack_depth: f64, catalog: Vec<PreflopAction>) -> Self {
        Self {
            stacks: [stack_depth, stack_depth],
            catalogs: [catalog.clone(), catalog],
            ..Default::default()
        }
    }

    /// Builder method: set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set both stack depths.
    pub fn with_stacks(mut self, p1: f64, p2: f64) -> Self {
        self.stacks = [p1, p2];
        self
    }

    /// Builder method: set the raise cap.
    pub fn with_max_raises(mut self, max_raises: u8) -> Self {
        self.max_raises = max_raises;
        self
    }

    /// Builder method: set the equity-realization multiplier.
    pub fn with_equity_multiplier(mut self, multiplier: f64) -> Self {
        self.equity_multiplier = multiplier;
        self
    }

    /// Player index that opens the betting (the small blind).
    pub fn first_to_act(&self) -> usize {
        if self.seats[0] == Seat::SB {
            0
        } else {
            1
        }
    }

    /// Action menu for `player`.
    pub fn catalog(&self, player: usize) -> &[PreflopAction] {
        &self.catalogs[player]
    }

    /// Root state for this configuration: blinds posted, empty history.
    pub fn root_state(&self) -> GameState {
        GameState::root(self.stacks, self.seats, self.max_raises)
    }

    /// Check every parameter; returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats[0] == self.seats[1] {
            return Err(ConfigError::DuplicateSeats(self.seats[0]));
        }
        if !(self.equity_multiplier > 0.0 && self.equity_multiplier <= 1.0) {
            return Err(ConfigError::EquityMultiplier(self.equity_multiplier));
        }
        for player in 0..2 {
            let blind = self.seats[player].blind();
            if !(self.stacks[player] >= blind && self.stacks[player].is_finite()) {
                return Err(ConfigError::StackDepth(player, self.stacks[player]));
            }
            if self.catalogs[player].is_empty() {
                return Err(ConfigError::EmptyCatalog(player));
            }
            for action in &self.catalogs[player] {
                validate_action(action).map_err(|e| ConfigError::Action(player, e))?;
            }
        }
        Ok(())
    }
}

/// The original menu: no pot-fraction bets, 2x/3x raises, and the shove.
pub fn default_catalog() -> Vec<PreflopAction> {
    vec![
        PreflopAction::Fold,
        PreflopAction::Check,
        PreflopAction::Call,
        PreflopAction::Raise(200),
        PreflopAction::Raise(300),
        PreflopAction::AllIn,
    ]
}

/// Reject catalog entries whose parameters the smart constructors would
/// refuse (enum variants are freely constructible).
fn validate_action(action: &PreflopAction) -> Result<(), ActionError> {
    match *action {
        PreflopAction::Raise(centi) if centi <= 100 => {
            Err(ActionError::RaiseMultiplier(centi as f64 / 100.0))
        }
        PreflopAction::Bet(0) => Err(ActionError::BetFraction(0.0)),
        _ => Ok(()),
    }
}

/// Errors from [`SolverConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Both players were assigned the same seat.
    DuplicateSeats(Seat),
    /// Equity multiplier outside (0, 1].
    EquityMultiplier(f64),
    /// A stack too small to post its blind (player, stack).
    StackDepth(usize, f64),
    /// A player has no actions at all.
    EmptyCatalog(usize),
    /// A catalog entry with an invalid parameter.
    Action(usize, ActionError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::DuplicateSeats(seat) => {
                write!(f, "both players assigned to the {} seat", seat)
            }
            ConfigError::EquityMultiplier(v) => {
                write!(f, "equity multiplier {} must be in (0, 1]", v)
            }
            ConfigError::StackDepth(player, v) => {
                write!(f, "player {} stack {}bb cannot post its blind", player + 1, v)
            }
            ConfigError::EmptyCatalog(player) => {
                write!(f, "player {} has an empty action catalog", player + 1)
            }
            ConfigError::Action(player, err) => {
                write!(f, "player {} catalog: {}", player + 1, err)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Action(_, err) => Some(err),
            _ => None,
        }
    }
}

/// Counters reported back from a training run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Iterations completed over the solver's lifetime.
    pub iterations: u64,
    /// Information sets discovered so far.
    pub nodes: usize,
    /// Wall-clock seconds spent in the last `train` call.
    pub elapsed_seconds: f64,
    /// Training speed of the last `train` call.
    pub iterations_per_second: f64,
}

impl TrainingStats {
    pub(crate) fn update_rate(&mut self, iterations: u64) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = iterations as f64 / self.elapsed_seconds;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_duplicate_seats_rejected() {
        let config = SolverConfig {
            seats: [Seat::SB, Seat::SB],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DuplicateSeats(Seat::SB)));
    }

    #[test]
    fn test_equity_multiplier_range() {
        let config = SolverConfig::default().with_equity_multiplier(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EquityMultiplier(_))
        ));
        let config = SolverConfig::default().with_equity_multiplier(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EquityMultiplier(_))
        ));
        assert!(SolverConfig::default()
            .with_equity_multiplier(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_short_stack_rejected() {
        let config = SolverConfig::default().with_stacks(100.0, 0.25);
        assert!(matches!(config.validate(), Err(ConfigError::StackDepth(1, _))));
    }

    #[test]
    fn test_bad_catalog_entry_rejected() {
        let mut config = SolverConfig::default();
        config.catalogs[1].push(PreflopAction::Raise(100));
        assert!(matches!(config.validate(), Err(ConfigError::Action(1, _))));
    }

    #[test]
    fn test_first_to_act_follows_seats() {
        assert_eq!(SolverConfig::default().first_to_act(), 0);
        let flipped = SolverConfig {
            seats: [Seat::BB, Seat::SB],
            ..Default::default()
        };
        assert_eq!(flipped.first_to_act(), 1);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = SolverConfig::default().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, Some(7));
        assert_eq!(back.catalogs[0], config.catalogs[0]);
        assert_eq!(back.max_raises, 4);
    }
}
