//! # Preflop Solver
//!
//! A GTO preflop solver for heads-up No-Limit Hold'em, built on
//! Counterfactual Regret Minimization (CFR).
//!
//! ## Quick start
//!
//! ```no_run
//! use preflop_solver::{PreflopSolver, SolverConfig};
//!
//! let config = SolverConfig::default().with_seed(42);
//! let mut solver = PreflopSolver::new(config).unwrap();
//!
//! solver.train(1_000_000);
//!
//! // The small blind's opening chart, one entry per canonical hand.
//! let range = solver.range(0);
//! println!("{}", range.to_json().unwrap());
//! ```
//!
//! ## How it works
//!
//! Each training iteration shuffles a deck, deals both holes and a board
//! from fixed positions, and walks the betting tree once. At every decision
//! the solver regret-matches a strategy from accumulated regrets, recurses
//! through each legal action, and feeds the counterfactual regret back into
//! the acting player's information set. The *average* strategy over all
//! iterations converges toward a Nash equilibrium; [`PreflopSolver::range`]
//! reports it per canonical starting hand.
//!
//! Boards are dealt but never bet on: postflop play is modeled by a single
//! equity-realization multiplier that discounts pots won by the
//! out-of-position seat.
//!
//! ## Modules
//!
//! - [`cards`]: packed card representation, parsing, deck utilities
//! - [`eval`]: perfect-hash 5- and 7-card hand ranking (1..=7462)
//! - [`hand`]: the 169 canonical starting-hand classes
//! - [`solver`]: the CFR engine — state machine, nodes, training, ranges

#![warn(missing_docs)]

pub mod cards;
pub mod eval;
pub mod hand;
pub mod solver;

pub use cards::{make_deck, parse_cards, Card, CardParseError};
pub use eval::Evaluator;
pub use hand::HandClass;
pub use solver::{
    GameState, PreflopAction, PreflopSolver, Range, Seat, SolverConfig, TrainingStats,
};
