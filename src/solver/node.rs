//! Per-information-set regret accumulator and terminal payoffs.
//!
//! Each [`Node`] tracks cumulative regret per action and cumulative strategy
//! weight; the time-averaged strategy over all iterations is what converges
//! toward Nash equilibrium. Regrets accumulate unclamped (vanilla CFR) —
//! regret matching takes the positive part when it builds the strategy.

use crate::cards::Card;
use crate::eval::Evaluator;
use crate::hand::HandClass;
use crate::solver::action::PreflopAction;
use crate::solver::state::GameState;

/// Deck slots used by every deal: two hole cards per player, then the board.
pub const HOLE_SLOTS: [[usize; 2]; 2] = [[0, 1], [2, 3]];

/// Board occupies the five slots after the hole cards.
pub const BOARD_SLOTS: std::ops::Range<usize> = 4..9;

/// One information set's accumulated training state.
#[derive(Debug, Clone)]
pub struct Node {
    /// Player who acts at this information set.
    player: usize,
    /// Canonical class of the player's hole cards.
    class: HandClass,
    /// Number of actions taken before this decision.
    depth: usize,
    /// Legal actions, fixed at creation; all vectors index against this.
    actions: Vec<PreflopAction>,
    regret_sum: Vec<f64>,
    strategy: Vec<f64>,
    strategy_sum: Vec<f64>,
}

impl Node {
    /// Build a node for `state`, filtering `catalog` to the legal actions.
    pub fn new(state: &GameState, class: HandClass, catalog: &[PreflopAction]) -> Self {
        let actions: Vec<PreflopAction> = catalog
            .iter()
            .copied()
            .filter(|a| a.is_legal(state))
            .collect();
        let n = actions.len();
        debug_assert!(n > 0, "non-terminal state with no legal actions");

        Node {
            player: state.to_move(),
            class,
            depth: state.history().len(),
            regret_sum: vec![0.0; n],
            strategy: vec![1.0 / n as f64; n],
            strategy_sum: vec![0.0; n],
            actions,
        }
    }

    /// Legal actions at this information set.
    pub fn actions(&self) -> &[PreflopAction] {
        &self.actions
    }

    /// Player who acts here.
    pub fn player(&self) -> usize {
        self.player
    }

    /// Canonical hand class of the actor's hole cards.
    pub fn hand_class(&self) -> HandClass {
        self.class
    }

    /// Actions taken before this decision point.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Raw cumulative strategy weights (for range aggregation).
    pub fn strategy_sum(&self) -> &[f64] {
        &self.strategy_sum
    }

    /// Regret-matching step: rebuild the current strategy from positive
    /// regrets (uniform when none are positive), accumulate it into the
    /// strategy sum weighted by `reach_probability`, and return it.
    pub fn update_strategy(&mut self, reach_probability: f64) -> Vec<f64> {
        let n = self.actions.len();
        let mut norm = 0.0;
        for a in 0..n {
            self.strategy[a] = self.regret_sum[a].max(0.0);
            norm += self.strategy[a];
        }
        for a in 0..n {
            if norm > 0.0 {
                self.strategy[a] /= norm;
            } else {
                self.strategy[a] = 1.0 / n as f64;
            }
            self.strategy_sum[a] += reach_probability * self.strategy[a];
        }
        self.strategy.clone()
    }

    /// Accumulate counterfactual regret for one action, unclamped.
    pub fn update_regret(&mut self, action_index: usize, value: f64) {
        self.regret_sum[action_index] += value;
    }

    /// The time-averaged strategy — the equilibrium approximation. Falls
    /// back to uniform for never-visited nodes; never NaN, always sums to 1.
    pub fn average_strategy(&self) -> Vec<f64> {
        let n = self.actions.len();
        let norm: f64 = self.strategy_sum.iter().sum();
        if norm > 0.0 {
            self.strategy_sum.iter().map(|&s| s / norm).collect()
        } else {
            vec![1.0 / n as f64; n]
        }
    }
}

/// Payoff of a terminal state, from the perspective of the player to move
/// there (the one who did *not* take the closing action).
///
/// A fold awards the folder's contribution to the survivor. Showdowns deal
/// both holes and the board from the deck's fixed slots, rank each player's
/// best five of seven, and transfer the loser's contribution; exact ties pay
/// nothing. Either way the transfer is discounted by `equity_multiplier`
/// when the winner sits out of position.
pub fn terminal_utility(
    state: &GameState,
    deck: &[Card],
    evaluator: &Evaluator,
    equity_multiplier: f64,
) -> f64 {
    debug_assert!(state.is_terminal(), "utility of a non-terminal state");

    let hero = state.to_move();
    let villain = 1 - hero;
    let last = state
        .history()
        .last()
        .expect("terminal state has at least one action");

    let discount = |winner: usize| -> f64 {
        if state.seat_of(winner).is_out_of_position() {
            equity_multiplier
        } else {
            1.0
        }
    };

    if matches!(last, PreflopAction::Fold) {
        // The player to move at a fold is always the survivor.
        return state.contribution(villain) * discount(hero);
    }

    let rank_of = |player: usize| -> u16 {
        let holes = HOLE_SLOTS[player];
        let mut cards = [deck[holes[0]]; 7];
        cards[1] = deck[holes[1]];
        for (i, slot) in BOARD_SLOTS.enumerate() {
            cards[2 + i] = deck[slot];
        }
        evaluator.best_hand(&cards)
    };

    let hero_rank = rank_of(hero);
    let villain_rank = rank_of(villain);

    if hero_rank < villain_rank {
        state.contribution(villain) * discount(hero)
    } else if hero_rank > villain_rank {
        -state.contribution(hero) * discount(villain)
    } else {
        0.0
    }
}
