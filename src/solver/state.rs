//! Betting state for a heads-up preflop hand.
//!
//! A [`GameState`] is immutable once built: [`GameState::apply`] returns the
//! successor state, cloning the (short) action log and pushing the new entry.
//! Backtracking during tree traversal therefore never reconstructs previous
//! states — the recursion stack holds them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::PreflopAction;

/// Small blind post, in big blinds.
pub const SMALL_BLIND: f64 = 0.5;

/// Big blind post.
pub const BIG_BLIND: f64 = 1.0;

/// Tolerance for chip-count comparisons.
pub(crate) const EPS: f64 = 1e-9;

/// Blind seat in a heads-up hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    /// Small blind; on the button, first to act preflop.
    SB,
    /// Big blind; first to act postflop, so out of position.
    BB,
}

impl Seat {
    /// The other seat.
    pub fn opponent(&self) -> Seat {
        match self {
            Seat::SB => Seat::BB,
            Seat::BB => Seat::SB,
        }
    }

    /// Blind this seat posts at the start of the hand.
    pub fn blind(&self) -> f64 {
        match self {
            Seat::SB => SMALL_BLIND,
            Seat::BB => BIG_BLIND,
        }
    }

    /// Whether this seat acts first postflop. The equity-realization
    /// multiplier discounts pots won by this seat.
    pub fn is_out_of_position(&self) -> bool {
        matches!(self, Seat::BB)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::SB => write!(f, "SB"),
            Seat::BB => write!(f, "BB"),
        }
    }
}

/// Complete betting state at one node of the preflop tree.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Player index (0 or 1) about to act.
    to_move: usize,
    /// Seat assignment per player.
    seats: [Seat; 2],
    /// Remaining chips per player, in big blinds.
    stacks: [f64; 2],
    /// Total contribution per player, blinds included.
    pot: [f64; 2],
    /// Current wager level: the total the last aggressor is at. Seeded with
    /// the big-blind post, so an opening raise doubles from 1bb.
    last_raise: f64,
    /// Bet/Raise actions taken so far.
    raises_made: u8,
    /// Cap on Bet/Raise actions.
    max_raises: u8,
    /// Append-only action log from the root.
    history: Vec<PreflopAction>,
}

impl GameState {
    /// Root state: blinds posted, empty history, small blind to act.
    pub fn root(stacks: [f64; 2], seats: [Seat; 2], max_raises: u8) -> Self {
        debug_assert_ne!(seats[0], seats[1], "both players in the same seat");
        let blinds = [seats[0].blind(), seats[1].blind()];
        let to_move = if seats[0] == Seat::SB { 0 } else { 1 };
        GameState {
            to_move,
            seats,
            stacks: [stacks[0] - blinds[0], stacks[1] - blinds[1]],
            pot: blinds,
            last_raise: BIG_BLIND,
            raises_made: 0,
            max_raises,
            history: Vec::new(),
        }
    }

    /// Both players' total contributions `(p1, p2)`.
    pub fn total_bets(&self) -> (f64, f64) {
        (self.pot[0], self.pot[1])
    }

    /// One player's total contribution.
    #[inline]
    pub fn contribution(&self, player: usize) -> f64 {
        self.pot[player]
    }

    /// Whether another Bet/Raise is allowed under the cap.
    pub fn can_raise(&self) -> bool {
        self.raises_made < self.max_raises
    }

    /// The current wager level.
    pub fn last_raise(&self) -> f64 {
        self.last_raise
    }

    /// Remaining chips for `player`.
    #[inline]
    pub fn chips_remaining(&self, player: usize) -> f64 {
        self.stacks[player]
    }

    /// Player index about to act.
    #[inline]
    pub fn to_move(&self) -> usize {
        self.to_move
    }

    /// Seat held by `player`.
    pub fn seat_of(&self, player: usize) -> Seat {
        self.seats[player]
    }

    /// The action log from the root.
    pub fn history(&self) -> &[PreflopAction] {
        &self.history
    }

    /// Whether the betting round is over. Empty history is never terminal;
    /// otherwise the closing rule of the last action decides.
    pub fn is_terminal(&self) -> bool {
        match self.history.last() {
            Some(action) => action.closes_round(self),
            None => false,
        }
    }

    /// Successor state after `action`.
    ///
    /// Pure: `self` is untouched. Legality is *not* re-checked here — this
    /// is the hot path, and callers filter with `is_legal` first. Applying
    /// an illegal action yields an undefined result.
    pub fn apply(&self, action: PreflopAction) -> GameState {
        let mut next = self.clone();
        let amount = action.bet_amount(self);
        let mover = self.to_move;

        next.stacks[mover] -= amount;
        next.pot[mover] += amount;
        if action.is_aggressive() {
            next.last_raise = next.pot[mover];
        }
        if action.counts_toward_cap() {
            next.raises_made += 1;
        }
        next.to_move = 1 - mover;
        next.history.push(action);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn root_100bb() -> GameState {
        GameState::root([100.0, 100.0], [Seat::SB, Seat::BB], 4)
    }

    fn full_catalog() -> Vec<PreflopAction> {
        vec![
            PreflopAction::Fold,
            PreflopAction::Check,
            PreflopAction::Call,
            PreflopAction::Raise(200),
            PreflopAction::Raise(300),
            PreflopAction::AllIn,
        ]
    }

    #[test]
    fn test_root_posts_blinds() {
        let state = root_100bb();
        assert_eq!(state.total_bets(), (0.5, 1.0));
        assert!((state.chips_remaining(0) - 99.5).abs() < 1e-9);
        assert!((state.chips_remaining(1) - 99.0).abs() < 1e-9);
        assert_eq!(state.to_move(), 0);
        assert!((state.last_raise() - 1.0).abs() < 1e-9);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_seats_decide_first_mover() {
        let flipped = GameState::root([100.0, 100.0], [Seat::BB, Seat::SB], 4);
        assert_eq!(flipped.to_move(), 1);
        assert_eq!(flipped.total_bets(), (1.0, 0.5));
    }

    #[test]
    fn test_mover_alternates() {
        let state = root_100bb();
        let after_one = state.apply(PreflopAction::Raise(200));
        assert_eq!(after_one.to_move(), 1);
        let after_two = after_one.apply(PreflopAction::Raise(200));
        assert_eq!(after_two.to_move(), 0);
    }

    #[test]
    fn test_raise_ladder_doubles_the_level() {
        // 1 -> 2 -> 4 -> 8, both players at 8bb after the closing call.
        let mut state = root_100bb();
        for _ in 0..3 {
            state = state.apply(PreflopAction::Raise(200));
        }
        assert!((state.last_raise() - 8.0).abs() < 1e-9);
        assert_eq!(state.history().len(), 3);

        let closed = state.apply(PreflopAction::Call);
        let (c1, c2) = closed.total_bets();
        assert!((c1 - 8.0).abs() < 1e-9);
        assert!((c2 - 8.0).abs() < 1e-9);
        assert!(closed.is_terminal());
    }

    #[test]
    fn test_raise_cap_enforced() {
        let mut state = GameState::root([1000.0, 1000.0], [Seat::SB, Seat::BB], 4);
        for _ in 0..4 {
            assert!(PreflopAction::Raise(200).is_legal(&state));
            state = state.apply(PreflopAction::Raise(200));
        }
        assert!(!state.can_raise());
        assert!(!PreflopAction::Raise(200).is_legal(&state));
        // Past the cap the only aggression left is the shove.
        assert!(PreflopAction::AllIn.is_legal(&state));
    }

    #[test]
    fn test_limp_is_not_terminal_but_check_behind_is() {
        let limped = root_100bb().apply(PreflopAction::Call);
        assert!(!limped.is_terminal());
        assert_eq!(limped.to_move(), 1);

        let checked = limped.apply(PreflopAction::Check);
        assert!(checked.is_terminal());
    }

    #[test]
    fn test_fold_is_terminal() {
        let folded = root_100bb().apply(PreflopAction::Fold);
        assert!(folded.is_terminal());
    }

    #[test]
    fn test_contributions_monotone_on_random_playouts() {
        let catalog = full_catalog();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let mut state = root_100bb();
            let (mut prev1, mut prev2) = state.total_bets();
            let mut depth = 0;

            while !state.is_terminal() {
                let legal: Vec<PreflopAction> = catalog
                    .iter()
                    .copied()
                    .filter(|a| a.is_legal(&state))
                    .collect();
                assert!(!legal.is_empty(), "no legal action at {:?}", state);

                let mover_before = state.to_move();
                state = state.apply(legal[rng.gen_range(0..legal.len())]);
                assert_eq!(state.to_move(), 1 - mover_before);

                let (c1, c2) = state.total_bets();
                assert!(c1 + EPS >= prev1, "p1 contribution decreased");
                assert!(c2 + EPS >= prev2, "p2 contribution decreased");
                prev1 = c1;
                prev2 = c2;

                depth += 1;
                assert!(depth <= 12, "playout failed to terminate");
            }

            // stack + contribution stays at the starting depth
            assert!((state.chips_remaining(0) + state.contribution(0) - 100.0).abs() < 1e-6);
            assert!((state.chips_remaining(1) + state.contribution(1) - 100.0).abs() < 1e-6);
        }
    }
}
