//! The solved output: per-hand action frequencies.
//!
//! A [`Range`] maps each of the 169 canonical starting hands to the
//! frequencies the solution plays each action, summing to 1 per hand.
//! Frequencies are keyed by action short code so the table serializes
//! directly; persistence beyond [`Range::save_json`] is the caller's
//! business.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::hand::HandClass;
use crate::solver::action::PreflopAction;
use crate::solver::state::Seat;

/// Action frequencies for one player's first decision, per canonical hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Range {
    /// Player index this range belongs to.
    pub player: usize,
    /// That player's blind seat.
    pub seat: Seat,
    /// Hand label -> (action short code -> frequency).
    hands: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Range {
    /// Empty range for a player.
    pub fn new(player: usize, seat: Seat) -> Self {
        Self {
            player,
            seat,
            hands: BTreeMap::new(),
        }
    }

    /// Record one hand/action frequency.
    pub fn set(&mut self, class: HandClass, action: PreflopAction, frequency: f64) {
        self.hands
            .entry(class.to_string())
            .or_default()
            .insert(action.short_code(), frequency);
    }

    /// Frequency at which `hand` (e.g. `"AKs"`) plays `action`, or `None`
    /// if the hand is unknown or the action is not part of its decision.
    pub fn get(&self, hand: &str, action: &PreflopAction) -> Option<f64> {
        self.hands.get(hand)?.get(&action.short_code()).copied()
    }

    /// The full frequency map for one hand.
    pub fn frequencies(&self, hand: &str) -> Option<&BTreeMap<String, f64>> {
        self.hands.get(hand)
    }

    /// Iterate `(label, frequencies)` in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, f64>)> {
        self.hands.iter()
    }

    /// Number of hands recorded (169 for a trained solver).
    pub fn len(&self) -> usize {
        self.hands.len()
    }

    /// Whether any hand has been recorded.
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the range as JSON to `path`.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }

    /// 13x13 text chart of one action's frequency, pairs on the diagonal,
    /// suited hands above it, offsuit below. Cells are percentages.
    pub fn chart(&self, action: &PreflopAction) -> String {
        use crate::cards::RANK_CHARS;

        let mut out = String::new();
        out.push_str(&format!("{} frequency ({})\n", action, self.seat));
        out.push_str("     ");
        for col in (0..13).rev() {
            out.push_str(&format!("{:>5}", RANK_CHARS[col]));
        }
        out.push('\n');

        for row in (0..13usize).rev() {
            out.push_str(&format!("{:>4} ", RANK_CHARS[row]));
            for col in (0..13usize).rev() {
                let class = if row == col {
                    HandClass::from_ranks(row as u8, col as u8, false)
                } else if row > col {
                    // Above the diagonal: suited, higher rank on the row.
                    HandClass::from_ranks(row as u8, col as u8, true)
                } else {
                    HandClass::from_ranks(col as u8, row as u8, false)
                };
                let freq = self
                    .get(&class.to_string(), action)
                    .unwrap_or(0.0);
                out.push_str(&format!("{:>5.0}", freq * 100.0));
            }
            out.push('\n');
        }
        out
    }
}
