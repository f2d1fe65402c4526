//! Canonical starting-hand classes.
//!
//! There are 169 strategically distinct preflop holdings:
//! 13 pairs, 78 suited and 78 offsuit combinations. Indices are laid out as
//! pairs 0-12, suited 13-90, offsuit 91-168.

use std::fmt;

use crate::cards::{Card, RANK_CHARS};

/// One of the 169 canonical two-card starting hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandClass {
    /// Higher rank index.
    rank1: u8,
    /// Lower (or equal) rank index.
    rank2: u8,
    suited: bool,
}

impl HandClass {
    /// Classify two hole cards.
    pub fn from_cards(a: Card, b: Card) -> Self {
        let (hi, lo) = if a.rank() >= b.rank() { (a, b) } else { (b, a) };
        Self {
            rank1: hi.rank(),
            rank2: lo.rank(),
            suited: hi.rank() != lo.rank() && hi.suit() == lo.suit(),
        }
    }

    /// Build a class directly from rank indices (`rank1 >= rank2`).
    pub fn from_ranks(rank1: u8, rank2: u8, suited: bool) -> Self {
        debug_assert!(rank1 >= rank2);
        debug_assert!(!(suited && rank1 == rank2), "pairs cannot be suited");
        Self {
            rank1,
            rank2,
            suited,
        }
    }

    /// Rebuild a class from its index (0-168).
    pub fn from_index(index: u8) -> Self {
        debug_assert!(index < 169);
        if index < 13 {
            Self {
                rank1: index,
                rank2: index,
                suited: false,
            }
        } else if index < 91 {
            let (rank1, rank2) = decode_triangular(index - 13);
            Self {
                rank1,
                rank2,
                suited: true,
            }
        } else {
            let (rank1, rank2) = decode_triangular(index - 91);
            Self {
                rank1,
                rank2,
                suited: false,
            }
        }
    }

    /// The class index (0-168).
    pub fn index(&self) -> u8 {
        if self.rank1 == self.rank2 {
            self.rank1
        } else if self.suited {
            13 + encode_triangular(self.rank1, self.rank2)
        } else {
            91 + encode_triangular(self.rank1, self.rank2)
        }
    }

    /// Combinations this class covers in a full deck.
    pub fn num_combos(&self) -> u8 {
        if self.rank1 == self.rank2 {
            6
        } else if self.suited {
            4
        } else {
            12
        }
    }

    /// Iterate all 169 classes in index order.
    pub fn all() -> impl Iterator<Item = HandClass> {
        (0..169u8).map(HandClass::from_index)
    }
}

impl fmt::Display for HandClass {
    /// Standard label, e.g. `AA`, `AKs`, `72o`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            RANK_CHARS[self.rank1 as usize],
            RANK_CHARS[self.rank2 as usize]
        )?;
        if self.rank1 != self.rank2 {
            write!(f, "{}", if self.suited { 's' } else { 'o' })?;
        }
        Ok(())
    }
}

/// Encode two ranks (r1 > r2) into a triangular index.
fn encode_triangular(r1: u8, r2: u8) -> u8 {
    debug_assert!(r1 > r2);
    r1 * (r1 - 1) / 2 + r2
}

/// Invert [`encode_triangular`].
fn decode_triangular(idx: u8) -> (u8, u8) {
    let mut r1 = 1u8;
    let mut remaining = idx;
    while remaining >= r1 {
        remaining -= r1;
        r1 += 1;
    }
    (r1, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn class(a: &str, b: &str) -> HandClass {
        HandClass::from_cards(Card::from_str(a).unwrap(), Card::from_str(b).unwrap())
    }

    #[test]
    fn test_labels() {
        assert_eq!(class("As", "Ah").to_string(), "AA");
        assert_eq!(class("As", "Ks").to_string(), "AKs");
        assert_eq!(class("Ks", "Ah").to_string(), "AKo");
        assert_eq!(class("2d", "7h").to_string(), "72o");
        assert_eq!(class("2c", "2d").to_string(), "22");
    }

    #[test]
    fn test_pair_indices() {
        assert_eq!(class("2c", "2d").index(), 0);
        assert_eq!(class("As", "Ah").index(), 12);
    }

    #[test]
    fn test_index_roundtrip_covers_all_169() {
        let mut seen = HashSet::new();
        for hc in HandClass::all() {
            assert_eq!(HandClass::from_index(hc.index()), hc);
            seen.insert(hc.index());
        }
        assert_eq!(seen.len(), 169);
    }

    #[test]
    fn test_card_order_does_not_matter() {
        assert_eq!(class("As", "Ks"), class("Ks", "As"));
        assert_eq!(class("7h", "2d"), class("2d", "7h"));
    }

    #[test]
    fn test_combo_counts() {
        assert_eq!(class("As", "Ah").num_combos(), 6);
        assert_eq!(class("As", "Ks").num_combos(), 4);
        assert_eq!(class("As", "Kh").num_combos(), 12);

        let total: u32 = HandClass::all().map(|hc| hc.num_combos() as u32).sum();
        assert_eq!(total, 1326);
    }
}
