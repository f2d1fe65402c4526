//! Five- and seven-card hand evaluation.
//!
//! Every distinct five-card poker hand maps to a rank in 1..=7462, ordered
//! by decreasing strength (1 = royal flush, 7462 = 7-5-4-3-2 offsuit):
//!
//! ```text
//! +-----------------+-------+------+-------+
//! |      Hand       | First | Last | Total |
//! +-----------------+-------+------+-------+
//! | Straight Flush  |     1 |   10 |    10 |
//! | Four of a Kind  |    11 |  166 |   156 |
//! | Full House      |   167 |  322 |   156 |
//! | Flush           |   323 | 1599 |  1277 |
//! | Straight        |  1600 | 1609 |    10 |
//! | Three of a Kind |  1610 | 2467 |   858 |
//! | Two Pair        |  2468 | 3325 |   858 |
//! | Pair            |  3326 | 6185 |  2860 |
//! | High Card       |  6186 | 7462 |  1277 |
//! +-----------------+-------+------+-------+
//! ```
//!
//! Flushes and rank-distinct hands resolve through two tables indexed by the
//! 13-bit rank mask; everything else resolves through the product of the
//! cards' rank primes, which is collision-free over the 4888 remaining
//! multisets.

use rustc_hash::FxHashMap;

use crate::cards::{Card, PRIMES, SUIT_MASK};

/// Rank tables are indexed by 13-bit rank masks; the largest mask is
/// AKQJT = 0b1111100000000 = 7936.
const TABLE_SIZE: usize = 7937;

/// A-5-4-3-2, the only 5-high straight mask.
const WHEEL_MASK: u32 = 0b1_0000_0000_1111;

/// Perfect-hash hand evaluator.
///
/// The lookup tables are built once at construction and never change; build
/// a single `Evaluator` at startup and pass it by reference.
pub struct Evaluator {
    /// Rank for five cards of one suit, indexed by rank mask.
    flushes: Vec<u16>,
    /// Rank for five distinct off-suit ranks (straights and high cards).
    uniques: Vec<u16>,
    /// Rank for every paired hand, keyed by rank-prime product.
    prime_products: FxHashMap<u32, u16>,
}

impl Evaluator {
    /// Build the tables; a few milliseconds, once per process.
    pub fn new() -> Self {
        let mut eval = Evaluator {
            flushes: vec![0; TABLE_SIZE],
            uniques: vec![0; TABLE_SIZE],
            prime_products: FxHashMap::default(),
        };
        eval.build_mask_tables();
        eval.build_prime_table();
        eval
    }

    /// Rank a five-card hand; lower is stronger. Invariant under any
    /// reordering of the input.
    pub fn evaluate_hand(&self, cards: &[Card; 5]) -> u16 {
        let suit = cards
            .iter()
            .fold(SUIT_MASK, |acc, c| acc & c.bits());
        let mask = (cards.iter().fold(0, |acc, c| acc | c.bits()) >> 16) as usize;

        if suit != 0 {
            return self.flushes[mask];
        }
        if self.uniques[mask] != 0 {
            return self.uniques[mask];
        }

        let product: u32 = cards.iter().map(|c| c.prime()).product();
        *self
            .prime_products
            .get(&product)
            .expect("every five-card prime product is in the table")
    }

    /// Best rank over all 21 five-card subsets of seven cards.
    pub fn best_hand(&self, cards: &[Card; 7]) -> u16 {
        let mut best = u16::MAX;
        for skip_a in 0..6 {
            for skip_b in (skip_a + 1)..7 {
                let mut hand = [cards[0]; 5];
                let mut n = 0;
                for (i, &card) in cards.iter().enumerate() {
                    if i != skip_a && i != skip_b {
                        hand[n] = card;
                        n += 1;
                    }
                }
                best = best.min(self.evaluate_hand(&hand));
            }
        }
        best
    }

    /// Fill the flush and straight/high-card tables over all 5-bit rank
    /// masks, walking from the strongest mask down.
    fn build_mask_tables(&mut self) {
        let mut straight = 1u16;
        let mut scattered = 1u16;

        for mask in (31..=7936u32).rev() {
            if mask.count_ones() != 5 {
                continue;
            }
            let span = 32 - mask.leading_zeros() - mask.trailing_zeros();
            if span == 5 {
                // Five contiguous ranks.
                self.flushes[mask as usize] = straight;
                self.uniques[mask as usize] = 1599 + straight;
                straight += 1;
            } else if mask != WHEEL_MASK {
                self.flushes[mask as usize] = 322 + scattered;
                self.uniques[mask as usize] = 6185 + scattered;
                scattered += 1;
            }
        }

        // The wheel sorts below every other straight despite its high ace bit.
        self.flushes[WHEEL_MASK as usize] = 10;
        self.uniques[WHEEL_MASK as usize] = 1609;

        debug_assert_eq!(straight, 10);
        debug_assert_eq!(scattered, 1278);
    }

    /// Fill the prime-product table for quads, boats, trips, two pairs and
    /// pairs, strongest first within each band.
    fn build_prime_table(&mut self) {
        let mut rank = 11u16;
        for a in (0..13).rev() {
            for b in (0..13).rev() {
                if a != b {
                    self.prime_products
                        .insert(PRIMES[a].pow(4) * PRIMES[b], rank);
                    rank += 1;
                }
            }
        }
        debug_assert_eq!(rank, 167);

        for a in (0..13).rev() {
            for b in (0..13).rev() {
                if a != b {
                    self.prime_products
                        .insert(PRIMES[a].pow(3) * PRIMES[b].pow(2), rank);
                    rank += 1;
                }
            }
        }
        debug_assert_eq!(rank, 323);

        rank = 1610;
        for a in (0..13).rev() {
            for b in (0..13).rev() {
                for c in (0..b).rev() {
                    if a != b && a != c {
                        self.prime_products
                            .insert(PRIMES[a].pow(3) * PRIMES[b] * PRIMES[c], rank);
                        rank += 1;
                    }
                }
            }
        }
        debug_assert_eq!(rank, 2468);

        for a in (0..13).rev() {
            for b in (0..a).rev() {
                for c in (0..13).rev() {
                    if a != c && b != c {
                        self.prime_products
                            .insert(PRIMES[a].pow(2) * PRIMES[b].pow(2) * PRIMES[c], rank);
                        rank += 1;
                    }
                }
            }
        }
        debug_assert_eq!(rank, 3326);

        for a in (0..13).rev() {
            for b in (0..13).rev() {
                for c in (0..b).rev() {
                    for d in (0..c).rev() {
                        if a != b && a != c && a != d {
                            self.prime_products.insert(
                                PRIMES[a].pow(2) * PRIMES[b] * PRIMES[c] * PRIMES[d],
                                rank,
                            );
                            rank += 1;
                        }
                    }
                }
            }
        }
        debug_assert_eq!(rank, 6186);
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
