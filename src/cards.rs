//! Card representation and deck utilities.
//!
//! Cards use Cactus Kev's packed 32-bit layout:
//!
//! ```text
//! +--------+--------+--------+--------+
//! |xxxbbbbb|bbbbbbbb|cdhsxxxx|xxpppppp|
//! +--------+--------+--------+--------+
//! p = prime number of rank (deuce=2, trey=3, ..., ace=41)
//! cdhs = suit bit
//! b = rank bit
//! ```
//!
//! The layout lets the evaluator detect flushes with a single AND, look up
//! straights and high cards by rank bitmask, and resolve every other hand
//! through a prime-product key.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Rank characters, low to high (index 0 = deuce).
pub const RANK_CHARS: [char; 13] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

/// Suit characters (index matches the suit bit offset).
pub const SUIT_CHARS: [char; 4] = ['s', 'h', 'd', 'c'];

/// Prime factor per rank index.
pub const PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Mask for the four suit bits.
pub const SUIT_MASK: u32 = 0xF000;

/// Mask for the prime payload.
pub const PRIME_MASK: u32 = 0x3F;

/// A playing card in Cactus Kev encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u32);

impl Card {
    /// Build a card from a rank index (0 = deuce .. 12 = ace) and a suit
    /// index (0 = spades .. 3 = clubs).
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13, "rank index must be 0-12");
        debug_assert!(suit < 4, "suit index must be 0-3");
        Card((1 << (rank as u32 + 16)) | (1 << (suit as u32 + 12)) | PRIMES[rank as usize])
    }

    /// The packed 32-bit value.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Rank index 0-12.
    #[inline]
    pub fn rank(self) -> u8 {
        (31 - (self.0 >> 16).leading_zeros()) as u8
    }

    /// Suit index 0-3.
    #[inline]
    pub fn suit(self) -> u8 {
        (31 - ((self.0 & SUIT_MASK) >> 12).leading_zeros()) as u8
    }

    /// Prime factor of the rank.
    #[inline]
    pub fn prime(self) -> u32 {
        self.0 & PRIME_MASK
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parse `"Rs"` notation, e.g. `"Ah"`, `"Td"`, `"2c"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (r, su) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(su), None) => (r, su),
            _ => return Err(CardParseError::Length(s.len())),
        };

        let rank = RANK_CHARS
            .iter()
            .position(|&c| c == r.to_ascii_uppercase())
            .ok_or(CardParseError::Rank(r))? as u8;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == su.to_ascii_lowercase())
            .ok_or(CardParseError::Suit(su))? as u8;

        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            RANK_CHARS[self.rank() as usize],
            SUIT_CHARS[self.suit() as usize]
        )
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Error for malformed card text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardParseError {
    /// Input was not exactly two characters.
    Length(usize),
    /// Unknown rank character.
    Rank(char),
    /// Unknown suit character.
    Suit(char),
}

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardParseError::Length(n) => {
                write!(f, "card must be two characters (rank, suit), got {}", n)
            }
            CardParseError::Rank(c) => write!(f, "invalid rank character '{}'", c),
            CardParseError::Suit(c) => write!(f, "invalid suit character '{}'", c),
        }
    }
}

impl std::error::Error for CardParseError {}

/// Parse a run of concatenated cards, e.g. `"AhKs7d"`.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, CardParseError> {
    if s.len() % 2 != 0 {
        return Err(CardParseError::Length(s.len()));
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| std::str::from_utf8(pair).unwrap_or("").parse())
        .collect()
}

/// An ordered 52-card deck, suits outer, ranks inner.
pub fn make_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for suit in 0..4u8 {
        for rank in 0..13u8 {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// Uniform in-place shuffle.
pub fn shuffle<R: Rng>(deck: &mut [Card], rng: &mut R) {
    deck.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_parse_display_roundtrip() {
        for card in make_deck() {
            let text = card.to_string();
            let parsed: Card = text.parse().unwrap();
            assert_eq!(parsed, card, "roundtrip failed for {}", text);
        }
    }

    #[test]
    fn test_packed_layout() {
        let ace_spades: Card = "As".parse().unwrap();
        assert_eq!(ace_spades.rank(), 12);
        assert_eq!(ace_spades.suit(), 0);
        assert_eq!(ace_spades.prime(), 41);
        assert_eq!(ace_spades.bits(), (1 << 28) | 0x1000 | 41);

        let deuce_clubs: Card = "2c".parse().unwrap();
        assert_eq!(deuce_clubs.rank(), 0);
        assert_eq!(deuce_clubs.prime(), 2);
        assert_eq!(deuce_clubs.bits(), (1 << 16) | 0x8000 | 2);
    }

    #[test]
    fn test_invalid_cards() {
        assert_eq!("A".parse::<Card>(), Err(CardParseError::Length(1)));
        assert_eq!("Ahx".parse::<Card>(), Err(CardParseError::Length(3)));
        assert_eq!("Xh".parse::<Card>(), Err(CardParseError::Rank('X')));
        assert_eq!("Az".parse::<Card>(), Err(CardParseError::Suit('z')));
    }

    #[test]
    fn test_parse_cards() {
        let cards = parse_cards("AhKs7d").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].to_string(), "Ah");
        assert_eq!(cards[2].to_string(), "7d");

        assert!(parse_cards("AhK").is_err());
        assert!(parse_cards("AhZZ").is_err());
    }

    #[test]
    fn test_deck_is_complete() {
        let deck = make_deck();
        assert_eq!(deck.len(), 52);
        let unique: HashSet<u32> = deck.iter().map(|c| c.bits()).collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn test_shuffle_preserves_cards() {
        let mut deck = make_deck();
        let before: HashSet<u32> = deck.iter().map(|c| c.bits()).collect();
        let mut rng = StdRng::seed_from_u64(7);
        shuffle(&mut deck, &mut rng);
        let after: HashSet<u32> = deck.iter().map(|c| c.bits()).collect();
        assert_eq!(before, after);
    }
}
