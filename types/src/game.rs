//! Hands and match outcomes.
//!
//! A hand is a single byte on the wire:
//! - 0 = Rock
//! - 1 = Paper
//! - 2 = Scissors
//!
//! Dominance is cyclic: hand `m` is beaten by `(m + 1) % 3`, so every pair
//! of distinct hands has a winner.

use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};

/// Number of distinct hands.
pub const HAND_COUNT: u64 = 3;

/// A playable hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Hand {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Hand {
    /// All hands, in wire order.
    pub const ALL: [Hand; HAND_COUNT as usize] = [Hand::Rock, Hand::Paper, Hand::Scissors];

    /// Map a draw index to a hand (reduced modulo [HAND_COUNT]).
    pub fn from_draw(index: u64) -> Self {
        match index % HAND_COUNT {
            0 => Hand::Rock,
            1 => Hand::Paper,
            _ => Hand::Scissors,
        }
    }

    /// The hand that beats this one.
    pub fn counter(self) -> Self {
        Hand::from_draw(self as u64 + 1)
    }

    /// Score this hand against `other`, from this hand's perspective:
    /// `0` on a tie, `-1` if `other` wins, `+1` if this hand wins.
    pub fn score(self, other: Hand) -> i8 {
        if self == other {
            0
        } else if self.counter() == other {
            -1
        } else {
            1
        }
    }

    /// Resolve this hand against `other`, from this hand's perspective.
    pub fn versus(self, other: Hand) -> Outcome {
        match self.score(other) {
            0 => Outcome::Draw,
            1 => Outcome::Won,
            _ => Outcome::Lost,
        }
    }
}

impl Write for Hand {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Hand {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Rock),
            1 => Ok(Self::Paper),
            2 => Ok(Self::Scissors),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Hand {
    const SIZE: usize = 1;
}

/// Result of a wager, always from the bettor's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Draw,
    Won,
    Lost,
}

impl Outcome {
    /// The same match seen from the other side.
    pub fn flipped(self) -> Self {
        match self {
            Outcome::Draw => Outcome::Draw,
            Outcome::Won => Outcome::Lost,
            Outcome::Lost => Outcome::Won,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_codec::{DecodeExt, Encode};

    #[test]
    fn test_score_is_antisymmetric() {
        for a in Hand::ALL {
            for b in Hand::ALL {
                assert_eq!(a.score(b), -b.score(a), "score({a:?}, {b:?})");
                assert_eq!(a.versus(b), b.versus(a).flipped());
            }
            assert_eq!(a.score(a), 0);
            assert_eq!(a.versus(a), Outcome::Draw);
        }
    }

    #[test]
    fn test_counter_always_wins() {
        for hand in Hand::ALL {
            assert_eq!(hand.counter().versus(hand), Outcome::Won);
            assert_eq!(hand.versus(hand.counter()), Outcome::Lost);
        }
    }

    #[test]
    fn test_cyclic_dominance() {
        assert_eq!(Hand::Paper.versus(Hand::Rock), Outcome::Won);
        assert_eq!(Hand::Scissors.versus(Hand::Paper), Outcome::Won);
        assert_eq!(Hand::Rock.versus(Hand::Scissors), Outcome::Won);
    }

    #[test]
    fn test_from_draw_wraps() {
        assert_eq!(Hand::from_draw(0), Hand::Rock);
        assert_eq!(Hand::from_draw(4), Hand::Paper);
        assert_eq!(Hand::from_draw(u64::MAX), Hand::from_draw(u64::MAX % 3));
    }

    #[test]
    fn test_decode_rejects_unknown_hand() {
        for byte in 3u8..=255 {
            assert!(matches!(
                Hand::decode(&mut &[byte][..]),
                Err(Error::InvalidEnum(i)) if i == byte,
            ));
        }
    }

    #[test]
    fn test_wire_encoding_is_one_byte() {
        for hand in Hand::ALL {
            let encoded = hand.encode();
            assert_eq!(encoded.as_ref(), [hand as u8].as_slice());
        }
    }
}
