//! Wire types for the janken contract: instructions, signed transactions,
//! emitted events, and the rejection taxonomy.
//!
//! Every type here is part of the externally observable surface, so the
//! codec impls fix field order and presence at the byte level. Integers are
//! big-endian; enum payloads are introduced by a single tag byte.

use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::{
    ed25519::{self, PublicKey},
    Signer, Verifier,
};
use commonware_utils::union;
use thiserror::Error as ThisError;

use crate::game::{Hand, Outcome};

pub const NAMESPACE: &[u8] = b"_JANKEN";
pub const TRANSACTION_SUFFIX: &[u8] = b"_TX";

/// Fixed unit wager in wei (1 gwei). Any other attached value is rejected.
pub const STAKE_WEI: u64 = 1_000_000_000;

/// Share of each round's full pot (2x stake) accrued into the jackpot,
/// in basis points.
pub const FOMO_CUT_BPS: u64 = 500;

/// Jackpot countdown window in seconds.
pub const FOMO_WINDOW_SECS: u64 = 3_600;

/// Storage slot holding the oracle nonce.
///
/// The slot is fixed so any observer can read the nonce without submitting
/// a transaction; the prediction exploit depends on it.
pub const NONCE_STORAGE_SLOT: u64 = 1;

#[inline]
pub fn transaction_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, TRANSACTION_SUFFIX)
}

/// A call into the contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Wager the attached value on a hand.
    /// Binary: [1] [hand:u8]
    Bet { hand: Hand },

    /// Top up the house balance with the attached value. Anyone may fund.
    /// Binary: [2]
    Fund,

    /// Move `amount` from the house balance to the owner. Owner only.
    /// Binary: [3] [amount:u64 BE]
    Withdraw { amount: u64 },
}

impl Write for Instruction {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Bet { hand } => {
                1u8.write(writer);
                hand.write(writer);
            }
            Self::Fund => 2u8.write(writer),
            Self::Withdraw { amount } => {
                3u8.write(writer);
                amount.write(writer);
            }
        }
    }
}

impl Read for Instruction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if !reader.has_remaining() {
            return Err(Error::EndOfBuffer);
        }
        let instruction = match reader.get_u8() {
            1 => Self::Bet {
                hand: Hand::read(reader)?,
            },
            2 => Self::Fund,
            3 => Self::Withdraw {
                amount: u64::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(instruction)
    }
}

impl EncodeSize for Instruction {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Bet { .. } => Hand::SIZE,
                Self::Fund => 0,
                Self::Withdraw { amount } => amount.encode_size(),
            }
    }
}

/// A signed call with an attached value transfer.
///
/// The hosting ledger executes transactions one at a time, so a transaction
/// is the unit of atomicity: either the whole effect lands or none of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub instruction: Instruction,
    /// Native value attached to the call, in wei.
    pub value: u64,

    pub public: ed25519::PublicKey,
    pub signature: ed25519::Signature,
}

impl Transaction {
    fn payload(value: &u64, instruction: &Instruction) -> Vec<u8> {
        let mut payload = Vec::new();
        value.write(&mut payload);
        instruction.write(&mut payload);

        payload
    }

    pub fn sign(private: &ed25519::PrivateKey, value: u64, instruction: Instruction) -> Self {
        let signature = private.sign(
            &transaction_namespace(NAMESPACE),
            &Self::payload(&value, &instruction),
        );

        Self {
            instruction,
            value,
            public: private.public_key(),
            signature,
        }
    }

    pub fn verify(&self) -> bool {
        self.public.verify(
            &transaction_namespace(NAMESPACE),
            &Self::payload(&self.value, &self.instruction),
            &self.signature,
        )
    }
}

impl Write for Transaction {
    fn write(&self, writer: &mut impl BufMut) {
        self.value.write(writer);
        self.instruction.write(writer);
        self.public.write(writer);
        self.signature.write(writer);
    }
}

impl Read for Transaction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u64::read(reader)?;
        let instruction = Instruction::read(reader)?;
        let public = ed25519::PublicKey::read(reader)?;
        let signature = ed25519::Signature::read(reader)?;

        Ok(Self {
            instruction,
            value,
            public,
            signature,
        })
    }
}

impl EncodeSize for Transaction {
    fn encode_size(&self) -> usize {
        self.value.encode_size()
            + self.instruction.encode_size()
            + self.public.encode_size()
            + self.signature.encode_size()
    }
}

/// An event emitted by a resolved call.
///
/// The outcome events are named after the match result from the bettor's
/// perspective; `amount` is what was returned to the bettor (2x stake on a
/// win, the stake on a draw, nothing on a loss).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The bettor beat the host hand.
    /// Binary: [1] [caller] [playerHand:u8] [hostHand:u8] [amount:u64 BE]
    Won {
        caller: PublicKey,
        player_hand: Hand,
        host_hand: Hand,
        amount: u64,
    },

    /// The host hand beat the bettor; the house keeps both stakes.
    /// Binary: [2] [caller] [playerHand:u8] [hostHand:u8] [amount:u64 BE]
    Lost {
        caller: PublicKey,
        player_hand: Hand,
        host_hand: Hand,
        amount: u64,
    },

    /// Both sides played the same hand; the stake was returned.
    /// Binary: [3] [caller] [playerHand:u8] [hostHand:u8] [amount:u64 BE]
    Draw {
        caller: PublicKey,
        player_hand: Hand,
        host_hand: Hand,
        amount: u64,
    },

    /// The jackpot countdown lapsed and the pool was paid to the leader.
    /// Binary: [4] [winner] [amount:u64 BE]
    FomoWithdraw { winner: PublicKey, amount: u64 },
}

impl Event {
    /// Build the outcome event matching a resolved wager.
    pub fn resolved(
        outcome: Outcome,
        caller: PublicKey,
        player_hand: Hand,
        host_hand: Hand,
        amount: u64,
    ) -> Self {
        match outcome {
            Outcome::Won => Self::Won {
                caller,
                player_hand,
                host_hand,
                amount,
            },
            Outcome::Lost => Self::Lost {
                caller,
                player_hand,
                host_hand,
                amount,
            },
            Outcome::Draw => Self::Draw {
                caller,
                player_hand,
                host_hand,
                amount,
            },
        }
    }

    /// The wager outcome this event reports, if it is an outcome event.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Won { .. } => Some(Outcome::Won),
            Self::Lost { .. } => Some(Outcome::Lost),
            Self::Draw { .. } => Some(Outcome::Draw),
            Self::FomoWithdraw { .. } => None,
        }
    }
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Won {
                caller,
                player_hand,
                host_hand,
                amount,
            } => {
                1u8.write(writer);
                caller.write(writer);
                player_hand.write(writer);
                host_hand.write(writer);
                amount.write(writer);
            }
            Self::Lost {
                caller,
                player_hand,
                host_hand,
                amount,
            } => {
                2u8.write(writer);
                caller.write(writer);
                player_hand.write(writer);
                host_hand.write(writer);
                amount.write(writer);
            }
            Self::Draw {
                caller,
                player_hand,
                host_hand,
                amount,
            } => {
                3u8.write(writer);
                caller.write(writer);
                player_hand.write(writer);
                host_hand.write(writer);
                amount.write(writer);
            }
            Self::FomoWithdraw { winner, amount } => {
                4u8.write(writer);
                winner.write(writer);
                amount.write(writer);
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if !reader.has_remaining() {
            return Err(Error::EndOfBuffer);
        }
        let tag = reader.get_u8();
        let event = match tag {
            1 | 2 | 3 => {
                let caller = PublicKey::read(reader)?;
                let player_hand = Hand::read(reader)?;
                let host_hand = Hand::read(reader)?;
                let amount = u64::read(reader)?;
                let outcome = match tag {
                    1 => Outcome::Won,
                    2 => Outcome::Lost,
                    _ => Outcome::Draw,
                };
                Self::resolved(outcome, caller, player_hand, host_hand, amount)
            }
            4 => Self::FomoWithdraw {
                winner: PublicKey::read(reader)?,
                amount: u64::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(event)
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Won { caller, amount, .. }
                | Self::Lost { caller, amount, .. }
                | Self::Draw { caller, amount, .. } => {
                    caller.encode_size() + Hand::SIZE + Hand::SIZE + amount.encode_size()
                }
                Self::FomoWithdraw { winner, amount } => {
                    winner.encode_size() + amount.encode_size()
                }
            }
    }
}

/// Why a call was rejected.
///
/// Every rejection happens before any state mutation; partial effects never
/// occur and the contract performs no retries on the caller's behalf.
#[derive(Clone, Copy, Debug, ThisError, PartialEq, Eq)]
pub enum BetError {
    /// The attached value is not the unit stake.
    #[error("attached value is not the unit stake")]
    InsufficientStake,
    /// The house cannot cover the worst-case payout of this call.
    #[error("house cannot cover a full loss")]
    InsufficientHouseFunds,
    /// A non-owner invoked an owner-only operation.
    #[error("caller is not the owner")]
    Unauthorized,
    /// A withdrawal asked for more than the house holds.
    #[error("withdrawal exceeds house balance")]
    InsufficientWithdrawal,
}
