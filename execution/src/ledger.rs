//! A minimal serialized ledger hosting one contract.
//!
//! The hosting chain's guarantees, reduced to what the games rely on:
//! transactions execute one at a time against shared contract state, each
//! one atomically (apply everything or reject before any mutation), and
//! contract storage can be read without submitting a transaction.
//!
//! The ledger does not model accounts, gas, or inclusion rules. The only
//! ordering hazard left is the one the prediction exploit cares about:
//! anything read before submission may be consumed by a transaction that
//! lands first.

use commonware_cryptography::ed25519::{PrivateKey, PublicKey};
use janken_types::execution::{BetError, Event, Instruction, Transaction, NONCE_STORAGE_SLOT};
use janken_types::game::Hand;
use tracing::{debug, warn};

use crate::fomo::FomoTable;
use crate::table::Table;

/// A deployed contract the ledger can host.
pub trait Contract {
    /// Execute one instruction with an attached value at block time `now`.
    /// Either the whole effect happens and events come back, or the call is
    /// rejected with zero mutation.
    fn apply(
        &mut self,
        caller: &PublicKey,
        value: u64,
        now: u64,
        instruction: &Instruction,
    ) -> Result<Vec<Event>, BetError>;

    /// Read a fixed storage slot without a transaction. The draw nonce
    /// lives in [NONCE_STORAGE_SLOT] on every contract in this crate.
    fn storage(&self, slot: u64) -> Option<u64>;
}

impl Contract for Table {
    fn apply(
        &mut self,
        caller: &PublicKey,
        value: u64,
        now: u64,
        instruction: &Instruction,
    ) -> Result<Vec<Event>, BetError> {
        match instruction {
            Instruction::Bet { hand } => Ok(vec![self.bet(caller, value, now, *hand)?]),
            Instruction::Fund => {
                self.fund(value);
                Ok(Vec::new())
            }
            Instruction::Withdraw { amount } => {
                self.withdraw(caller, *amount)?;
                Ok(Vec::new())
            }
        }
    }

    fn storage(&self, slot: u64) -> Option<u64> {
        (slot == NONCE_STORAGE_SLOT).then_some(self.nonce())
    }
}

impl Contract for FomoTable {
    fn apply(
        &mut self,
        caller: &PublicKey,
        value: u64,
        now: u64,
        instruction: &Instruction,
    ) -> Result<Vec<Event>, BetError> {
        match instruction {
            Instruction::Bet { hand } => self.bet(caller, value, now, *hand),
            Instruction::Fund => {
                self.fund(value);
                Ok(Vec::new())
            }
            Instruction::Withdraw { amount } => {
                self.withdraw(caller, *amount)?;
                Ok(Vec::new())
            }
        }
    }

    fn storage(&self, slot: u64) -> Option<u64> {
        (slot == NONCE_STORAGE_SLOT).then_some(self.nonce())
    }
}

/// Why a submitted transaction produced no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The signature does not cover the transaction payload.
    InvalidSignature,
    /// The contract rejected the call before mutating anything.
    Rejected(BetError),
}

/// Record of one applied or rejected transaction.
#[derive(Clone, Debug)]
pub struct Receipt {
    pub caller: PublicKey,
    pub result: Result<Vec<Event>, SubmitError>,
}

/// One contract plus the chain context it executes under.
pub struct Ledger<C: Contract> {
    contract: C,
    time: u64,
    receipts: Vec<Receipt>,
}

impl<C: Contract> Ledger<C> {
    /// Host `contract` starting at block time `genesis_time`.
    pub fn new(contract: C, genesis_time: u64) -> Self {
        Self {
            contract,
            time: genesis_time,
            receipts: Vec::new(),
        }
    }

    /// Current block time in unix seconds.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Advance block time; the test-harness equivalent of waiting.
    pub fn advance_time(&mut self, secs: u64) {
        self.time = self.time.saturating_add(secs);
    }

    /// Read-only view of the hosted contract.
    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Read a contract storage slot without a transaction.
    pub fn storage(&self, slot: u64) -> Option<u64> {
        self.contract.storage(slot)
    }

    /// All receipts, in execution order.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Execute one transaction. Serialized by construction: the ledger is
    /// borrowed exclusively for the duration of the call.
    pub fn submit(&mut self, tx: Transaction) -> Result<Vec<Event>, SubmitError> {
        let result = if !tx.verify() {
            warn!(caller = ?tx.public, "rejected transaction with bad signature");
            Err(SubmitError::InvalidSignature)
        } else {
            self.contract
                .apply(&tx.public, tx.value, self.time, &tx.instruction)
                .map_err(SubmitError::Rejected)
        };

        debug!(caller = ?tx.public, ok = result.is_ok(), "executed transaction");
        self.receipts.push(Receipt {
            caller: tx.public,
            result: result.clone(),
        });
        result
    }

    /// Convenience for tests and bots: submit a signed bet.
    pub fn submit_bet(
        &mut self,
        private: &PrivateKey,
        value: u64,
        hand: Hand,
    ) -> Result<Vec<Event>, SubmitError> {
        self.submit(Transaction::sign(
            private,
            value,
            Instruction::Bet { hand },
        ))
    }
}
