pub mod execution;
pub mod game;

pub use execution::{
    transaction_namespace, BetError, Event, Instruction, Transaction, FOMO_CUT_BPS,
    FOMO_WINDOW_SECS, NAMESPACE, NONCE_STORAGE_SLOT, STAKE_WEI,
};
pub use game::{Hand, Outcome};
