//! Janken execution layer.
//!
//! This crate contains the deterministic contract state machines: the
//! betting table, the FOMO jackpot wrapper, the randomness oracle they
//! draw from, and a serialized ledger that hosts one contract at a time.
//!
//! ## Determinism requirements
//! - Execution derives randomness only from the oracle inputs (nonce,
//!   block time, caller); never from wall-clock time or an OS RNG.
//! - Every operation is atomic: rejections happen before any mutation.
//! - The oracle's inputs stay publicly observable. The prediction exploit
//!   in `predictron` is a supported consumer of that observability, so
//!   hardening the draw would be a behavior change, not a fix.
//!
//! The primary entrypoints are [`Table`], [`FomoTable`], and [`Ledger`].

pub mod fomo;
pub mod ledger;
pub mod oracle;
pub mod table;


pub use fomo::FomoTable;
pub use ledger::{Contract, Ledger, Receipt, SubmitError};
pub use table::Table;
