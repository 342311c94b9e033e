//! The house's randomness source.
//!
//! The host hand is derived from a SHA-256 digest over the contract's draw
//! nonce, the block timestamp, and the calling address, reduced modulo the
//! number of hands:
//!
//! ```text
//! host = Sha256("janken-draw" || nonce_be || timestamp_be || caller) % 3
//! ```
//!
//! ## Determinism
//!
//! Every input is publicly observable before the transaction executes: the
//! nonce sits in a fixed storage slot, the timestamp is the block time, and
//! the caller picks its own address. Any party that reads the nonce ahead of
//! its transaction can reproduce the draw exactly. The oracle is
//! deterministic by construction and exploitable by design; preserving that
//! observability is a requirement, not a bug to patch.

use commonware_cryptography::{ed25519::PublicKey, sha256::Sha256, Hasher};
use commonware_utils::modulo;
use janken_types::game::{Hand, HAND_COUNT};

/// Domain separator for draw digests.
const DRAW_DOMAIN: &[u8] = b"janken-draw";

/// Derive the host hand for the draw identified by `nonce`.
///
/// The engine calls this with its current nonce and increments afterwards;
/// a predictor calls it with the nonce it read from storage. Same inputs,
/// same hand.
pub fn host_hand(nonce: u64, timestamp: u64, caller: &PublicKey) -> Hand {
    let mut hasher = Sha256::new();
    hasher.update(DRAW_DOMAIN);
    hasher.update(&nonce.to_be_bytes());
    hasher.update(&timestamp.to_be_bytes());
    hasher.update(caller.as_ref());
    let digest = hasher.finalize().0;

    Hand::from_draw(modulo(&digest, HAND_COUNT))
}
