//! The betting table.
//!
//! One table is one deployed contract: it owns the house balance, the draw
//! nonce, and the owner address. `bet` is the only operation that mutates
//! the nonce; rejected wagers leave the table untouched.
//!
//! ## Payout policy
//!
//! The incoming stake is held in escrow for the duration of the call and is
//! never counted into the house balance:
//! - Draw: the stake goes straight back; the balance does not move.
//! - Won: the house pays 2x stake out of its balance on top of the returned
//!   stake.
//! - Lost: the house keeps the stake; the balance grows by it.
//!
//! The worst case for the house is therefore a 2x stake payout, and a wager
//! is rejected up front unless the balance covers it.

use commonware_cryptography::ed25519::PublicKey;
use janken_types::{
    execution::{BetError, Event, STAKE_WEI},
    game::{Hand, Outcome},
};
use tracing::debug;

use crate::oracle;

/// Contract state for one betting table.
#[derive(Clone, Debug)]
pub struct Table {
    pub(crate) owner: PublicKey,
    pub(crate) balance: u64,
    pub(crate) nonce: u64,
}

impl Table {
    /// Deploy a fresh table owned by `owner`, with no funds and a zero
    /// nonce.
    pub fn new(owner: PublicKey) -> Self {
        Self {
            owner,
            balance: 0,
            nonce: 0,
        }
    }

    pub fn owner(&self) -> &PublicKey {
        &self.owner
    }

    /// House funds in wei.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Draw counter; increments by exactly one per accepted wager.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Reject a wager that cannot be accepted: wrong stake, or a house that
    /// cannot cover a full loss. Checked before any mutation.
    pub(crate) fn check_wager(&self, value: u64) -> Result<(), BetError> {
        if value != STAKE_WEI {
            return Err(BetError::InsufficientStake);
        }
        if self.balance < 2 * STAKE_WEI {
            return Err(BetError::InsufficientHouseFunds);
        }
        Ok(())
    }

    /// Resolve an already-validated wager: draw the host hand, bump the
    /// nonce, and move funds. Infallible by the time it runs.
    pub(crate) fn resolve(
        &mut self,
        caller: &PublicKey,
        value: u64,
        now: u64,
        hand: Hand,
    ) -> Event {
        let host = oracle::host_hand(self.nonce, now, caller);
        self.nonce += 1;

        let outcome = hand.versus(host);
        let amount = match outcome {
            Outcome::Draw => value,
            Outcome::Won => {
                self.balance -= 2 * STAKE_WEI;
                2 * STAKE_WEI
            }
            Outcome::Lost => {
                self.balance = self.balance.saturating_add(value);
                0
            }
        };
        debug!(
            ?caller,
            ?hand,
            ?host,
            ?outcome,
            nonce = self.nonce,
            balance = self.balance,
            "resolved wager"
        );

        Event::resolved(outcome, caller.clone(), hand, host, amount)
    }

    /// Wager the attached `value` on `hand` at block time `now`.
    pub fn bet(
        &mut self,
        caller: &PublicKey,
        value: u64,
        now: u64,
        hand: Hand,
    ) -> Result<Event, BetError> {
        self.check_wager(value)?;
        Ok(self.resolve(caller, value, now, hand))
    }

    /// Top up the house balance. Anyone may fund; there is no game logic
    /// attached.
    pub fn fund(&mut self, value: u64) {
        self.balance = self.balance.saturating_add(value);
        debug!(balance = self.balance, "funded house");
    }

    /// Move `amount` of house funds to the owner.
    pub fn withdraw(&mut self, caller: &PublicKey, amount: u64) -> Result<(), BetError> {
        if caller != &self.owner {
            return Err(BetError::Unauthorized);
        }
        if amount > self.balance {
            return Err(BetError::InsufficientWithdrawal);
        }
        self.balance -= amount;
        debug!(amount, balance = self.balance, "withdrew house funds");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_cryptography::{ed25519::PrivateKey, Signer};
    use commonware_math::algebra::Random;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn account(seed: u64) -> PublicKey {
        let mut rng = StdRng::seed_from_u64(seed);
        PrivateKey::random(&mut rng).public_key()
    }

    /// First block time at which the oracle hands `want` to `caller`.
    fn time_for_host(nonce: u64, caller: &PublicKey, want: Hand) -> u64 {
        (0u64..)
            .find(|now| oracle::host_hand(nonce, *now, caller) == want)
            .expect("oracle covers all hands")
    }

    #[test]
    fn test_wrong_stake_is_rejected_without_mutation() {
        let owner = account(1);
        let player = account(2);
        let mut table = Table::new(owner);
        table.fund(10 * STAKE_WEI);

        for value in [0, 1_000, STAKE_WEI - 1, STAKE_WEI + 1, 2 * STAKE_WEI] {
            let err = table.bet(&player, value, 0, Hand::Rock).unwrap_err();
            assert_eq!(err, BetError::InsufficientStake);
        }
        assert_eq!(table.nonce(), 0);
        assert_eq!(table.balance(), 10 * STAKE_WEI);
    }

    #[test]
    fn test_underfunded_house_is_rejected_without_mutation() {
        let owner = account(1);
        let player = account(2);
        let mut table = Table::new(owner);
        table.fund(2 * STAKE_WEI - 1);

        let err = table.bet(&player, STAKE_WEI, 0, Hand::Rock).unwrap_err();
        assert_eq!(err, BetError::InsufficientHouseFunds);
        assert_eq!(table.nonce(), 0);
        assert_eq!(table.balance(), 2 * STAKE_WEI - 1);
    }

    #[test]
    fn test_payout_policy_per_outcome() {
        // House holds 2 gwei, the caller bets Rock with 1 gwei: Lost leaves
        // 3 gwei, Won leaves 0, Draw leaves 2 gwei.
        let owner = account(1);
        let player = account(2);

        for (host, outcome, balance_after, amount) in [
            (Hand::Paper, Outcome::Lost, 3 * STAKE_WEI, 0),
            (Hand::Scissors, Outcome::Won, 0, 2 * STAKE_WEI),
            (Hand::Rock, Outcome::Draw, 2 * STAKE_WEI, STAKE_WEI),
        ] {
            let mut table = Table::new(owner.clone());
            table.fund(2 * STAKE_WEI);
            let now = time_for_host(0, &player, host);

            let event = table
                .bet(&player, STAKE_WEI, now, Hand::Rock)
                .expect("wager accepted");
            assert_eq!(event.outcome(), Some(outcome));
            assert_eq!(
                event,
                Event::resolved(outcome, player.clone(), Hand::Rock, host, amount)
            );
            assert_eq!(table.balance(), balance_after);
            assert_eq!(table.nonce(), 1);
        }
    }

    #[test]
    fn test_nonce_counts_accepted_wagers_only() {
        let owner = account(1);
        let player = account(2);
        let mut table = Table::new(owner);
        table.fund(100 * STAKE_WEI);

        let mut accepted = 0;
        for i in 0..20u64 {
            // Every third call attaches a bad stake and must not consume a
            // nonce.
            let value = if i % 3 == 0 { STAKE_WEI / 2 } else { STAKE_WEI };
            let result = table.bet(&player, value, i, Hand::from_draw(i));
            if result.is_ok() {
                accepted += 1;
            }
            assert_eq!(table.nonce(), accepted);
        }
        assert!(accepted > 0);
    }

    #[test]
    fn test_balance_follows_outcomes_exactly() {
        let owner = account(1);
        let player = account(2);
        let mut table = Table::new(owner);
        table.fund(50 * STAKE_WEI);

        let mut rng = StdRng::seed_from_u64(0x5eed_0001);
        for now in 0..30u64 {
            let hand = Hand::from_draw(rng.gen_range(0..3u64));
            let before = table.balance();
            let event = table.bet(&player, STAKE_WEI, now, hand).expect("funded");
            let expected = match event.outcome().expect("outcome event") {
                Outcome::Draw => before,
                Outcome::Won => before - 2 * STAKE_WEI,
                Outcome::Lost => before + STAKE_WEI,
            };
            assert_eq!(table.balance(), expected);
        }
    }

    #[test]
    fn test_withdraw_is_owner_only() {
        let owner_key = {
            let mut rng = StdRng::seed_from_u64(7);
            PrivateKey::random(&mut rng)
        };
        let owner = owner_key.public_key();
        let stranger = account(8);

        let mut table = Table::new(owner.clone());
        table.fund(5 * STAKE_WEI);

        assert_eq!(
            table.withdraw(&stranger, STAKE_WEI).unwrap_err(),
            BetError::Unauthorized
        );
        assert_eq!(
            table.withdraw(&owner, 6 * STAKE_WEI).unwrap_err(),
            BetError::InsufficientWithdrawal
        );
        table.withdraw(&owner, 5 * STAKE_WEI).expect("owner drains");
        assert_eq!(table.balance(), 0);
    }
}
