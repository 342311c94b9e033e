//! The FOMO jackpot table.
//!
//! Wraps a [Table] with a time-decaying pot: every accepted wager feeds 5%
//! of the round's full pot (2x stake) into a pool and pushes a countdown
//! deadline out to at least one hour from now. Whoever placed the most
//! recent qualifying wager when the countdown lapses takes the whole pool.
//!
//! The pool is an accounting value on top of the house balance; funds leave
//! the balance only when a payout actually triggers. Settlement rides on the
//! next accepted wager after the deadline: that wager first pays the pool to
//! the leader, then resolves normally, and its own accrual opens the next
//! round. The cycle has no terminal state.

use commonware_cryptography::ed25519::PublicKey;
use janken_types::{
    execution::{BetError, Event, FOMO_CUT_BPS, FOMO_WINDOW_SECS, STAKE_WEI},
    game::Hand,
};
use tracing::{debug, info};

use crate::table::Table;

/// Jackpot share of one round's pot, in wei.
const fn fomo_cut() -> u64 {
    2 * STAKE_WEI * FOMO_CUT_BPS / 10_000
}

/// A betting table with the jackpot extension layered on top.
#[derive(Clone, Debug)]
pub struct FomoTable {
    pub(crate) inner: Table,
    pub(crate) pool: u64,
    pub(crate) deadline: u64,
    pub(crate) leader: Option<PublicKey>,
}

impl FomoTable {
    pub fn new(owner: PublicKey) -> Self {
        Self {
            inner: Table::new(owner),
            pool: 0,
            deadline: 0,
            leader: None,
        }
    }

    pub fn owner(&self) -> &PublicKey {
        self.inner.owner()
    }

    pub fn balance(&self) -> u64 {
        self.inner.balance()
    }

    pub fn nonce(&self) -> u64 {
        self.inner.nonce()
    }

    /// Accumulated jackpot in wei.
    pub fn fomo_pool(&self) -> u64 {
        self.pool
    }

    /// Absolute unix time at which the current round lapses; 0 before the
    /// first wager.
    pub fn fomo_end_time(&self) -> u64 {
        self.deadline
    }

    /// The bettor in line for the pool, if a round has started.
    pub fn fomo_winner(&self) -> Option<&PublicKey> {
        self.leader.as_ref()
    }

    /// Whether a wager arriving at `now` would trigger a jackpot payout.
    fn settlement_due(&self, now: u64) -> bool {
        self.pool > 0 && now >= self.deadline
    }

    /// Wager the attached `value` on `hand` at block time `now`.
    ///
    /// May emit two events: a `FomoWithdraw` when this wager observes a
    /// lapsed round, followed by the wager's own outcome.
    pub fn bet(
        &mut self,
        caller: &PublicKey,
        value: u64,
        now: u64,
        hand: Hand,
    ) -> Result<Vec<Event>, BetError> {
        if value != STAKE_WEI {
            return Err(BetError::InsufficientStake);
        }
        // Worst case for this call: a full loss on the wager plus the pool
        // payout it may trigger. Checked before any mutation.
        let due = self.settlement_due(now);
        let mut liability = 2 * STAKE_WEI;
        if due {
            liability = liability.saturating_add(self.pool);
        }
        if self.inner.balance < liability {
            return Err(BetError::InsufficientHouseFunds);
        }

        let mut events = Vec::with_capacity(2);
        if due {
            if let Some(winner) = self.leader.clone() {
                self.inner.balance -= self.pool;
                info!(?winner, amount = self.pool, "fomo pool paid out");
                events.push(Event::FomoWithdraw {
                    winner,
                    amount: self.pool,
                });
                self.pool = 0;
            }
        }

        events.push(self.inner.resolve(caller, value, now, hand));

        // Accrue this round's cut and keep the countdown at least one
        // window out. The deadline never regresses.
        self.pool = self.pool.saturating_add(fomo_cut());
        self.deadline = self.deadline.max(now.saturating_add(FOMO_WINDOW_SECS));
        self.leader = Some(caller.clone());
        debug!(
            pool = self.pool,
            deadline = self.deadline,
            "fomo round updated"
        );

        Ok(events)
    }

    pub fn fund(&mut self, value: u64) {
        self.inner.fund(value);
    }

    pub fn withdraw(&mut self, caller: &PublicKey, amount: u64) -> Result<(), BetError> {
        self.inner.withdraw(caller, amount)
    }
}
