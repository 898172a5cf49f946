//! The batch state machine: one deposit-to-payout request.
//!
//! A batch watches its deposit addresses, forwards everything it sees into
//! the custodial pool, and once the forwarded total reaches the target
//! amount disburses `amount - fee` to the recipients as unequal, jittered
//! payouts.
//!
//! Funding policy: a batch is funded when the **cumulative** forwarded sum
//! reaches the target, not on the first sighting. Two partial deposits
//! that add up to the target fund it; one smaller deposit alone does not.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::{debug, info, warn};

use tumbler_core::error::{BatchError, SendError};
use tumbler_core::{Address, Coin};

use crate::account::Account;
use crate::partition::partition;

/// Default interval between poll rounds on each deposit address.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on the random delay inserted before each payout.
pub const MAX_PAYOUT_JITTER: Duration = Duration::from_secs(10);

/// Produces the pre-payout delay from its upper bound.
///
/// A plain function pointer so tests can pin it to zero.
pub type DelayFn = fn(Duration) -> Duration;

/// Uniform random delay in `[0, max)`.
pub fn random_delay(max: Duration) -> Duration {
    let max_millis = max.as_millis() as u64;
    if max_millis == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..max_millis))
}

/// Lifecycle states of a batch.
///
/// `Completed` and `TimedOut` are terminal; a batch is consumed by
/// [`Batch::run`] and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Watching,
    Funded,
    Disbursing,
    Completed,
    TimedOut,
}

/// How a batch ended.
///
/// A timeout is a non-error outcome: no qualifying deposit showed up in
/// the watch window, and nothing was disbursed. It is distinct from a
/// [`BatchError`], which means a transfer failed partway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// All payouts reached the ledger.
    Completed {
        /// Number of recipient payouts sent (may be fewer than the
        /// recipient count when the partitioner stopped early).
        payouts: usize,
    },
    /// The watch deadline elapsed before the target amount arrived.
    TimedOut,
}

enum Watch {
    Funded,
    TimedOut,
}

/// One user's deposit-to-payout request.
pub struct Batch {
    amount: Coin,
    fee: Coin,
    sources: Vec<Account>,
    recipients: Vec<Address>,
    created_at: DateTime<Utc>,
    poll_interval: Duration,
    timeout: Duration,
    delay: DelayFn,
    state: BatchState,
}

impl Batch {
    /// Create a batch watching `sources` for a combined deposit of
    /// `amount`, to be disbursed (minus `fee`) across `recipients`.
    ///
    /// The deposit watch starts at creation time: only ledger records
    /// stamped after "now" count toward funding.
    pub fn new(
        amount: Coin,
        fee: Coin,
        sources: Vec<Account>,
        recipients: Vec<Address>,
        timeout: Duration,
    ) -> Result<Self, BatchError> {
        match amount.checked_sub(fee) {
            Some(net) if net.is_positive() => {}
            _ => return Err(BatchError::FeeExceedsAmount { amount, fee }),
        }

        Ok(Self {
            amount,
            fee,
            sources,
            recipients,
            created_at: Utc::now(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout,
            delay: random_delay,
            state: BatchState::Watching,
        })
    }

    /// Override the poll interval (default [`DEFAULT_POLL_INTERVAL`]).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the payout delay generator (default [`random_delay`]).
    pub fn with_delay(mut self, delay: DelayFn) -> Self {
        self.delay = delay;
        self
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// The deposit addresses this batch watches.
    pub fn deposit_addresses(&self) -> Vec<Address> {
        self.sources.iter().map(|s| s.address().clone()).collect()
    }

    /// Drive the batch to a terminal state.
    ///
    /// Consumes the batch: a terminal batch is inert. Within one run the
    /// fee transfer strictly precedes every recipient payout; nothing else
    /// about payout timing is guaranteed, by design.
    pub async fn run(mut self, pool: &Account) -> Result<BatchOutcome, BatchError> {
        info!(
            target_amount = %self.amount,
            sources = self.sources.len(),
            recipients = self.recipients.len(),
            pool = %pool.address(),
            "batch watching for deposits"
        );

        match self.watch(pool).await? {
            Watch::TimedOut => {
                self.state = BatchState::TimedOut;
                info!(target_amount = %self.amount, "batch timed out; nothing disbursed");
                Ok(BatchOutcome::TimedOut)
            }
            Watch::Funded => {
                self.state = BatchState::Funded;
                info!(target_amount = %self.amount, "batch funded");

                self.state = BatchState::Disbursing;
                let payouts = self.disburse(pool).await?;
                self.state = BatchState::Completed;
                info!(payouts, "batch completed");
                Ok(BatchOutcome::Completed { payouts })
            }
        }
    }

    /// Watching phase: fan-out pollers, fan-in forwarded amounts.
    ///
    /// One task per source address polls for new deposits and immediately
    /// forwards each one to the pool, reporting the forwarded amount over
    /// a bounded channel. This task accumulates until the target is met or
    /// the deadline passes.
    async fn watch(&self, pool: &Account) -> Result<Watch, BatchError> {
        // The watch window is measured from creation time; if the run
        // started late, what is left of the window shrinks accordingly.
        let elapsed = (Utc::now() - self.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        let deadline = Instant::now() + self.timeout.saturating_sub(elapsed);

        let (report_tx, mut report_rx) = mpsc::channel::<Result<Coin, SendError>>(32);

        let mut pollers = JoinSet::new();
        for source in self.sources.iter().cloned() {
            let report_tx = report_tx.clone();
            let pool_address = pool.address().clone();
            let poll_interval = self.poll_interval;
            let mut cutoff = self.created_at;

            pollers.spawn(async move {
                loop {
                    match source.fetch_incoming(cutoff).await {
                        Ok(txns) => {
                            // Advance past this round so no record is counted
                            // twice, even when the ledger's clock runs ahead
                            // of ours.
                            let mut next_cutoff = Utc::now();
                            for txn in txns {
                                next_cutoff = next_cutoff.max(txn.timestamp);
                                debug!(
                                    source = %source.address(),
                                    amount = %txn.amount,
                                    "deposit seen, forwarding to pool"
                                );
                                let report = source
                                    .send(&pool_address, txn.amount)
                                    .await
                                    .map(|()| txn.amount);
                                let forward_failed = report.is_err();
                                if report_tx.send(report).await.is_err() || forward_failed {
                                    return;
                                }
                            }
                            cutoff = next_cutoff;
                        }
                        Err(e) => {
                            // The next tick is the retry.
                            warn!(source = %source.address(), error = %e, "poll round failed");
                        }
                    }
                    sleep(poll_interval).await;
                }
            });
        }
        drop(report_tx);

        // Returning drops `pollers`, which aborts every outstanding poll task.
        let mut forwarded = Coin::ZERO;
        loop {
            match timeout_at(deadline, report_rx.recv()).await {
                Err(_) => return Ok(Watch::TimedOut),
                Ok(None) => return Err(BatchError::WatcherStopped),
                Ok(Some(Err(e))) => return Err(BatchError::Forward(e)),
                Ok(Some(Ok(amount))) => {
                    forwarded += amount;
                    debug!(forwarded = %forwarded, target = %self.amount, "deposit forwarded");
                    if forwarded >= self.amount {
                        return Ok(Watch::Funded);
                    }
                }
            }
        }
    }

    /// Disbursing phase: fee bookkeeping, then jittered payouts.
    ///
    /// The fee is recorded as a pool self-payment so the ledger carries an
    /// explicit trace of it; it never reaches a recipient. The first
    /// failing payout aborts the rest; already-sent payouts stay sent.
    async fn disburse(&self, pool: &Account) -> Result<usize, BatchError> {
        if self.fee.is_positive() {
            pool.send(pool.address(), self.fee)
                .await
                .map_err(BatchError::Fee)?;
        }

        let net = self.amount - self.fee;
        let payouts = partition(net, self.recipients.len());

        let mut sent = 0;
        for (index, (recipient, payout)) in
            self.recipients.iter().zip(payouts).enumerate()
        {
            sleep((self.delay)(MAX_PAYOUT_JITTER)).await;
            pool.send(recipient, payout)
                .await
                .map_err(|source| BatchError::Payout {
                    index,
                    recipient: recipient.clone(),
                    source,
                })?;
            sent += 1;
        }
        Ok(sent)
    }
}

impl std::fmt::Debug for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch")
            .field("amount", &self.amount)
            .field("fee", &self.fee)
            .field("sources", &self.deposit_addresses())
            .field("recipients", &self.recipients.len())
            .field("state", &self.state)
            .finish()
    }
}
