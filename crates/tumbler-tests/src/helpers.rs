//! Shared builders for the end-to-end tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};

use tumbler_core::{Address, Coin, LedgerClient};
use tumbler_engine::{Account, Batch};
use tumbler_ledger::MemoryLedger;

/// Minor-unit shorthand.
pub fn coin(units: i64) -> Coin {
    Coin::from_minor_units(units)
}

/// An account on the shared in-memory ledger.
pub fn account(ledger: &Arc<MemoryLedger>, address: &str) -> Account {
    Account::new(
        Address::new(address),
        ledger.clone() as Arc<dyn LedgerClient>,
    )
}

/// A fast test batch: 10 ms polls, zero payout jitter, 3 s watch window.
pub fn fast_batch(
    ledger: &Arc<MemoryLedger>,
    amount: i64,
    fee: i64,
    deposit: &str,
    recipients: &[&str],
) -> Batch {
    Batch::new(
        coin(amount),
        coin(fee),
        vec![account(ledger, deposit)],
        recipients.iter().map(|r| Address::new(*r)).collect(),
        Duration::from_secs(3),
    )
    .expect("valid test batch")
    .with_poll_interval(Duration::from_millis(10))
    .with_delay(|_| Duration::ZERO)
}

/// Record a user deposit stamped just after "now" so a freshly created
/// batch's watch window picks it up.
pub fn seed_deposit(ledger: &MemoryLedger, from: &str, to: &str, units: i64) {
    ledger.deposit(
        Utc::now() + TimeDelta::milliseconds(1),
        from,
        to,
        coin(units),
    );
}
