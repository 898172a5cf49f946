//! In-memory ledger.
//!
//! Behaves like the real service minus the wire: `submit` appends to a
//! shared record list, `fetch` filters by recipient. Used by the engine's
//! tests, the end-to-end suite, and `--dry-run` CLI invocations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use tumbler_core::error::LedgerError;
use tumbler_core::{Address, Coin, LedgerClient, Transaction};

/// A ledger that lives entirely in process memory.
///
/// Safe for concurrent use, like the real client; all state sits behind one
/// mutex held only for the duration of a copy.
#[derive(Default)]
pub struct MemoryLedger {
    records: Mutex<Vec<Transaction>>,
    /// When set, every `submit_transaction` call fails with this error.
    fail_submits: Mutex<Option<LedgerError>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a deposit record dated `timestamp`, bypassing submission.
    pub fn deposit(
        &self,
        timestamp: DateTime<Utc>,
        source: impl Into<Address>,
        recipient: impl Into<Address>,
        amount: Coin,
    ) {
        self.records.lock().push(Transaction {
            timestamp,
            source: source.into(),
            recipient: recipient.into(),
            amount,
        });
    }

    /// Snapshot of every record in submission order.
    pub fn records(&self) -> Vec<Transaction> {
        self.records.lock().clone()
    }

    /// Records paid out of `source`, in submission order.
    pub fn sent_by(&self, source: &Address) -> Vec<Transaction> {
        self.records
            .lock()
            .iter()
            .filter(|txn| &txn.source == source)
            .cloned()
            .collect()
    }

    /// Make all subsequent submissions fail with `error`.
    pub fn fail_submissions_with(&self, error: LedgerError) {
        *self.fail_submits.lock() = Some(error);
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn fetch_transactions(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|txn| &txn.recipient == address)
            .cloned()
            .collect())
    }

    async fn submit_transaction(&self, txn: &Transaction) -> Result<(), LedgerError> {
        if let Some(error) = self.fail_submits.lock().clone() {
            return Err(error);
        }
        self.records.lock().push(txn.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_returns_only_records_addressed_to_the_account() {
        let ledger = MemoryLedger::new();
        ledger.deposit(Utc::now(), "alice", "bob", Coin::from_minor_units(100));
        ledger.deposit(Utc::now(), "alice", "carol", Coin::from_minor_units(200));

        let bob = Address::new("bob");
        let records = ledger.fetch_transactions(&bob).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, Coin::from_minor_units(100));
    }

    #[tokio::test]
    async fn submissions_append_and_can_be_forced_to_fail() {
        let ledger = MemoryLedger::new();
        let txn = Transaction::now(
            Address::new("alice"),
            Address::new("bob"),
            Coin::from_minor_units(50),
        );
        ledger.submit_transaction(&txn).await.unwrap();
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.sent_by(&Address::new("alice")).len(), 1);

        ledger.fail_submissions_with(LedgerError::Timeout);
        assert_eq!(
            ledger.submit_transaction(&txn).await,
            Err(LedgerError::Timeout)
        );
        assert_eq!(ledger.records().len(), 1);
    }
}
