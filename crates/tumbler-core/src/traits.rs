//! Trait interfaces between the engine and the outside world.
//!
//! [`LedgerClient`] is the only seam the engine needs: both the HTTP-backed
//! client (tumbler-ledger) and in-memory test doubles implement it, so the
//! lifecycle engine never knows what transport it is talking over.

use async_trait::async_trait;

use crate::address::Address;
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Access to the external transaction ledger.
///
/// Implementations must be safe for concurrent use: one client handle is
/// shared by every poller and payout task in a mixer run. Neither method
/// retries; retry policy belongs to the caller's poll loop.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// All ledger records addressed **to** `address`, in no guaranteed order.
    async fn fetch_transactions(&self, address: &Address)
        -> Result<Vec<Transaction>, LedgerError>;

    /// Submit a transfer record to the ledger.
    async fn submit_transaction(&self, txn: &Transaction) -> Result<(), LedgerError>;
}
