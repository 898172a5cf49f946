//! A ledger identity bound to a client handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use tumbler_core::error::{LedgerError, SendError};
use tumbler_core::{Address, Coin, LedgerClient, Transaction};

/// An address plus the two ledger operations bound to it.
///
/// Cloning is cheap (the client handle is shared), and one account may be
/// read by many concurrent pollers.
#[derive(Clone)]
pub struct Account {
    address: Address,
    ledger: Arc<dyn LedgerClient>,
}

impl Account {
    pub fn new(address: Address, ledger: Arc<dyn LedgerClient>) -> Self {
        Self { address, ledger }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Incoming transactions recorded strictly after `cutoff`.
    ///
    /// Read-only; a transport failure is returned as-is. Retry policy
    /// belongs to the caller's poll loop.
    pub async fn fetch_incoming(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let incoming = self.ledger.fetch_transactions(&self.address).await?;
        Ok(incoming
            .into_iter()
            .filter(|txn| txn.timestamp > cutoff)
            .collect())
    }

    /// Transfer `amount` from this account to `recipient`.
    ///
    /// Rejects non-positive amounts locally without touching the ledger.
    pub async fn send(&self, recipient: &Address, amount: Coin) -> Result<(), SendError> {
        if !amount.is_positive() {
            return Err(SendError::InvalidAmount(amount));
        }

        let txn = Transaction::now(self.address.clone(), recipient.clone(), amount);
        self.ledger.submit_transaction(&txn).await?;
        info!(from = %self.address, to = %recipient, amount = %amount, "sent");
        Ok(())
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account").field("address", &self.address).finish()
    }
}
