//! REST/JSON ledger client.
//!
//! The ledger exposes two endpoints: a GET returning every recorded
//! transaction and a POST accepting a new one. Every call carries a hard
//! timeout so a stalled ledger cannot wedge a batch past its own deadline.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use tumbler_core::error::LedgerError;
use tumbler_core::{Address, LedgerClient, Transaction};

/// Default bound on any single ledger call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoint and timeout settings for [`HttpLedger`].
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// GET endpoint listing all ledger transactions.
    pub transactions_url: String,
    /// POST endpoint accepting a new transaction.
    pub send_url: String,
    /// Hard per-call timeout.
    pub request_timeout: Duration,
}

impl LedgerConfig {
    /// Derive both endpoints from an API base URL.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            transactions_url: format!("{base}/api/transactions"),
            send_url: format!("{base}/api/send"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// HTTP-backed ledger client.
pub struct HttpLedger {
    client: reqwest::Client,
    config: LedgerConfig,
}

impl HttpLedger {
    /// Build a client from endpoint settings.
    ///
    /// The per-call timeout is baked into the underlying reqwest client.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }
}

fn transport_error(e: reqwest::Error) -> LedgerError {
    if e.is_timeout() {
        LedgerError::Timeout
    } else {
        LedgerError::Transport(e.to_string())
    }
}

#[async_trait]
impl LedgerClient for HttpLedger {
    async fn fetch_transactions(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let url = &self.config.transactions_url;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::UnexpectedStatus {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        // The ledger returns its full history; only records addressed to
        // the queried account are the caller's business.
        let all: Vec<Transaction> = response
            .json()
            .await
            .map_err(|e| LedgerError::MalformedRecord(e.to_string()))?;

        let incoming: Vec<Transaction> = all
            .into_iter()
            .filter(|txn| &txn.recipient == address)
            .collect();
        debug!(address = %address, count = incoming.len(), "fetched ledger records");
        Ok(incoming)
    }

    async fn submit_transaction(&self, txn: &Transaction) -> Result<(), LedgerError> {
        let url = &self.config.send_url;
        let response = self
            .client
            .post(url)
            .json(txn)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::UnexpectedStatus {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        debug!(source = %txn.source, recipient = %txn.recipient, amount = %txn.amount,
               "submitted transaction");
        Ok(())
    }
}
