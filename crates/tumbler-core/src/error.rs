//! Error types for the tumbler service.
use thiserror::Error;

use crate::address::Address;
use crate::coin::Coin;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinError {
    #[error("malformed amount: {0:?}")] Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("transport: {0}")] Transport(String),
    #[error("unexpected status {status} from {url}")] UnexpectedStatus { url: String, status: u16 },
    #[error("malformed record: {0}")] MalformedRecord(String),
    #[error("ledger call timed out")] Timeout,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("amount must be positive, got {0}")] InvalidAmount(Coin),
    #[error(transparent)] Ledger(#[from] LedgerError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("fee {fee} leaves nothing to disburse from {amount}")] FeeExceedsAmount { amount: Coin, fee: Coin },
    #[error("forwarding deposit to pool failed: {0}")] Forward(SendError),
    #[error("fee transfer to pool failed: {0}")] Fee(SendError),
    #[error("payout {index} to {recipient} failed: {source}")] Payout { index: usize, recipient: Address, source: SendError },
    #[error("deposit watcher stopped unexpectedly")] WatcherStopped,
    #[error("batch task panicked: {0}")] Task(String),
}

#[derive(Error, Debug)]
pub enum TumbleError {
    #[error(transparent)] Coin(#[from] CoinError),
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Send(#[from] SendError),
    #[error(transparent)] Batch(#[from] BatchError),
}
