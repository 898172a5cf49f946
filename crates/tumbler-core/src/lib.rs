//! # tumbler-core
//! Foundation types and traits for the tumbler mixing service.

pub mod address;
pub mod coin;
pub mod error;
pub mod traits;
pub mod transaction;

// Re-exports for convenient access
pub use address::Address;
pub use coin::Coin;
pub use error::{BatchError, CoinError, LedgerError, SendError, TumbleError};
pub use traits::LedgerClient;
pub use transaction::Transaction;
