//! # tumbler-ledger — concrete [`LedgerClient`] implementations.
//!
//! - [`http`] — REST/JSON client over a fixed pair of ledger endpoints
//! - [`memory`] — in-memory ledger for tests and local dry runs
//!
//! [`LedgerClient`]: tumbler_core::LedgerClient

pub mod http;
pub mod memory;

// Re-exports for convenient access
pub use http::{HttpLedger, LedgerConfig};
pub use memory::MemoryLedger;
