//! # tumbler-engine — the batch lifecycle engine.
//!
//! Owns everything between "a deposit address exists" and "the payouts are
//! on the ledger": concurrent deposit polling, forwarding into the pool,
//! randomized payout partitioning, and the orchestrator that runs many
//! batches at once.
//!
//! # Modules
//!
//! - [`account`] — a ledger identity plus its two ledger operations
//! - [`partition`] — the randomized sum-preserving payout splitter
//! - [`batch`] — the Watching → Funded → Disbursing state machine
//! - [`mixer`] — runs a set of batches concurrently
//! - [`pool`] — custodial pool address strategies

pub mod account;
pub mod batch;
pub mod mixer;
pub mod partition;
pub mod pool;

// Re-exports for convenient access
pub use account::Account;
pub use batch::{Batch, BatchOutcome, BatchState};
pub use mixer::{BatchResult, Mixer};
pub use partition::{partition, partition_with};
pub use pool::{FixedPool, HourlyPool, PoolStrategy};
