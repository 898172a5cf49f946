//! Runs a collection of batches concurrently.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info};

use tumbler_core::error::BatchError;
use tumbler_core::{Address, LedgerClient};

use crate::account::Account;
use crate::batch::{Batch, BatchOutcome};
use crate::pool::PoolStrategy;

/// The terminal state of one batch in a mixer run.
#[derive(Debug)]
pub struct BatchResult {
    /// The batch's deposit addresses, identifying the originating request.
    pub deposit_addresses: Vec<Address>,
    /// Completed, timed out, or the error that aborted disbursement.
    pub outcome: Result<BatchOutcome, BatchError>,
}

/// Orchestrates concurrent batches sharing one pool epoch.
///
/// The pool strategy and ledger handle are injected at construction; the
/// mixer holds no global state, and batches never share mutable memory.
pub struct Mixer {
    batches: Vec<Batch>,
    strategy: Arc<dyn PoolStrategy>,
    ledger: Arc<dyn LedgerClient>,
}

impl Mixer {
    pub fn new(
        batches: Vec<Batch>,
        strategy: Arc<dyn PoolStrategy>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        Self {
            batches,
            strategy,
            ledger,
        }
    }

    /// Run every batch to a terminal state and collect their results.
    ///
    /// The pool account is resolved once, so all batches in this run share
    /// the same custodial address. Batches fail independently: one batch's
    /// error (or panic) never disturbs its siblings, and there is no
    /// cross-batch ordering guarantee. Results come back in completion
    /// order.
    pub async fn run(self) -> Vec<BatchResult> {
        let pool = Arc::new(Account::new(self.strategy.current_pool(), self.ledger));
        info!(pool = %pool.address(), batches = self.batches.len(), "mixer starting");

        let mut tasks = JoinSet::new();
        for batch in self.batches {
            let pool = Arc::clone(&pool);
            let deposit_addresses = batch.deposit_addresses();
            tasks.spawn(async move {
                let outcome = batch.run(&pool).await;
                BatchResult {
                    deposit_addresses,
                    outcome,
                }
            });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    error!(error = %e, "batch task panicked");
                    BatchResult {
                        deposit_addresses: Vec::new(),
                        outcome: Err(BatchError::Task(e.to_string())),
                    }
                }
            };
            if let Err(e) = &result.outcome {
                error!(deposit = ?result.deposit_addresses, error = %e, "batch failed");
            }
            results.push(result);
        }
        info!(batches = results.len(), "mixer finished");
        results
    }
}
