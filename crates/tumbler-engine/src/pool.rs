//! Custodial pool address strategies.

use chrono::Utc;

use tumbler_core::Address;

/// Supplies the custodial address that batches funnel deposits into.
///
/// Implementations must be pure functions of wall-clock time (or constants)
/// so concurrent batches can call them without coordination.
pub trait PoolStrategy: Send + Sync {
    fn current_pool(&self) -> Address;
}

/// One pool address per clock hour.
///
/// Every batch active within the same UTC hour shares one custodial
/// account, so their forwarded deposits blend on the ledger.
#[derive(Clone, Copy, Debug, Default)]
pub struct HourlyPool;

impl PoolStrategy for HourlyPool {
    fn current_pool(&self) -> Address {
        Address::new(format!("pool-{}", Utc::now().format("%Y-%m-%d-%H")))
    }
}

/// A pinned pool address, for tests and operator overrides.
#[derive(Clone, Debug)]
pub struct FixedPool(pub Address);

impl PoolStrategy for FixedPool {
    fn current_pool(&self) -> Address {
        self.0.clone()
    }
}
