//! End-to-end test suite for the tumbler service.
//!
//! The tests in `tests/` run complete mixing lifecycles against the
//! in-memory ledger: deposit, forward, fee, partitioned payouts; and
//! verify money conservation across concurrent batches.

pub mod helpers;
