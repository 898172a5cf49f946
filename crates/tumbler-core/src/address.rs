//! Ledger addresses and one-time deposit address derivation.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An opaque ledger address.
///
/// The ledger treats addresses as plain strings; any structure is the
/// ledger's business, not ours.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from its string form.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Derive `count` fresh single-use deposit addresses.
///
/// Each address is the hex-encoded SHA-256 of a timestamp+nonce prefix and
/// a per-address counter, so concurrent callers cannot collide and an
/// address betrays nothing about its owner.
pub fn one_time_addresses(count: usize) -> Vec<Address> {
    let unix_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let nonce: u64 = rand::thread_rng().r#gen();
    let prefix = format!("{unix_secs}-{nonce}");

    (0..count)
        .map(|i| {
            let digest = Sha256::digest(format!("{prefix}-{i}").as_bytes());
            Address(hex::encode(digest))
        })
        .collect()
}
