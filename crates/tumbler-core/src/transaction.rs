//! The ledger's transaction record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::coin::Coin;

/// A single transfer as recorded by the ledger.
///
/// Produced only by ledger clients; read-only to the engine. The wire
/// format carries the amount as a decimal string (see [`Coin`]'s serde
/// impls) and camelCase address fields.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// When the ledger recorded the transfer.
    pub timestamp: DateTime<Utc>,
    /// Paying address.
    #[serde(rename = "fromAddress")]
    pub source: Address,
    /// Receiving address.
    #[serde(rename = "toAddress")]
    pub recipient: Address,
    /// Transferred amount.
    pub amount: Coin,
}

impl Transaction {
    /// Build a record stamped with the current time.
    pub fn now(source: Address, recipient: Address, amount: Coin) -> Self {
        Self {
            timestamp: Utc::now(),
            source,
            recipient,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_camel_case_and_string_amounts() {
        let json = r#"{
            "timestamp": "2026-08-26T12:00:00Z",
            "fromAddress": "alice",
            "toAddress": "bob",
            "amount": "50.25"
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.source, Address::new("alice"));
        assert_eq!(txn.recipient, Address::new("bob"));
        assert_eq!(txn.amount, Coin::from_minor_units(5025));

        let encoded = serde_json::to_value(&txn).unwrap();
        assert_eq!(encoded["fromAddress"], "alice");
        assert_eq!(encoded["amount"], "50.25");
    }
}
