use serde::{Serialize, Serializer};
use std::time::{SystemTime, UNIX_EPOCH};

/// A point-in-time pass balance for an account address.
///
/// Refreshed whenever identity, provider, or address change; a failed
/// refresh leaves the previous reading in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReading {
    /// Token count, already coerced from the contract's stringified U128.
    #[serde(serialize_with = "u128_as_string")]
    pub value: u128,
    /// Unix seconds at which the reading was taken.
    pub as_of: u64,
}

impl BalanceReading {
    /// A reading stamped with the current wall clock.
    pub fn now(value: u128) -> Self {
        let as_of = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self { value, as_of }
    }
}

// U128 balances exceed the integer range JSON consumers can hold; keep the
// NEP-171 string convention on the wire.
fn u128_as_string<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}
