use serde::{Deserialize, Serialize};

/// Outcome of the balance gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateDecision {
    /// The user holds at least one pass and may enter.
    Allow,
    /// The user holds no pass and must mint one first.
    Remedial,
}

/// Pure gate decision: entry requires a strictly positive pass balance.
///
/// No side effects, no hysteresis; callers re-evaluate on every new
/// reading. Balances are unsigned, so anything that is not positive is
/// exactly zero.
pub fn evaluate(balance: u128) -> GateDecision {
    if balance > 0 {
        GateDecision::Allow
    } else {
        GateDecision::Remedial
    }
}
