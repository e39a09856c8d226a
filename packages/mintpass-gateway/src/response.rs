//! Response types for the gateway API.

use mintpass_types::{ActionOutcome, GateDecision};
use serde::Serialize;

use crate::session::Session;

/// The balance-gated view model served to the UI.
#[derive(Serialize)]
pub struct SessionResponse {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_as_of: Option<u64>,
    /// Absent until the provider, address, and a reading all exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateDecision>,
    /// Login options offered while disconnected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_options: Option<Vec<String>>,
    /// Actions currently available to the user.
    pub actions: Vec<&'static str>,
}

impl SessionResponse {
    pub fn from_session(session: &Session, login_methods: &[String]) -> Self {
        if !session.is_connected() {
            return Self {
                connected: false,
                name: None,
                address: None,
                balance: None,
                balance_as_of: None,
                gate: None,
                login_options: Some(login_methods.to_vec()),
                actions: Vec::new(),
            };
        }

        let gate = session.gate();
        let actions = match gate {
            Some(GateDecision::Remedial) => vec!["mint", "disconnect"],
            _ => vec!["disconnect"],
        };

        Self {
            connected: true,
            name: session.identity().map(|i| i.name.clone()),
            address: session.address().map(|a| a.to_string()),
            balance: session.balance().map(|b| b.value.to_string()),
            balance_as_of: session.balance().map(|b| b.as_of),
            gate,
            login_options: None,
            actions,
        }
    }
}

/// Response from the mint endpoint.
#[derive(Serialize)]
pub struct MintResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    /// User-visible notification line for the UI to surface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MintResponse {
    pub fn ok(outcome: ActionOutcome) -> Self {
        Self {
            success: outcome.success,
            notification: Some(format!("Pass minted — verify at {}", outcome.explorer_url)),
            explorer_url: Some(outcome.explorer_url),
            reference: Some(outcome.reference),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            reference: None,
            explorer_url: None,
            notification: None,
            error: Some(error.into()),
        }
    }
}

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub network: String,
    pub sponsor_account: String,
    pub pass_contract: String,
    pub uptime_secs: u64,
    pub requests: u64,
    pub active_rpc: String,
    pub failovers: u64,
    pub rpc_status: &'static str,
    pub session_connected: bool,
}
