//! Error types for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

/// Gateway error type.
///
/// Read-path failures (balance queries) are caught inside the session
/// pipeline and never reach this surface; everything here is either a
/// configuration problem or a write-path failure that propagates to the
/// caller for display.
#[derive(Debug)]
pub enum Error {
    /// Configuration error.
    Config(String),
    /// RPC communication error.
    Rpc(String),
    /// Wallet service error.
    Wallet(String),
    /// A pipeline dependency (provider, address) is not initialized yet.
    NotReady(&'static str),
    /// The transaction executed and failed on chain.
    Execution(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Rpc(_) | Error::Wallet(_) => StatusCode::BAD_GATEWAY,
            Error::NotReady(_) => StatusCode::CONFLICT,
            Error::Execution(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
            Error::Wallet(msg) => write!(f, "wallet service error: {msg}"),
            Error::NotReady(what) => write!(f, "not ready: {what}"),
            Error::Execution(msg) => write!(f, "execution failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "success": false,
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}
