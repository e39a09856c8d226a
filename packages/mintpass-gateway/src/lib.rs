//! # MintPass Gateway
//!
//! A single-session gateway for balance-gated entry. A social login becomes
//! an Identity, the wallet service resolves its smart-account address, the
//! pass contract is read for the pass balance, and when the gate denies
//! entry the gateway sponsors an `nft_mint` with its own funded key.
//!
//! ## Quick Start
//! ```bash
//! cargo run --bin mintpass-gateway
//! ```
//!
//! ## Endpoints
//! - `GET /health` - Health check with RPC and session status
//! - `GET /metrics` - Prometheus metrics
//! - `GET /session` - The balance-gated view model
//! - `POST /session/connect` - Establish identity and run the pipeline
//! - `POST /session/disconnect` - Discard local session state
//! - `POST /session/mint` - The remedial mint action

pub mod config;
pub mod contract;
mod error;
mod handlers;
mod metrics;
mod middleware;
mod response;
mod router;
pub mod rpc;
pub mod session;
mod state;
pub mod wallet;

pub use config::Config;
pub use contract::{MintReceipt, PassContract};
pub use error::Error;
pub use router::create as create_router;
pub use state::AppState;
pub use wallet::WalletProvider;
