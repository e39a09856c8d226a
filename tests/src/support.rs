//! Shared fixtures: fake collaborators and request helpers.

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mintpass_gateway::{
    create_router, AppState, Config, Error, MintReceipt, PassContract, WalletProvider,
};
use mintpass_types::AccountAddress;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Wallet service fake with switchable failure and a call counter.
pub struct FakeWallet {
    pub address: String,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl FakeWallet {
    pub fn new(address: &str) -> Arc<Self> {
        Arc::new(Self {
            address: address.into(),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn get_address(&self, _identity_token: &str) -> Result<AccountAddress, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Wallet("wallet service offline".into()));
        }
        Ok(AccountAddress::new(self.address.clone()))
    }
}

/// Pass contract fake. A successful mint bumps the held balance; read and
/// write failures toggle independently.
pub struct FakePassContract {
    pub balance: Mutex<u128>,
    pub fail_balance: AtomicBool,
    pub fail_mint: AtomicBool,
    pub mint_calls: AtomicUsize,
}

impl FakePassContract {
    pub fn with_balance(balance: u128) -> Arc<Self> {
        Arc::new(Self {
            balance: Mutex::new(balance),
            fail_balance: AtomicBool::new(false),
            fail_mint: AtomicBool::new(false),
            mint_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PassContract for FakePassContract {
    async fn balance_of(&self, _address: &AccountAddress) -> Result<u128, Error> {
        if self.fail_balance.load(Ordering::SeqCst) {
            return Err(Error::Rpc("balance query timed out".into()));
        }
        Ok(*self.balance.lock().unwrap())
    }

    async fn mint(
        &self,
        _receiver: &AccountAddress,
        _resource_uri: &str,
    ) -> Result<MintReceipt, Error> {
        self.mint_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mint.load(Ordering::SeqCst) {
            return Err(Error::Execution("Smart contract panicked: deposit too low".into()));
        }
        *self.balance.lock().unwrap() += 1;
        Ok(MintReceipt {
            tx_hash: "8xMintedPassTx".into(),
            explorer_url: "https://testnet.nearblocks.io/txns/8xMintedPassTx".into(),
        })
    }
}

/// Router wired to fake collaborators.
pub fn test_app(wallet: Arc<FakeWallet>, contract: Arc<FakePassContract>) -> Router {
    let state = Arc::new(AppState::with_collaborators(
        Config::default(),
        wallet,
        contract,
        "gateway.mintpass.testnet",
    ));
    create_router(state)
}

pub async fn get_json(app: &Router, path: &str) -> Result<(StatusCode, serde_json::Value)> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty())?)
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

pub async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> Result<(StatusCode, serde_json::Value)> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

pub async fn post_empty(app: &Router, path: &str) -> Result<(StatusCode, serde_json::Value)> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .body(Body::empty())?,
        )
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

/// A valid connect payload for `alice`.
pub fn connect_body() -> serde_json::Value {
    serde_json::json!({
        "method": "google",
        "name": "alice",
        "token": "session-token-1"
    })
}
