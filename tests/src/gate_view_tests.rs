use crate::support::{connect_body, get_json, post_json, test_app, FakePassContract, FakeWallet};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn disconnected_view_lists_login_options_only() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(0);
    let app = test_app(wallet.clone(), contract.clone());

    let (status, body) = get_json(&app, "/session").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
    assert_eq!(body["login_options"], json!(["google", "twitter"]));
    assert_eq!(body["actions"], json!([]));
    assert!(body.get("balance").is_none());

    // No identity, so no collaborator is ever touched.
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 0);
    assert_eq!(contract.mint_calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn zero_balance_connect_yields_remedial_view() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(0);
    let app = test_app(wallet, contract);

    let (status, body) = post_json(&app, "/session/connect", connect_body()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert_eq!(body["name"], "alice");
    assert_eq!(body["address"], "alice.mintpass.testnet");
    assert_eq!(body["balance"], "0");
    assert_eq!(body["gate"], "remedial");
    assert_eq!(body["actions"], json!(["mint", "disconnect"]));
    Ok(())
}

#[tokio::test]
async fn positive_balance_connect_allows_entry() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(5);
    let app = test_app(wallet, contract);

    let (status, body) = post_json(&app, "/session/connect", connect_body()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gate"], "allow");
    assert_eq!(body["balance"], "5");
    // Entry granted: no mint offered.
    assert_eq!(body["actions"], json!(["disconnect"]));
    Ok(())
}

#[tokio::test]
async fn connect_rejects_empty_credentials() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(0);
    let app = test_app(wallet.clone(), contract);

    let (status, body) = post_json(
        &app,
        "/session/connect",
        json!({"method": "google", "name": "", "token": ""}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn connect_is_idempotent_and_resolves_once() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(1);
    let app = test_app(wallet.clone(), contract);

    let (_, first) = post_json(&app, "/session/connect", connect_body()).await?;
    let (_, second) = post_json(
        &app,
        "/session/connect",
        json!({"method": "twitter", "name": "impostor", "token": "other"}),
    )
    .await?;

    assert_eq!(first["name"], "alice");
    assert_eq!(second["name"], "alice");
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn wallet_failure_leaves_session_ungated() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    wallet.fail.store(true, Ordering::SeqCst);
    let contract = FakePassContract::with_balance(5);
    let app = test_app(wallet, contract);

    let (status, body) = post_json(&app, "/session/connect", connect_body()).await?;
    // Resolution failure is not a user-facing error; the view simply stays
    // address-absent and ungated.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert!(body.get("address").is_none());
    assert!(body.get("balance").is_none());
    assert!(body.get("gate").is_none());
    assert_eq!(body["actions"], json!(["disconnect"]));
    Ok(())
}

#[tokio::test]
async fn disconnect_returns_to_login_and_reconnect_resolves_again() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(1);
    let app = test_app(wallet.clone(), contract);

    post_json(&app, "/session/connect", connect_body()).await?;
    let (status, body) = crate::support::post_empty(&app, "/session/disconnect").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
    assert_eq!(body["login_options"], json!(["google", "twitter"]));

    post_json(&app, "/session/connect", connect_body()).await?;
    // A fresh session generation resolves the address anew.
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_login_method_is_rejected() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(0);
    let app = test_app(wallet.clone(), contract);

    let response = {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/session/connect")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"method": "myspace", "name": "a", "token": "t"}).to_string(),
                    ))?,
            )
            .await?
    };
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 0);
    Ok(())
}
