use crate::support::{
    connect_body, get_json, post_empty, post_json, test_app, FakePassContract, FakeWallet,
};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn mint_reports_one_outcome_with_reference_and_link() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(0);
    let app = test_app(wallet, contract.clone());

    post_json(&app, "/session/connect", connect_body()).await?;
    let (status, body) = post_empty(&app, "/session/mint").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["reference"], "8xMintedPassTx");
    assert!(body["explorer_url"]
        .as_str()
        .unwrap()
        .ends_with("8xMintedPassTx"));
    assert!(body["notification"]
        .as_str()
        .unwrap()
        .contains("nearblocks.io"));
    assert_eq!(contract.mint_calls.load(Ordering::SeqCst), 1);

    // The confirmed mint refreshes the reading and flips the gate.
    let (_, view) = get_json(&app, "/session").await?;
    assert_eq!(view["balance"], "1");
    assert_eq!(view["gate"], "allow");
    assert_eq!(view["actions"], json!(["disconnect"]));
    Ok(())
}

#[tokio::test]
async fn mint_without_a_session_is_a_conflict() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(0);
    let app = test_app(wallet, contract.clone());

    let (status, body) = post_empty(&app, "/session/mint").await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not ready"));
    assert_eq!(contract.mint_calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn mint_failure_propagates_to_the_caller() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(0);
    contract.fail_mint.store(true, Ordering::SeqCst);
    let app = test_app(wallet, contract.clone());

    post_json(&app, "/session/connect", connect_body()).await?;
    let (status, body) = post_empty(&app, "/session/mint").await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("execution failed"));
    assert_eq!(contract.mint_calls.load(Ordering::SeqCst), 1);

    // The session is untouched: still remedial, balance unchanged.
    let (_, view) = get_json(&app, "/session").await?;
    assert_eq!(view["balance"], "0");
    assert_eq!(view["gate"], "remedial");
    Ok(())
}

#[tokio::test]
async fn read_failure_after_mint_keeps_the_prior_reading() -> Result<()> {
    let wallet = FakeWallet::new("alice.mintpass.testnet");
    let contract = FakePassContract::with_balance(0);
    let app = test_app(wallet, contract.clone());

    post_json(&app, "/session/connect", connect_body()).await?;
    contract.fail_balance.store(true, Ordering::SeqCst);

    // The write path succeeds even though the follow-up read fails.
    let (status, body) = post_empty(&app, "/session/mint").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, view) = get_json(&app, "/session").await?;
    assert_eq!(view["balance"], "0");
    assert_eq!(view["gate"], "remedial");
    Ok(())
}
