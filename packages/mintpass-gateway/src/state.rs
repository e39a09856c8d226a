//! Application state shared across handlers.

use near_crypto::{InMemorySigner, SecretKey, Signer};
use std::str::FromStr;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::Config;
use crate::contract::{NearPassContract, PassContract};
use crate::rpc::RpcClient;
use crate::session::Session;
use crate::wallet::{WalletClient, WalletProvider};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub rpc: Arc<RpcClient>,
    pub session: Mutex<Session>,
    pub sponsor_account: String,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create application state with production collaborators.
    pub fn new(config: Config) -> Result<Self, crate::Error> {
        let signer = load_sponsor_signer(&config)?;
        let rpc = Arc::new(RpcClient::new(&config.rpc_url, &config.fallback_rpc_url));

        let sponsor_account = signer.get_account_id().to_string();
        info!(account = %sponsor_account, "Loaded gateway sponsoring key");

        let wallet: Arc<dyn WalletProvider> = Arc::new(WalletClient::from_config(&config));
        let contract: Arc<dyn PassContract> =
            Arc::new(NearPassContract::new(Arc::clone(&rpc), signer, &config)?);

        Ok(Self::assemble(config, rpc, wallet, contract, sponsor_account))
    }

    /// Create application state around injected collaborators. Used by the
    /// integration tests, which fake the wallet and the pass contract.
    pub fn with_collaborators(
        config: Config,
        wallet: Arc<dyn WalletProvider>,
        contract: Arc<dyn PassContract>,
        sponsor_account: impl Into<String>,
    ) -> Self {
        let rpc = Arc::new(RpcClient::new(&config.rpc_url, &config.fallback_rpc_url));
        Self::assemble(config, rpc, wallet, contract, sponsor_account.into())
    }

    fn assemble(
        config: Config,
        rpc: Arc<RpcClient>,
        wallet: Arc<dyn WalletProvider>,
        contract: Arc<dyn PassContract>,
        sponsor_account: String,
    ) -> Self {
        let session = Session::new(
            config.network.clone(),
            config.resource_uri.clone(),
            wallet,
            contract,
        );
        Self {
            config,
            rpc,
            session: Mutex::new(session),
            sponsor_account,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }
}

/// Load the sponsoring key from `GATEWAY_KEYS_JSON` or the configured file.
fn load_sponsor_signer(config: &Config) -> Result<Signer, crate::Error> {
    if let Ok(keys_json) = std::env::var("GATEWAY_KEYS_JSON") {
        return parse_keys_json(&keys_json);
    }
    let contents = std::fs::read_to_string(&config.keys_path)
        .map_err(|e| crate::Error::Config(format!("failed to read {}: {e}", config.keys_path)))?;
    parse_keys_json(&contents)
}

/// Parse keys JSON in the near-cli format:
/// `[{"account_id": "...", "public_key": "...", "secret_key": "..."}]`
fn parse_keys_json(json: &str) -> Result<Signer, crate::Error> {
    #[derive(serde::Deserialize)]
    struct KeyFile {
        account_id: String,
        #[serde(alias = "private_key")]
        secret_key: String,
    }

    // Accept both the bare object and the near-cli array form.
    let key: KeyFile = if json.trim().starts_with('[') {
        let keys: Vec<KeyFile> = serde_json::from_str(json)
            .map_err(|e| crate::Error::Config(format!("Invalid key JSON: {e}")))?;
        keys.into_iter()
            .next()
            .ok_or_else(|| crate::Error::Config("Empty key array".to_string()))?
    } else {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::Config(format!("Invalid key JSON: {e}")))?
    };

    let secret_key = SecretKey::from_str(&key.secret_key)
        .map_err(|e| crate::Error::Config(format!("Invalid secret key: {e}")))?;

    Ok(InMemorySigner::from_secret_key(
        key.account_id
            .parse()
            .map_err(|e| crate::Error::Config(format!("Invalid account: {e}")))?,
        secret_key,
    ))
}
