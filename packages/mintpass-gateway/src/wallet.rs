//! Smart-wallet service client.
//!
//! The wallet collaborator owns account abstraction entirely: given an
//! identity token it answers with the counterfactual smart-account address
//! for the configured policy. The gateway never derives or validates
//! addresses itself.

use async_trait::async_trait;
use mintpass_types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;

/// Resolves an account address for an authenticated identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn get_address(&self, identity_token: &str) -> Result<AccountAddress, crate::Error>;
}

/// Opaque credential triple for the wallet service.
#[derive(Clone, Serialize)]
pub struct WalletCredentials {
    pub project_id: String,
    pub client_key: String,
    pub app_id: String,
}

impl fmt::Debug for WalletCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletCredentials")
            .field("project_id", &self.project_id)
            .field("client_key", &"<redacted>")
            .field("app_id", &self.app_id)
            .finish()
    }
}

/// HTTP-backed wallet service client.
pub struct WalletClient {
    http: reqwest::Client,
    base_url: String,
    credentials: WalletCredentials,
    account_policy: String,
    network: String,
}

#[derive(Serialize)]
struct ResolveRequest<'a> {
    #[serde(flatten)]
    credentials: &'a WalletCredentials,
    account_policy: &'a str,
    network: &'a str,
    token: &'a str,
}

#[derive(Deserialize)]
struct ResolveResponse {
    address: String,
}

impl WalletClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.wallet_service_url.trim_end_matches('/').to_string(),
            credentials: WalletCredentials {
                project_id: config.project_id.clone(),
                client_key: config.client_key.clone(),
                app_id: config.app_id.clone(),
            },
            account_policy: config.account_policy.clone(),
            network: config.network.clone(),
        }
    }
}

#[async_trait]
impl WalletProvider for WalletClient {
    async fn get_address(&self, identity_token: &str) -> Result<AccountAddress, crate::Error> {
        let url = format!("{}/accounts/resolve", self.base_url);
        let body = ResolveRequest {
            credentials: &self.credentials,
            account_policy: &self.account_policy,
            network: &self.network,
            token: identity_token,
        };

        let resp: ResolveResponse = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| crate::Error::Wallet(format!("resolve request failed: {e}")))?
            .error_for_status()
            .map_err(|e| crate::Error::Wallet(format!("resolve rejected: {e}")))?
            .json()
            .await
            .map_err(|e| crate::Error::Wallet(format!("malformed resolve response: {e}")))?;

        if resp.address.is_empty() {
            return Err(crate::Error::Wallet("empty address in response".into()));
        }
        Ok(AccountAddress::new(resp.address))
    }
}
