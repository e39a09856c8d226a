//! Gateway configuration.

use serde::Deserialize;

/// Configuration for the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::network")]
    pub network: String,

    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::fallback_rpc_url")]
    pub fallback_rpc_url: String,

    /// NEP-171 contract holding the entry passes.
    #[serde(default = "defaults::pass_contract_id")]
    pub pass_contract_id: String,

    /// Smart-wallet service that maps identity tokens to account addresses.
    #[serde(default = "defaults::wallet_service_url")]
    pub wallet_service_url: String,

    /// Account policy forwarded to the wallet service.
    #[serde(default = "defaults::account_policy")]
    pub account_policy: String,

    /// Metadata URI minted into remedial passes.
    #[serde(default = "defaults::resource_uri")]
    pub resource_uri: String,

    /// Base URL for transaction links shown to the user.
    #[serde(default = "defaults::explorer_url")]
    pub explorer_url: String,

    #[serde(default = "defaults::keys_path")]
    pub keys_path: String,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    #[serde(default = "defaults::gas_tgas")]
    pub gas_tgas: u64,

    /// Attached deposit for `nft_mint`, in yoctoNEAR.
    #[serde(default = "defaults::storage_deposit")]
    pub storage_deposit: u128,

    /// Login options surfaced while disconnected.
    #[serde(default = "defaults::login_methods")]
    pub login_methods: Vec<String>,

    // Wallet-service credentials. The gateway never validates their content;
    // a misconfigured value surfaces as the wallet service's own error.
    #[serde(default = "defaults::project_id")]
    pub project_id: String,

    #[serde(default = "defaults::client_key")]
    pub client_key: String,

    #[serde(default = "defaults::app_id")]
    pub app_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: defaults::network(),
            rpc_url: defaults::rpc_url(),
            fallback_rpc_url: defaults::fallback_rpc_url(),
            pass_contract_id: defaults::pass_contract_id(),
            wallet_service_url: defaults::wallet_service_url(),
            account_policy: defaults::account_policy(),
            resource_uri: defaults::resource_uri(),
            explorer_url: defaults::explorer_url(),
            keys_path: defaults::keys_path(),
            bind_address: defaults::bind_address(),
            gas_tgas: defaults::gas_tgas(),
            storage_deposit: defaults::storage_deposit(),
            login_methods: defaults::login_methods(),
            project_id: defaults::project_id(),
            client_key: defaults::client_key(),
            app_id: defaults::app_id(),
        }
    }
}

mod defaults {
    pub fn network() -> String {
        std::env::var("GATEWAY_NETWORK")
            .or_else(|_| std::env::var("NEAR_NETWORK"))
            .unwrap_or_else(|_| "testnet".into())
    }

    pub fn rpc_url() -> String {
        if let Ok(url) = std::env::var("GATEWAY_RPC_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        if network().contains("mainnet") {
            "https://near.lava.build".into()
        } else {
            "https://neart.lava.build".into()
        }
    }

    pub fn fallback_rpc_url() -> String {
        if network().contains("mainnet") {
            "https://free.rpc.fastnear.com".into()
        } else {
            "https://test.rpc.fastnear.com".into()
        }
    }

    pub fn pass_contract_id() -> String {
        "pass.mintpass.testnet".into()
    }

    pub fn wallet_service_url() -> String {
        "http://127.0.0.1:4337".into()
    }

    pub fn account_policy() -> String {
        "SIMPLE".into()
    }

    pub fn resource_uri() -> String {
        "https://ipfs.filebase.io/ipfs/QmYg7RLt2i43hLKmcXMHzYDcocNpjeXPjTxJabn7f2ETxM".into()
    }

    pub fn explorer_url() -> String {
        if network().contains("mainnet") {
            "https://nearblocks.io/txns".into()
        } else {
            "https://testnet.nearblocks.io/txns".into()
        }
    }

    pub fn keys_path() -> String {
        "./account_keys/gateway.mintpass.testnet.json".into()
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3050".into()
    }

    pub fn gas_tgas() -> u64 {
        100
    }

    pub fn storage_deposit() -> u128 {
        // 0.01 NEAR covers pass token storage on testnet and mainnet.
        10_000_000_000_000_000_000_000
    }

    pub fn login_methods() -> Vec<String> {
        vec!["google".into(), "twitter".into()]
    }

    // Absent credentials fall back to a literal placeholder instead of
    // failing fast; the wallet service rejects them on first use.
    fn credential(var: &str) -> String {
        std::env::var(var)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "undefined".into())
    }

    pub fn project_id() -> String {
        credential("GATEWAY_PROJECT_ID")
    }

    pub fn client_key() -> String {
        credential("GATEWAY_CLIENT_KEY")
    }

    pub fn app_id() -> String {
        credential("GATEWAY_APP_ID")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.bind_address, "0.0.0.0:3050");
        assert_eq!(config.gas_tgas, 100);
        assert_eq!(config.account_policy, "SIMPLE");
        assert_eq!(config.login_methods, vec!["google", "twitter"]);
        assert!(config.resource_uri.starts_with("https://ipfs."));
        assert!(config.storage_deposit > 0);
    }

    #[test]
    fn explorer_matches_network() {
        let config = Config::default();
        if config.network.contains("mainnet") {
            assert!(!config.explorer_url.contains("testnet"));
        } else {
            assert!(config.explorer_url.contains("testnet"));
        }
    }
}
