//! Session lifecycle and the gated entry pipeline.
//!
//! The pipeline is a finite sequence of dependency-checked steps:
//! identity → provider handle → account address → balance reading → gate.
//! Each step runs only when its declared inputs are present, re-runs when
//! they change, and otherwise returns early. The caller serializes pipeline
//! runs (one session, one async mutex), so no step ever races another.

use mintpass_types::{
    evaluate, AccountAddress, ActionOutcome, BalanceReading, GateDecision, Identity,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::contract::PassContract;
use crate::metrics::METRICS;
use crate::wallet::WalletProvider;

/// Capability to talk to the chain/account layer, bound to one network.
///
/// Constructed once per identity generation; torn down on disconnect.
pub struct ProviderHandle {
    network: String,
    generation: u64,
    wallet: Arc<dyn WalletProvider>,
    contract: Arc<dyn PassContract>,
}

impl ProviderHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn network(&self) -> &str {
        &self.network
    }
}

/// The single in-memory session and its pipeline state.
pub struct Session {
    network: String,
    resource_uri: String,
    wallet: Arc<dyn WalletProvider>,
    contract: Arc<dyn PassContract>,

    identity: Option<Identity>,
    provider: Option<ProviderHandle>,
    address: Option<AccountAddress>,
    /// Provider generation the address was resolved under.
    address_generation: u64,
    balance: Option<BalanceReading>,
    generation: u64,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(
        network: impl Into<String>,
        resource_uri: impl Into<String>,
        wallet: Arc<dyn WalletProvider>,
        contract: Arc<dyn PassContract>,
    ) -> Self {
        Self {
            network: network.into(),
            resource_uri: resource_uri.into(),
            wallet,
            contract,
            identity: None,
            provider: None,
            address: None,
            address_generation: 0,
            balance: None,
            generation: 0,
            cancel: CancellationToken::new(),
        }
    }

    // --- Lifecycle ---

    /// Establish an identity and run the pipeline to completion.
    ///
    /// Idempotent while connected: a second connect does not replace the
    /// identity or construct a duplicate provider handle.
    pub async fn connect(&mut self, identity: Identity) {
        if self.identity.is_some() {
            debug!("Already connected, ignoring repeated connect");
            self.advance().await;
            return;
        }
        info!(name = %identity.name, method = %identity.method, "Identity connected");
        self.identity = Some(identity);
        self.advance().await;
    }

    /// Discard local session state. A pending chain transaction is not
    /// revoked; only local references are dropped.
    pub fn disconnect(&mut self) {
        if self.identity.is_none() {
            return;
        }
        info!("Session disconnected");
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.identity = None;
        self.provider = None;
        self.address = None;
        self.balance = None;
    }

    // --- Pipeline steps ---

    /// Run every step whose inputs are satisfied, in dependency order.
    pub async fn advance(&mut self) {
        self.initialize_provider();
        self.resolve_address().await;
        self.refresh_balance().await;
    }

    /// Step 1: construct the provider handle once an identity exists.
    fn initialize_provider(&mut self) {
        if self.identity.is_none() || self.provider.is_some() {
            return;
        }
        self.generation += 1;
        self.provider = Some(ProviderHandle {
            network: self.network.clone(),
            generation: self.generation,
            wallet: Arc::clone(&self.wallet),
            contract: Arc::clone(&self.contract),
        });
        info!(network = %self.network, generation = self.generation, "Provider handle initialized");
    }

    /// Step 2: resolve the account address, at most once per provider
    /// generation. On failure the session stays address-absent and the
    /// downstream steps do not run.
    async fn resolve_address(&mut self) {
        let Some(provider) = &self.provider else {
            return;
        };
        if self.address.is_some() && self.address_generation == provider.generation {
            return;
        }
        let Some(identity) = &self.identity else {
            return;
        };

        match provider.wallet.get_address(&identity.token).await {
            Ok(address) if !address.is_empty() => {
                info!(address = %address, "Account address resolved");
                self.address_generation = provider.generation;
                self.address = Some(address);
            }
            Ok(_) => warn!("Wallet returned an empty address, staying unresolved"),
            Err(e) => warn!(error = %e, "Address resolution failed"),
        }
    }

    /// Step 3: refresh the balance reading. Requires both the provider
    /// handle and the resolved address; any failure is logged and the
    /// previous reading is kept.
    async fn refresh_balance(&mut self) {
        let (Some(provider), Some(address)) = (&self.provider, &self.address) else {
            debug!("Skipping balance refresh, dependencies not ready");
            return;
        };

        METRICS.balance_reads_total.fetch_add(1, Ordering::Relaxed);
        match provider.contract.balance_of(address).await {
            Ok(value) => {
                debug!(value, "Balance reading refreshed");
                self.balance = Some(BalanceReading::now(value));
            }
            Err(e) => {
                METRICS.balance_read_errors.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Balance query failed, keeping previous reading");
            }
        }
    }

    /// Step 4: the gate. Evaluated only once the provider and address
    /// exist and a reading has been taken; pure otherwise.
    pub fn gate(&self) -> Option<GateDecision> {
        if self.provider.is_none() || self.address.is_none() {
            return None;
        }
        self.balance.as_ref().map(|b| evaluate(b.value))
    }

    /// Step 5: the remedial action. Submits one sponsored mint, awaits
    /// confirmation, and reports exactly one outcome. Errors propagate to
    /// the caller; there is no automatic retry.
    pub async fn execute_mint(&mut self) -> Result<ActionOutcome, crate::Error> {
        let Some(provider) = &self.provider else {
            return Err(crate::Error::NotReady("provider not initialized"));
        };
        let Some(address) = &self.address else {
            return Err(crate::Error::NotReady("account address not resolved"));
        };

        let receipt = provider
            .contract
            .mint(address, &self.resource_uri)
            .await?;
        let outcome = ActionOutcome::confirmed(receipt.tx_hash, receipt.explorer_url);
        info!(reference = %outcome.reference, "Remedial mint confirmed");

        // The reading is stale the moment the mint lands.
        self.refresh_balance().await;
        Ok(outcome)
    }

    // --- Accessors ---

    pub fn is_connected(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn provider(&self) -> Option<&ProviderHandle> {
        self.provider.as_ref()
    }

    pub fn address(&self) -> Option<&AccountAddress> {
        self.address.as_ref()
    }

    pub fn balance(&self) -> Option<&BalanceReading> {
        self.balance.as_ref()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
