//! Pass contract collaborators: NEP-171 balance reads and sponsored mints.

use async_trait::async_trait;
use mintpass_types::AccountAddress;
use near_gas::NearGas;
use near_primitives::transaction::{Action, FunctionCallAction, Transaction, TransactionV0};
use near_primitives::types::AccountId;
use near_primitives::views::FinalExecutionStatus;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::rpc::RpcClient;

/// Confirmation of a sponsored mint: the transaction hash plus the link the
/// UI surfaces for external verification.
#[derive(Debug, Clone)]
pub struct MintReceipt {
    pub tx_hash: String,
    pub explorer_url: String,
}

/// Read and write access to the pass contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PassContract: Send + Sync {
    /// Number of passes held by `address`.
    async fn balance_of(&self, address: &AccountAddress) -> Result<u128, crate::Error>;

    /// Mint one pass for `receiver`, sponsored by the gateway key, and wait
    /// for commit-level finality. Single submission, no automatic retry.
    async fn mint(
        &self,
        receiver: &AccountAddress,
        resource_uri: &str,
    ) -> Result<MintReceipt, crate::Error>;
}

/// Production pass contract bound to a NEAR network.
pub struct NearPassContract {
    rpc: Arc<RpcClient>,
    signer: near_crypto::Signer,
    contract_id: AccountId,
    gas: NearGas,
    deposit: u128,
    explorer_base: String,
}

impl NearPassContract {
    pub fn new(
        rpc: Arc<RpcClient>,
        signer: near_crypto::Signer,
        config: &Config,
    ) -> Result<Self, crate::Error> {
        let contract_id: AccountId = config
            .pass_contract_id
            .parse()
            .map_err(|e| crate::Error::Config(format!("invalid pass contract id: {e}")))?;
        Ok(Self {
            rpc,
            signer,
            contract_id,
            gas: NearGas::from_tgas(config.gas_tgas),
            deposit: config.storage_deposit,
            explorer_base: config.explorer_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn sponsor_account(&self) -> AccountId {
        self.signer.get_account_id().clone()
    }
}

#[async_trait]
impl PassContract for NearPassContract {
    async fn balance_of(&self, address: &AccountAddress) -> Result<u128, crate::Error> {
        let args = serde_json::json!({ "account_id": address.as_str() });
        let bytes = self
            .rpc
            .call_view(&self.contract_id, "nft_supply_for_owner", args)
            .await?;
        let supply = parse_supply(&bytes)?;
        debug!(address = %address, supply, "Pass balance read");
        Ok(supply)
    }

    async fn mint(
        &self,
        receiver: &AccountAddress,
        resource_uri: &str,
    ) -> Result<MintReceipt, crate::Error> {
        let access_key = self
            .rpc
            .query_access_key(&self.sponsor_account(), &self.signer.public_key())
            .await?;
        let block_hash = self.rpc.latest_block_hash().await?;

        let actions = build_mint_actions(receiver, resource_uri, self.gas, self.deposit);
        let signed_tx = Transaction::V0(TransactionV0 {
            signer_id: self.signer.get_account_id().clone(),
            public_key: self.signer.public_key(),
            nonce: access_key.nonce + 1,
            receiver_id: self.contract_id.clone(),
            block_hash,
            actions,
        })
        .sign(&self.signer);

        let outcome = self.rpc.send_signed_tx(signed_tx).await?;
        let tx_hash = outcome.transaction_outcome.id.to_string();

        match &outcome.status {
            FinalExecutionStatus::SuccessValue(_) => {
                info!(tx_hash = %tx_hash, receiver = %receiver, "Mint confirmed");
                Ok(MintReceipt {
                    explorer_url: format!("{}/{tx_hash}", self.explorer_base),
                    tx_hash,
                })
            }
            FinalExecutionStatus::Failure(e) => {
                Err(crate::Error::Execution(format!("{e:?}")))
            }
            // broadcast_tx_commit waits for finality; anything else means the
            // transaction cannot be treated as confirmed.
            FinalExecutionStatus::Started | FinalExecutionStatus::NotStarted => Err(
                crate::Error::Execution(format!("transaction {tx_hash} not finalized")),
            ),
        }
    }
}

/// Build the function-call action for a sponsored pass mint.
fn build_mint_actions(
    receiver: &AccountAddress,
    resource_uri: &str,
    gas: NearGas,
    deposit: u128,
) -> Vec<Action> {
    let args = serde_json::to_vec(&serde_json::json!({
        "receiver_id": receiver.as_str(),
        "token_metadata": { "media": resource_uri },
    }))
    .unwrap_or_default();

    vec![Action::FunctionCall(Box::new(FunctionCallAction {
        method_name: "nft_mint".to_string(),
        args,
        gas: gas.as_gas(),
        deposit,
    }))]
}

/// Coerce the NEP-171 stringified U128 view result to a scalar.
fn parse_supply(bytes: &[u8]) -> Result<u128, crate::Error> {
    let text: String = serde_json::from_slice(bytes)
        .map_err(|e| crate::Error::Rpc(format!("malformed supply response: {e}")))?;
    text.parse::<u128>()
        .map_err(|e| crate::Error::Rpc(format!("non-numeric supply {text:?}: {e}")))
}
