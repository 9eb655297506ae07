// Native chain client wrapping solana_client::RpcClient

use crate::error::CoreError;
use crate::rpc_client::{ChainClient, RpcResult};
use async_trait::async_trait;
use log::debug;
use solana_client::rpc_client::RpcClient as SolanaRpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use std::sync::Arc;

/// Native chain client wrapping the blocking `solana_client::RpcClient`;
/// calls are moved onto the blocking pool.
pub struct NativeChainClient {
    client: Arc<SolanaRpcClient>,
}

impl NativeChainClient {
    /// Create a new native chain client
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Arc::new(SolanaRpcClient::new(endpoint)),
        }
    }

    /// Create from existing Arc<RpcClient>
    pub fn from_arc(client: Arc<SolanaRpcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChainClient for NativeChainClient {
    async fn latest_blockhash(&self) -> RpcResult<String> {
        debug!("Native RPC: get_latest_blockhash");

        let client = self.client.clone();
        let blockhash = tokio::task::spawn_blocking(move || client.get_latest_blockhash())
            .await
            .map_err(|e| CoreError::Rpc(format!("Task join error: {}", e)))?
            .map_err(|e| CoreError::Rpc(format!("get_latest_blockhash failed: {}", e)))?;

        Ok(blockhash.to_string())
    }

    async fn finalized_blockhash(&self) -> RpcResult<String> {
        debug!("Native RPC: get_latest_blockhash (finalized)");

        let client = self.client.clone();
        let (blockhash, _last_valid_height) = tokio::task::spawn_blocking(move || {
            client.get_latest_blockhash_with_commitment(CommitmentConfig::finalized())
        })
        .await
        .map_err(|e| CoreError::Rpc(format!("Task join error: {}", e)))?
        .map_err(|e| CoreError::Rpc(format!("get_latest_blockhash failed: {}", e)))?;

        Ok(blockhash.to_string())
    }
}
