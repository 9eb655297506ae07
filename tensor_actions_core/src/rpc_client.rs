// Chain RPC abstraction - keeps transaction assembly testable without a validator

use crate::error::CoreError;
use async_trait::async_trait;

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, CoreError>;

/// Minimal view of the chain RPC needed to bind transactions to a recent
/// blockhash.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Latest blockhash at the client's default commitment.
    async fn latest_blockhash(&self) -> RpcResult<String>;

    /// Latest blockhash at finalized commitment; slower, but the returned
    /// hash cannot be orphaned while the caller's wallet reviews the
    /// transaction.
    async fn finalized_blockhash(&self) -> RpcResult<String>;
}
