// Marketplace abstraction - the Tensor REST API seen through a trait so the
// directory, action builder, and assembler can be exercised against mocks

use crate::error::CoreError;
use crate::models::{Collection, Mint};
use async_trait::async_trait;

/// Result type for marketplace operations
pub type ApiResult<T> = Result<T, CoreError>;

/// Parameters for the marketplace collection-bid transaction builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionBidParams {
    pub owner_address: String,
    /// Bid price in SOL, as entered by the user.
    pub price_sol: f64,
    pub quantity: u32,
    pub collection_id: String,
    pub latest_blockhash: String,
}

/// Parameters for the marketplace buy transaction builder.
#[derive(Debug, Clone, PartialEq)]
pub struct NftBuyParams {
    pub mint_address: String,
    /// Seller of the listing.
    pub owner_address: String,
    pub buyer_address: String,
    /// Total price in lamports including royalty and marketplace fee.
    pub price: f64,
    pub latest_blockhash: String,
}

#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    /// Top collections ranked by 24-hour volume, best first.
    async fn collections_by_24h_volume(&self, limit: usize) -> ApiResult<Vec<Collection>>;

    /// Resolve a human-readable slug through the marketplace's own search.
    async fn find_collection_by_slug(&self, slug: &str) -> ApiResult<Option<Collection>>;

    /// Active listings for a collection, cheapest first.
    async fn listings_by_collection(&self, coll_id: &str) -> ApiResult<Vec<Mint>>;

    /// Serialized collection-bid transaction, or `None` when the
    /// marketplace cannot produce one.
    async fn collection_bid_transaction(
        &self,
        params: CollectionBidParams,
    ) -> ApiResult<Option<String>>;

    /// Serialized buy transaction, or `None` when the marketplace cannot
    /// produce one.
    async fn nft_buy_transaction(&self, params: NftBuyParams) -> ApiResult<Option<String>>;
}
