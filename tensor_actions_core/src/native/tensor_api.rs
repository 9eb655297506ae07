// Native marketplace client for the Tensor REST API using reqwest

use crate::error::CoreError;
use crate::marketplace::{ApiResult, CollectionBidParams, MarketplaceClient, NftBuyParams};
use crate::models::{Collection, Mint};
use crate::settings::Settings;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const API_KEY_HEADER: &str = "x-tensor-api-key";

#[derive(Deserialize)]
struct CollectionsResponse {
    collections: Vec<Collection>,
}

#[derive(Deserialize)]
struct ListingsResponse {
    mints: Vec<Mint>,
}

#[derive(Deserialize)]
struct TxResponse {
    txs: Vec<TxEnvelope>,
}

#[derive(Deserialize)]
struct TxEnvelope {
    /// Base64-serialized transaction.
    tx: String,
}

/// Tensor REST API client.
pub struct TensorApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TensorApiClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.tensor_api_url.trim_end_matches('/').to_string(),
            api_key: settings.tensor_api_key.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        debug!("Tensor API GET {}", path);

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| CoreError::Api(format!("request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Api(format!("{} returned status {}", path, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CoreError::Api(format!("failed to decode {} response: {}", path, e)))
    }
}

#[async_trait]
impl MarketplaceClient for TensorApiClient {
    async fn collections_by_24h_volume(&self, limit: usize) -> ApiResult<Vec<Collection>> {
        let resp: CollectionsResponse = self
            .get_json(
                "/api/v1/collections",
                &[
                    ("sortBy", "volume24h".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(resp.collections)
    }

    async fn find_collection_by_slug(&self, slug: &str) -> ApiResult<Option<Collection>> {
        let resp: CollectionsResponse = self
            .get_json("/api/v1/collections", &[("slugs", slug.to_string())])
            .await?;
        Ok(resp.collections.into_iter().next())
    }

    async fn listings_by_collection(&self, coll_id: &str) -> ApiResult<Vec<Mint>> {
        let resp: ListingsResponse = self
            .get_json(
                "/api/v1/mints/collection",
                &[
                    ("collId", coll_id.to_string()),
                    ("sortBy", "ListingPriceAsc".to_string()),
                ],
            )
            .await?;
        Ok(resp.mints)
    }

    async fn collection_bid_transaction(
        &self,
        params: CollectionBidParams,
    ) -> ApiResult<Option<String>> {
        let resp: TxResponse = self
            .get_json(
                "/api/v1/tx/collection_bid",
                &[
                    ("owner", params.owner_address),
                    ("price", params.price_sol.to_string()),
                    ("quantity", params.quantity.to_string()),
                    ("collId", params.collection_id),
                    ("blockhash", params.latest_blockhash),
                ],
            )
            .await?;
        Ok(resp.txs.into_iter().next().map(|t| t.tx))
    }

    async fn nft_buy_transaction(&self, params: NftBuyParams) -> ApiResult<Option<String>> {
        let resp: TxResponse = self
            .get_json(
                "/api/v1/tx/buy",
                &[
                    ("buyer", params.buyer_address),
                    ("mint", params.mint_address),
                    ("owner", params.owner_address),
                    ("maxPrice", params.price.to_string()),
                    ("blockhash", params.latest_blockhash),
                ],
            )
            .await?;
        Ok(resp.txs.into_iter().next().map(|t| t.tx))
    }
}
