// Collection directory - process-wide cache of the top collections by 24h
// volume, populated once on first use.

use crate::error::CoreError;
use crate::marketplace::MarketplaceClient;
use crate::models::Collection;
use log::info;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Number of collections held by the directory. Also the modulus for
/// next/previous paging, so link targets always land inside the cache.
pub const DIRECTORY_SIZE: usize = 20;

pub fn next_index(index: usize) -> usize {
    (index + 1) % DIRECTORY_SIZE
}

pub fn previous_index(index: usize) -> usize {
    (index + DIRECTORY_SIZE - 1) % DIRECTORY_SIZE
}

/// Lazily populated, never refreshed for the process lifetime. Concurrent
/// first callers share a single in-flight marketplace fetch; a failed fetch
/// leaves the cache empty so a later request retries.
pub struct CollectionDirectory {
    market: Arc<dyn MarketplaceClient>,
    cache: OnceCell<Vec<Collection>>,
}

impl CollectionDirectory {
    pub fn new(market: Arc<dyn MarketplaceClient>) -> Self {
        Self {
            market,
            cache: OnceCell::new(),
        }
    }

    async fn collections(&self) -> Result<&Vec<Collection>, CoreError> {
        self.cache
            .get_or_try_init(|| async {
                info!(
                    "populating collection directory (top {} by 24h volume)",
                    DIRECTORY_SIZE
                );
                self.market.collections_by_24h_volume(DIRECTORY_SIZE).await
            })
            .await
    }

    /// Collection at `index`, or `None` when the index is outside the
    /// populated range.
    pub async fn get(&self, index: usize) -> Result<Option<Collection>, CoreError> {
        Ok(self.collections().await?.get(index).cloned())
    }

    /// Slug resolution goes through the marketplace's own search, not the
    /// cache.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Collection>, CoreError> {
        self.market.find_collection_by_slug(slug).await
    }
}
