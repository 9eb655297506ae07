// Solana Actions wire shapes and the explore action response builder.

use crate::directory::{next_index, previous_index};
use crate::error::CoreError;
use crate::fees::total_price;
use crate::format::{format_token_amount, lamports_to_sol};
use crate::icon::icon_url;
use crate::marketplace::MarketplaceClient;
use crate::models::Collection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ACTION_DESCRIPTION: &str = "Explore NFTs on Tensor";
pub const EXPLORE_BASE_PATH: &str = "/api/tensor/explore";
pub const NO_LISTINGS_MESSAGE: &str = "Collection has no listed NFTs";

/// GET-shaped action descriptor rendered by wallets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionGetResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedAction {
    pub href: String,
    pub label: String,
    pub parameters: Vec<ActionParameter>,
}

impl LinkedAction {
    fn plain(href: String, label: &str) -> Self {
        Self {
            href,
            label: label.to_string(),
            parameters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionParameter {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// POST body common to every action endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPostRequest {
    pub account: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPostResponse {
    pub transaction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PostActionLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostActionLinks {
    pub next: NextAction,
}

/// Inline follow-up action chained onto a POST response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: ActionGetResponse,
}

impl NextAction {
    pub fn inline(action: ActionGetResponse) -> Self {
        Self {
            kind: "inline".to_string(),
            action,
        }
    }
}

/// Builds explore descriptors for a resolved collection.
pub struct ActionBuilder {
    market: Arc<dyn MarketplaceClient>,
    image_service_url: String,
}

impl ActionBuilder {
    pub fn new(market: Arc<dyn MarketplaceClient>, image_service_url: String) -> Self {
        Self {
            market,
            image_service_url,
        }
    }

    /// Floor cost including fees, in lamports. Prefers the marketplace's
    /// precomputed stat, falling back to the cheapest current listing run
    /// through the fee schedule.
    pub async fn buy_now_price_net_fees(&self, collection: &Collection) -> Result<f64, CoreError> {
        if let Some(lamports) = collection.stats.buy_now_lamports() {
            return Ok(lamports as f64);
        }
        let mints = self
            .market
            .listings_by_collection(&collection.coll_id)
            .await?;
        let floor = mints
            .first()
            .ok_or_else(|| CoreError::NotFound(format!("no listings for {}", collection.coll_id)))?;
        Ok(total_price(
            floor.listing.price_lamports()?,
            collection.sell_royalty_fee_bps,
            &floor.listing.source,
        ))
    }

    /// Descriptor for a directory-resolved collection: disabled when nothing
    /// is listed, otherwise priced with bid/previous/buy-floor/next links.
    pub async fn collection_action(
        &self,
        collection: &Collection,
        index: usize,
    ) -> Result<ActionGetResponse, CoreError> {
        let icon = icon_url(&self.image_service_url, collection)?;

        if collection.stats.num_listed < 1 {
            return Ok(ActionGetResponse {
                kind: "action".to_string(),
                icon,
                title: collection.name.clone(),
                description: ACTION_DESCRIPTION.to_string(),
                label: "Not Available".to_string(),
                disabled: Some(true),
                links: None,
                error: Some(ActionError::new(NO_LISTINGS_MESSAGE)),
            });
        }

        let buy_now = self.buy_now_price_net_fees(collection).await?;
        let ui_price = format_token_amount(lamports_to_sol(buy_now));
        // Bid bounds come from the displayed price; the raw value stands in
        // when the display form carries a K/M suffix.
        let price_value = ui_price
            .parse::<f64>()
            .unwrap_or_else(|_| lamports_to_sol(buy_now));

        Ok(ActionGetResponse {
            kind: "action".to_string(),
            icon,
            title: collection.name.clone(),
            description: ACTION_DESCRIPTION.to_string(),
            label: format!("{} SOL", ui_price),
            disabled: None,
            links: Some(ActionLinks {
                actions: vec![
                    LinkedAction {
                        href: format!(
                            "{}/{}/{{amount}}",
                            EXPLORE_BASE_PATH, collection.slug_display
                        ),
                        label: "Bid Collection".to_string(),
                        parameters: vec![ActionParameter {
                            kind: "number".to_string(),
                            name: "amount".to_string(),
                            label: "Enter a bid amount (SOL)".to_string(),
                            min: Some(price_value / 10.0),
                            max: Some(price_value),
                        }],
                    },
                    LinkedAction::plain(
                        format!("{}/{}", EXPLORE_BASE_PATH, previous_index(index)),
                        "Previous",
                    ),
                    LinkedAction::plain(
                        format!("{}/{}", EXPLORE_BASE_PATH, collection.slug_display),
                        "Buy Floor",
                    ),
                    LinkedAction::plain(
                        format!("{}/{}", EXPLORE_BASE_PATH, next_index(index)),
                        "Next",
                    ),
                ],
            }),
            error: None,
        })
    }
}
