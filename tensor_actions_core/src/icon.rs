// Social-card URL construction for the external image-rendering service.

use crate::error::CoreError;
use crate::format::{format_token_amount, lamports_to_sol};
use crate::models::Collection;
use url::Url;

/// Build the image-service URL carrying a collection's market stats as query
/// parameters. Construction only; the render happens in the image service.
pub fn icon_url(image_service_url: &str, collection: &Collection) -> Result<String, CoreError> {
    let stats = &collection.stats;
    let buy_now = stats.buy_now_lamports().unwrap_or(0) as f64;
    let sell_now = stats.sell_now_lamports().unwrap_or(0) as f64;
    // Percentage gap between buy and sell net-fee prices.
    let spread = if buy_now > 0.0 {
        (1.0 - sell_now / buy_now) * 100.0
    } else {
        0.0
    };

    let mut url = Url::parse(image_service_url)
        .map_err(|e| CoreError::Validation(format!("invalid image service URL: {}", e)))?;
    url.query_pairs_mut()
        .append_pair("name", &collection.name)
        .append_pair("icon", &collection.image_uri)
        .append_pair("collId", &collection.coll_id)
        .append_pair("spread", &format_token_amount(spread))
        .append_pair("buyNow", &format_token_amount(lamports_to_sol(buy_now)))
        .append_pair("sellNow", &format_token_amount(lamports_to_sol(sell_now)))
        .append_pair("listed", &stats.num_listed.to_string())
        .append_pair(
            "marketCap",
            &(lamports_to_sol(stats.market_cap_lamports()).floor() as u64).to_string(),
        )
        .append_pair(
            "volume",
            &(lamports_to_sol(stats.volume_24h_lamports()).floor() as u64).to_string(),
        )
        .append_pair("numMints", &stats.num_mints.to_string());

    Ok(url.to_string())
}
