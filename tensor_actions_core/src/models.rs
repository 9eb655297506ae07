use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// An NFT collection as returned by the marketplace API.
///
/// Treated as read-only for the lifetime of a cached fetch. Numeric stats
/// arrive string-encoded in smallest-denomination units (lamports); the
/// accessor methods parse them once at the point of use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub coll_id: String,
    pub name: String,
    #[serde(default)]
    pub image_uri: String,
    pub slug_display: String,
    #[serde(rename = "sellRoyaltyFeeBPS", default)]
    pub sell_royalty_fee_bps: u64,
    pub stats: CollectionStats,
}

/// Aggregate market stats attached to a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    #[serde(default)]
    pub buy_now_price_net_fees: Option<String>,
    #[serde(default)]
    pub sell_now_price_net_fees: Option<String>,
    #[serde(default)]
    pub num_listed: u64,
    #[serde(default)]
    pub num_mints: u64,
    #[serde(default)]
    pub market_cap: Option<String>,
    #[serde(default)]
    pub volume24h: Option<String>,
}

impl CollectionStats {
    /// Floor cost including fees, in lamports, when the marketplace has
    /// precomputed it.
    pub fn buy_now_lamports(&self) -> Option<u64> {
        self.buy_now_price_net_fees
            .as_deref()
            .and_then(|s| s.parse().ok())
    }

    pub fn sell_now_lamports(&self) -> Option<u64> {
        self.sell_now_price_net_fees
            .as_deref()
            .and_then(|s| s.parse().ok())
    }

    pub fn market_cap_lamports(&self) -> f64 {
        self.market_cap
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0)
    }

    pub fn volume_24h_lamports(&self) -> f64 {
        self.volume24h
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0)
    }
}

/// A specific listed NFT instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mint {
    pub mint: String,
    #[serde(default)]
    pub royalty_bps: u64,
    pub listing: Listing,
}

/// The active listing attached to a mint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// String-encoded price in lamports.
    pub price: String,
    pub seller: String,
    /// Marketplace identifier, e.g. "TENSORSWAP".
    pub source: String,
}

impl Listing {
    pub fn price_lamports(&self) -> Result<u64, CoreError> {
        self.price.parse::<u64>().map_err(|e| {
            CoreError::InvalidInput(format!("listing price {:?}: {}", self.price, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_deserializes_from_marketplace_json() {
        let json = r#"{
            "collId": "05c52d84-2e49-4ed9-a473-b43cab41e777",
            "name": "Mad Lads",
            "imageUri": "https://example.com/madlads.png",
            "slugDisplay": "madlads",
            "sellRoyaltyFeeBPS": 420,
            "stats": {
                "buyNowPriceNetFees": "120000000000",
                "sellNowPriceNetFees": "110000000000",
                "numListed": 215,
                "numMints": 10000,
                "marketCap": "1200000000000000",
                "volume24h": "9000000000000"
            }
        }"#;
        let collection: Collection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.slug_display, "madlads");
        assert_eq!(collection.sell_royalty_fee_bps, 420);
        assert_eq!(collection.stats.buy_now_lamports(), Some(120_000_000_000));
        assert_eq!(collection.stats.num_listed, 215);
    }

    #[test]
    fn missing_stats_fields_default() {
        let json = r#"{
            "collId": "x",
            "name": "Bare",
            "slugDisplay": "bare",
            "stats": {}
        }"#;
        let collection: Collection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.stats.buy_now_lamports(), None);
        assert_eq!(collection.stats.num_listed, 0);
        assert_eq!(collection.stats.market_cap_lamports(), 0.0);
    }

    #[test]
    fn listing_price_parses_or_errors() {
        let listing = Listing {
            price: "1500000000".to_string(),
            seller: "seller".to_string(),
            source: "TENSORSWAP".to_string(),
        };
        assert_eq!(listing.price_lamports().unwrap(), 1_500_000_000);

        let bad = Listing {
            price: "not-a-number".to_string(),
            seller: "seller".to_string(),
            source: "TENSORSWAP".to_string(),
        };
        assert!(bad.price_lamports().is_err());
    }
}
