// Unsigned transaction assembly. Everything returned here is a base64 wire
// transaction with empty signature slots; the caller's wallet signs.

use crate::error::CoreError;
use crate::fees::total_price;
use crate::marketplace::{CollectionBidParams, MarketplaceClient, NftBuyParams};
use crate::models::Mint;
use crate::rpc_client::ChainClient;
use base64::{engine::general_purpose::STANDARD as Base64Engine, Engine as _};
use log::debug;
use solana_program::system_instruction;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;
use std::sync::Arc;

/// Anti-abuse fee collected by the probe transaction, in lamports.
pub const PROBE_FEE_LAMPORTS: u64 = 1000;

/// Treasury receiving the probe fee.
pub const PROBE_FEE_TREASURY: &str = "X6n2p9QCS2fWEmx1d6bVpRDMBZC82mvKqVyRVJ8qMv5";

pub struct TxAssembler {
    chain: Arc<dyn ChainClient>,
    market: Arc<dyn MarketplaceClient>,
}

impl TxAssembler {
    pub fn new(chain: Arc<dyn ChainClient>, market: Arc<dyn MarketplaceClient>) -> Self {
        Self { chain, market }
    }

    /// No-op anti-abuse transaction: a single transfer of
    /// [`PROBE_FEE_LAMPORTS`] from `payer` to the treasury, fee payer set to
    /// `payer`, bound to the latest blockhash.
    pub async fn probe_transaction(&self, payer: &str) -> Result<String, CoreError> {
        let payer_pk = Pubkey::from_str(payer)
            .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", payer, e)))?;
        let treasury = Pubkey::from_str(PROBE_FEE_TREASURY)
            .map_err(|e| CoreError::InvalidAddress(format!("{}: {}", PROBE_FEE_TREASURY, e)))?;

        let blockhash = self.chain.latest_blockhash().await?;
        let recent = Hash::from_str(&blockhash)
            .map_err(|e| CoreError::Rpc(format!("bad blockhash {}: {}", blockhash, e)))?;

        let transfer = system_instruction::transfer(&payer_pk, &treasury, PROBE_FEE_LAMPORTS);
        let mut transaction = Transaction::new_with_payer(&[transfer], Some(&payer_pk));
        transaction.message.recent_blockhash = recent;
        serialize_unsigned(&transaction)
    }

    /// Collection bid built by the marketplace, quantity fixed at 1.
    /// `Ok(None)` means the marketplace could not produce a transaction.
    pub async fn bid_transaction(
        &self,
        owner: &str,
        price_sol: f64,
        collection_id: &str,
    ) -> Result<Option<String>, CoreError> {
        let blockhash = self.chain.latest_blockhash().await?;
        debug!("bid on {} bound to blockhash {}", collection_id, blockhash);

        self.market
            .collection_bid_transaction(CollectionBidParams {
                owner_address: owner.to_string(),
                price_sol,
                quantity: 1,
                collection_id: collection_id.to_string(),
                latest_blockhash: blockhash,
            })
            .await
    }

    /// Buy of a specific listing at its total price (royalty and marketplace
    /// fee included), bound to a finalized blockhash.
    pub async fn buy_transaction(
        &self,
        mint: &Mint,
        buyer: &str,
    ) -> Result<Option<String>, CoreError> {
        let blockhash = self.chain.finalized_blockhash().await?;

        let price = mint.listing.price_lamports()?;
        let total = total_price(price, mint.royalty_bps, &mint.listing.source);
        debug!(
            "buy {} for {} lamports total, blockhash {}",
            mint.mint, total, blockhash
        );

        self.market
            .nft_buy_transaction(NftBuyParams {
                mint_address: mint.mint.clone(),
                owner_address: mint.listing.seller.clone(),
                buyer_address: buyer.to_string(),
                price: total,
                latest_blockhash: blockhash,
            })
            .await
    }
}

fn serialize_unsigned(transaction: &Transaction) -> Result<String, CoreError> {
    let bytes = bincode::serialize(transaction)
        .map_err(|e| CoreError::Transaction(format!("serialize failed: {}", e)))?;
    Ok(Base64Engine.encode(bytes))
}
