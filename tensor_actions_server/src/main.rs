mod api;

use api::{create_router, AppState};
use log::{error, info};
use std::sync::Arc;
use tensor_actions_core::actions::ActionBuilder;
use tensor_actions_core::directory::CollectionDirectory;
use tensor_actions_core::error::CoreError;
use tensor_actions_core::marketplace::MarketplaceClient;
use tensor_actions_core::native::{NativeChainClient, TensorApiClient};
use tensor_actions_core::rpc_client::ChainClient;
use tensor_actions_core::settings::Settings;
use tensor_actions_core::tx::TxAssembler;

const DEFAULT_CONFIG_PATH: &str = "config";

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let settings = Settings::from_file(&config_path)?;
    settings.validate()?;
    let bind_addr = format!("{}:{}", settings.api_host, settings.api_port);

    let chain: Arc<dyn ChainClient> =
        Arc::new(NativeChainClient::new(settings.solana_rpc_url.clone()));
    let market: Arc<dyn MarketplaceClient> = Arc::new(TensorApiClient::new(&settings));

    let state = AppState {
        directory: Arc::new(CollectionDirectory::new(market.clone())),
        actions: Arc::new(ActionBuilder::new(
            market.clone(),
            settings.image_service_url.clone(),
        )),
        assembler: Arc::new(TxAssembler::new(chain, market.clone())),
        market,
        settings: Arc::new(settings),
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.map_err(|e| {
        error!("Failed to bind API server to {}: {}", bind_addr, e);
        CoreError::Init(format!("bind {}: {}", bind_addr, e))
    })?;
    info!("API server listening on {}", bind_addr);
    axum::serve(listener, router).await.map_err(|e| {
        error!("API server failed: {}", e);
        CoreError::Init(format!("serve: {}", e))
    })
}
