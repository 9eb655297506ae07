use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use log::error;
use serde_json::json;
use std::sync::Arc;
use tensor_actions_core::actions::{
    ActionBuilder, ActionError, ActionPostRequest, ActionPostResponse, NextAction,
    PostActionLinks,
};
use tensor_actions_core::directory::CollectionDirectory;
use tensor_actions_core::error::CoreError;
use tensor_actions_core::marketplace::MarketplaceClient;
use tensor_actions_core::settings::Settings;
use tensor_actions_core::tx::TxAssembler;
use tower_http::cors::CorsLayer;

const FAILED_TX_MESSAGE: &str = "Failed to prepare transaction";
const BID_PLACED_MESSAGE: &str = "Bid Placed! See tensor.trade for more";
const BOUGHT_MESSAGE: &str = "Bought! Explore More";

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub directory: Arc<CollectionDirectory>,
    pub actions: Arc<ActionBuilder>,
    pub assembler: Arc<TxAssembler>,
    pub market: Arc<dyn MarketplaceClient>,
}

/// Explore path segment: a directory index or a collection slug, decided
/// once at the boundary.
enum ExploreTarget {
    ByIndex(usize),
    BySlug(String),
}

impl ExploreTarget {
    fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(index) => Self::ByIndex(index),
            Err(_) => Self::BySlug(raw.to_string()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/actions.json", get(actions_json_handler))
        .route("/health", get(health_handler))
        .route("/api/tensor/explore/", get(explore_root_handler))
        .route(
            "/api/tensor/explore/:target",
            get(explore_index_handler).post(explore_post_handler),
        )
        .route("/api/tensor/explore/:slug/:amount", post(bid_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn home_handler() -> Html<&'static str> {
    Html("<h1>Solana Actions - Tensor Explore, visit <a href=\"/api/tensor/explore/\">here</a></h1>")
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn actions_json_handler(State(state): State<AppState>) -> impl IntoResponse {
    let base = state.settings.public_base_url.trim_end_matches('/');
    Json(json!({
        "rules": [
            {
                "pathPattern": "/api/tensor/explore/**",
                "apiPath": format!("{}/api/tensor/explore/**", base),
            },
            {
                "pathPattern": "/api/tensor/explore/",
                "apiPath": format!("{}/api/tensor/explore/", base),
            },
            {
                "pathPattern": "/api/tensor/explore/**/**",
                "apiPath": format!("{}/api/tensor/explore/**/**", base),
            },
        ]
    }))
}

async fn explore_root_handler(State(state): State<AppState>) -> Response {
    collection_response(&state, 0).await
}

async fn explore_index_handler(
    State(state): State<AppState>,
    Path(target): Path<String>,
) -> Response {
    match target.parse::<usize>() {
        Ok(index) => collection_response(&state, index).await,
        Err(_) => error_response(StatusCode::NOT_FOUND, "Invalid index parameter"),
    }
}

/// GET descriptor for the collection at `index`.
async fn collection_response(state: &AppState, index: usize) -> Response {
    let collection = match state.directory.get(index).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, "Collection not found")
        }
        Err(e) => return load_failure("resolve collection directory", e),
    };
    match state.actions.collection_action(&collection, index).await {
        Ok(action) => (StatusCode::OK, Json(action)).into_response(),
        Err(e) => load_failure("build collection action", e),
    }
}

async fn explore_post_handler(
    State(state): State<AppState>,
    Path(target): Path<String>,
    Json(body): Json<ActionPostRequest>,
) -> Response {
    match ExploreTarget::parse(&target) {
        ExploreTarget::BySlug(slug) => buy_floor(&state, &slug, &body.account).await,
        ExploreTarget::ByIndex(index) => probe_with_next(&state, index, &body.account).await,
    }
}

/// Buy the cheapest listing of a slug-addressed collection.
async fn buy_floor(state: &AppState, slug: &str, account: &str) -> Response {
    let collection = match state.directory.find_by_slug(slug).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            return error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Collection {} not found", slug),
            )
        }
        Err(e) => return transaction_failure("buy floor", slug, e),
    };

    let floor = match state.market.listings_by_collection(&collection.coll_id).await {
        Ok(mints) => match mints.into_iter().next() {
            Some(mint) => mint,
            None => {
                return error_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Collection has no listed NFTs",
                )
            }
        },
        Err(e) => return transaction_failure("buy floor", slug, e),
    };

    match state.assembler.buy_transaction(&floor, account).await {
        Ok(Some(transaction)) => Json(ActionPostResponse {
            transaction,
            message: Some(BOUGHT_MESSAGE.to_string()),
            links: None,
        })
        .into_response(),
        Ok(None) => transaction_failure("buy floor", slug, "marketplace returned no transaction"),
        Err(e) => transaction_failure("buy floor", slug, e),
    }
}

/// Index-addressed POST: a probe transaction chained to the collection's
/// descriptor as the inline next action.
async fn probe_with_next(state: &AppState, index: usize, account: &str) -> Response {
    let collection = match state.directory.get(index).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, "Collection not found")
        }
        Err(e) => return transaction_failure("probe", &index.to_string(), e),
    };

    let transaction = match state.assembler.probe_transaction(account).await {
        Ok(transaction) => transaction,
        Err(e) => return transaction_failure("probe", &index.to_string(), e),
    };

    let mut action = match state.actions.collection_action(&collection, index).await {
        Ok(action) => action,
        Err(e) => return transaction_failure("probe", &index.to_string(), e),
    };
    action.label = "Tensor Explore".to_string();

    Json(ActionPostResponse {
        transaction,
        message: None,
        links: Some(PostActionLinks {
            next: NextAction::inline(action),
        }),
    })
    .into_response()
}

async fn bid_handler(
    State(state): State<AppState>,
    Path((slug, amount)): Path<(String, String)>,
    Json(body): Json<ActionPostRequest>,
) -> Response {
    let amount = match amount.parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid bid amount",
            )
        }
    };

    let collection = match state.directory.find_by_slug(&slug).await {
        Ok(Some(collection)) => collection,
        Ok(None) => {
            return error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Collection {} not found", slug),
            )
        }
        Err(e) => return transaction_failure("bid collection", &slug, e),
    };

    match state
        .assembler
        .bid_transaction(&body.account, amount, &collection.coll_id)
        .await
    {
        Ok(Some(transaction)) => Json(ActionPostResponse {
            transaction,
            message: Some(BID_PLACED_MESSAGE.to_string()),
            links: None,
        })
        .into_response(),
        Ok(None) => {
            transaction_failure("bid collection", &slug, "marketplace returned no transaction")
        }
        Err(e) => transaction_failure("bid collection", &slug, e),
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ActionError::new(message))).into_response()
}

/// Collaborator failures never cross the boundary unformatted; the original
/// error is logged and the caller sees the fixed message.
fn transaction_failure(context: &str, target: &str, detail: impl std::fmt::Display) -> Response {
    error!(
        "Failed to prepare {} transaction for {}: {}",
        context, target, detail
    );
    error_response(StatusCode::INTERNAL_SERVER_ERROR, FAILED_TX_MESSAGE)
}

fn load_failure(context: &str, err: CoreError) -> Response {
    error!("Failed to {}: {}", context, err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to load collection data",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use solana_sdk::hash::hash;
    use solana_sdk::pubkey::Pubkey;
    use tensor_actions_core::marketplace::{
        ApiResult, CollectionBidParams, NftBuyParams,
    };
    use tensor_actions_core::models::{Collection, CollectionStats, Listing, Mint};
    use tensor_actions_core::rpc_client::{ChainClient, RpcResult};
    use tower::ServiceExt;

    struct FakeChain;

    #[async_trait]
    impl ChainClient for FakeChain {
        async fn latest_blockhash(&self) -> RpcResult<String> {
            Ok(hash(b"latest").to_string())
        }
        async fn finalized_blockhash(&self) -> RpcResult<String> {
            Ok(hash(b"finalized").to_string())
        }
    }

    struct FakeMarket {
        listings: Vec<Mint>,
        tx: Option<String>,
    }

    fn collection(n: usize) -> Collection {
        Collection {
            coll_id: format!("coll-{}", n),
            name: format!("Collection {}", n),
            image_uri: "https://example.com/i.png".to_string(),
            slug_display: format!("slug-{}", n),
            sell_royalty_fee_bps: 0,
            stats: CollectionStats {
                buy_now_price_net_fees: Some("2500000000".to_string()),
                num_listed: 5,
                ..Default::default()
            },
        }
    }

    fn floor_mint() -> Mint {
        Mint {
            mint: "mint-1".to_string(),
            royalty_bps: 0,
            listing: Listing {
                price: "2500000000".to_string(),
                seller: "seller".to_string(),
                source: "TENSORSWAP".to_string(),
            },
        }
    }

    #[async_trait]
    impl MarketplaceClient for FakeMarket {
        async fn collections_by_24h_volume(&self, limit: usize) -> ApiResult<Vec<Collection>> {
            Ok((0..limit).map(collection).collect())
        }
        async fn find_collection_by_slug(&self, slug: &str) -> ApiResult<Option<Collection>> {
            Ok(if slug == "slug-3" {
                Some(collection(3))
            } else {
                None
            })
        }
        async fn listings_by_collection(&self, _coll_id: &str) -> ApiResult<Vec<Mint>> {
            Ok(self.listings.clone())
        }
        async fn collection_bid_transaction(
            &self,
            _params: CollectionBidParams,
        ) -> ApiResult<Option<String>> {
            Ok(self.tx.clone())
        }
        async fn nft_buy_transaction(&self, _params: NftBuyParams) -> ApiResult<Option<String>> {
            Ok(self.tx.clone())
        }
    }

    fn test_settings() -> Settings {
        Settings::from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../config.example.toml"
        ))
        .unwrap()
    }

    fn router_with(market: FakeMarket) -> Router {
        let settings = Arc::new(test_settings());
        let market: Arc<dyn MarketplaceClient> = Arc::new(market);
        let chain: Arc<dyn ChainClient> = Arc::new(FakeChain);
        create_router(AppState {
            directory: Arc::new(CollectionDirectory::new(market.clone())),
            actions: Arc::new(ActionBuilder::new(
                market.clone(),
                settings.image_service_url.clone(),
            )),
            assembler: Arc::new(TxAssembler::new(chain, market.clone())),
            market,
            settings,
        })
    }

    fn working_market() -> FakeMarket {
        FakeMarket {
            listings: vec![floor_mint()],
            tx: Some("dHg=".to_string()),
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    fn post_request(path: &str, account: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(format!("{{\"account\":\"{}\"}}", account)))
            .unwrap()
    }

    #[tokio::test]
    async fn get_root_serves_first_collection() {
        let (status, body) = send(
            router_with(working_market()),
            get_request("/api/tensor/explore/"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Collection 0");
        assert_eq!(body["label"], "2.5 SOL");
        assert_eq!(body["links"]["actions"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn get_rejects_non_numeric_index() {
        let (status, body) = send(
            router_with(working_market()),
            get_request("/api/tensor/explore/notanumber"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Invalid index parameter");
    }

    #[tokio::test]
    async fn get_out_of_range_index_is_unprocessable() {
        let (status, body) = send(
            router_with(working_market()),
            get_request("/api/tensor/explore/25"),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Collection not found");
    }

    #[tokio::test]
    async fn post_index_returns_probe_with_next_action() {
        let account = Pubkey::new_unique().to_string();
        let (status, body) = send(
            router_with(working_market()),
            post_request("/api/tensor/explore/2", &account),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["transaction"].as_str().unwrap().len() > 0);
        assert_eq!(body["links"]["next"]["type"], "inline");
        assert_eq!(body["links"]["next"]["action"]["label"], "Tensor Explore");
        assert_eq!(body["links"]["next"]["action"]["title"], "Collection 2");
    }

    #[tokio::test]
    async fn post_slug_buys_the_floor() {
        let account = Pubkey::new_unique().to_string();
        let (status, body) = send(
            router_with(working_market()),
            post_request("/api/tensor/explore/slug-3", &account),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transaction"], "dHg=");
        assert_eq!(body["message"], "Bought! Explore More");
    }

    #[tokio::test]
    async fn post_unknown_slug_is_unprocessable() {
        let account = Pubkey::new_unique().to_string();
        let (status, body) = send(
            router_with(working_market()),
            post_request("/api/tensor/explore/unknown", &account),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Collection unknown not found");
    }

    #[tokio::test]
    async fn bid_happy_path() {
        let account = Pubkey::new_unique().to_string();
        let (status, body) = send(
            router_with(working_market()),
            post_request("/api/tensor/explore/slug-3/1.5", &account),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Bid Placed! See tensor.trade for more");
    }

    #[tokio::test]
    async fn bid_rejects_non_numeric_amount() {
        let (status, body) = send(
            router_with(working_market()),
            post_request("/api/tensor/explore/slug-3/abc", "acct"),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Invalid bid amount");
    }

    #[tokio::test]
    async fn declined_marketplace_transaction_is_a_500() {
        let market = FakeMarket {
            listings: vec![floor_mint()],
            tx: None,
        };
        let account = Pubkey::new_unique().to_string();
        let (status, body) = send(
            router_with(market),
            post_request("/api/tensor/explore/slug-3/1.5", &account),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to prepare transaction");
    }

    #[tokio::test]
    async fn buy_floor_without_listings_is_unprocessable() {
        let market = FakeMarket {
            listings: Vec::new(),
            tx: Some("dHg=".to_string()),
        };
        let account = Pubkey::new_unique().to_string();
        let (status, body) = send(
            router_with(market),
            post_request("/api/tensor/explore/slug-3", &account),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Collection has no listed NFTs");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(router_with(working_market()), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn actions_json_maps_explore_paths() {
        let (status, body) =
            send(router_with(working_market()), get_request("/actions.json")).await;
        assert_eq!(status, StatusCode::OK);
        let rules = body["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0]["pathPattern"], "/api/tensor/explore/**");
        assert!(rules[0]["apiPath"]
            .as_str()
            .unwrap()
            .ends_with("/api/tensor/explore/**"));
    }
}
