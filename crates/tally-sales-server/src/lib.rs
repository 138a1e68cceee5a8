#![forbid(unsafe_code)]
//! HTTP wiring for the sales record service: router, handlers, the
//! access gate, and the search views.

mod config;
mod http;
mod middleware;

pub use config::{validate_startup_config_contract, ApiConfig, AppConfig, DEFAULT_BIND};
pub use tally_sales_store::{MemorySaleStore, SqliteSaleStore};

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tally_sales_query::QueryLimits;
use tally_sales_store::SaleStore;

pub const CRATE_NAME: &str = "tally-sales-server";

/// Process-wide handles shared by every handler. The store connection is
/// established once at startup and injected here, never reached as
/// ambient global state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SaleStore>,
    pub api: ApiConfig,
    pub limits: QueryLimits,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn SaleStore>, api: ApiConfig) -> Self {
        Self::with_limits(store, api, QueryLimits::default())
    }

    #[must_use]
    pub fn with_limits(store: Arc<dyn SaleStore>, api: ApiConfig, limits: QueryLimits) -> Self {
        Self {
            store,
            api,
            limits,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/api", get(http::handlers::api_index_handler))
        .route(
            "/api/search",
            get(http::handlers::search_form_handler).post(http::handlers::search_results_handler),
        )
        .route(
            "/api/sales",
            get(http::handlers::list_sales_handler).post(http::handlers::create_sale_handler),
        )
        .route(
            "/api/sales/:id",
            get(http::handlers::get_sale_handler)
                .put(http::handlers::update_sale_handler)
                .delete(http::handlers::delete_sale_handler),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::access_gate::require_api_key,
        ));

    Router::new()
        .route("/", get(http::handlers::landing_handler))
        .route("/healthz", get(http::handlers::healthz_handler))
        .merge(gated)
        .layer(from_fn_with_state(state.clone(), middleware::cors::apply_cors))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
