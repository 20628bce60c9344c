//! HTTP API server with observability for the product orchestration service.
//!
//! Provides REST endpoints for product summaries, stock checks and orders,
//! with structured logging (tracing) and Prometheus metrics.

pub mod compose;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use orchestrator::Orchestrator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use upstream::{
    HttpInventoryClient, HttpPriceClient, InMemoryInventoryService, InMemoryPriceService,
    InventoryClient, PriceClient, build_http_client,
};

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<I, P>(state: Arc<AppState<I, P>>, metrics_handle: PrometheusHandle) -> Router
where
    I: InventoryClient + 'static,
    P: PriceClient + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/products/{id}/summary",
            get(routes::products::summary::<I, P>),
        )
        .route("/products/{id}/stock", get(routes::products::stock::<I, P>))
        .route(
            "/orders",
            get(routes::orders::list::<I, P>).post(routes::orders::create::<I, P>),
        )
        .route("/orders/{id}", get(routes::orders::get::<I, P>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state talking to the real inventory and price services.
pub fn create_http_state(
    config: &Config,
) -> Result<Arc<AppState<HttpInventoryClient, HttpPriceClient>>, reqwest::Error> {
    let http = build_http_client(config.upstream_timeout)?;
    let inventory = HttpInventoryClient::new(http.clone(), config.inventory_url.as_str());
    let price = HttpPriceClient::new(http, config.price_url.as_str());

    Ok(Arc::new(AppState {
        orchestrator: with_catalog(Orchestrator::new(inventory, price), config),
        upstream_timeout: config.upstream_timeout,
    }))
}

/// Creates application state backed by seeded in-memory services.
///
/// The service handles are returned so callers can adjust their data,
/// latency and failures.
pub fn create_memory_state(
    config: &Config,
) -> (
    Arc<AppState<InMemoryInventoryService, InMemoryPriceService>>,
    InMemoryInventoryService,
    InMemoryPriceService,
) {
    let inventory = InMemoryInventoryService::seeded();
    let price = InMemoryPriceService::seeded();
    let orchestrator = Orchestrator::new(inventory.clone(), price.clone());

    let state = Arc::new(AppState {
        orchestrator: with_catalog(orchestrator, config),
        upstream_timeout: config.upstream_timeout,
    });

    (state, inventory, price)
}

fn with_catalog<I: InventoryClient, P: PriceClient>(
    orchestrator: Orchestrator<I, P>,
    config: &Config,
) -> Orchestrator<I, P> {
    match &config.catalog {
        Some(catalog) => orchestrator.with_catalog(catalog.clone()),
        None => orchestrator,
    }
}
