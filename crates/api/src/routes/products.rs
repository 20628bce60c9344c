//! Product lookup endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use orchestrator::LookupRequest;
use upstream::{InventoryClient, PriceClient};

use super::{AppState, parse_product_id};
use crate::compose::compose;
use crate::error::ApiError;

/// GET /products/{id}/summary: stock and price of a product.
#[tracing::instrument(skip(state))]
pub async fn summary<I, P>(
    State(state): State<Arc<AppState<I, P>>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    I: InventoryClient + 'static,
    P: PriceClient + 'static,
{
    let product_id = parse_product_id(&id)?;
    let (cancel, deadline, _guard) = state.request_scope();

    let outcome = state
        .orchestrator
        .get_product_summary(LookupRequest::new(product_id, cancel, deadline))
        .await;

    Ok(compose(outcome, StatusCode::OK))
}

/// GET /products/{id}/stock: stock of a product from the inventory service only.
#[tracing::instrument(skip(state))]
pub async fn stock<I, P>(
    State(state): State<Arc<AppState<I, P>>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError>
where
    I: InventoryClient + 'static,
    P: PriceClient + 'static,
{
    let product_id = parse_product_id(&id)?;
    let (cancel, deadline, _guard) = state.request_scope();

    let outcome = state
        .orchestrator
        .check_stock(LookupRequest::new(product_id, cancel, deadline))
        .await;

    Ok(compose(outcome, StatusCode::OK))
}
