//! Order placement and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use common::ProductId;
use orchestrator::{Order, OrderRequest};
use serde::Deserialize;
use upstream::{InventoryClient, PriceClient};
use uuid::Uuid;

use super::AppState;
use crate::compose::compose;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(alias = "productId")]
    pub product_id: i64,
    pub quantity: u32,
}

// -- Handlers --

/// POST /orders: price an order from live upstream data and record it.
#[tracing::instrument(skip(state, body))]
pub async fn create<I, P>(
    State(state): State<Arc<AppState<I, P>>>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Response, ApiError>
where
    I: InventoryClient + 'static,
    P: PriceClient + 'static,
{
    let Json(req) = body?;
    let (cancel, deadline, _guard) = state.request_scope();
    let request = OrderRequest::new(ProductId::new(req.product_id), req.quantity, cancel, deadline);

    let outcome = state.orchestrator.place_order(request).await?;

    Ok(compose(outcome, StatusCode::CREATED))
}

/// GET /orders: every order placed since start-up, oldest first.
#[tracing::instrument(skip(state))]
pub async fn list<I, P>(State(state): State<Arc<AppState<I, P>>>) -> Json<Vec<Order>>
where
    I: InventoryClient + 'static,
    P: PriceClient + 'static,
{
    Json(state.orchestrator.list_orders().await)
}

/// GET /orders/{id}: a single order by id.
#[tracing::instrument(skip(state))]
pub async fn get<I, P>(
    State(state): State<Arc<AppState<I, P>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError>
where
    I: InventoryClient + 'static,
    P: PriceClient + 'static,
{
    let order_id = Uuid::parse_str(&id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID '{id}': {e}")))?;
    let order = state
        .orchestrator
        .get_order(order_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order))
}
