//! HTTP route handlers and the state they share.

pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use std::time::Duration;

use common::ProductId;
use orchestrator::Orchestrator;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use upstream::{InventoryClient, PriceClient};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<I: InventoryClient, P: PriceClient> {
    pub orchestrator: Orchestrator<I, P>,
    pub upstream_timeout: Duration,
}

impl<I: InventoryClient, P: PriceClient> AppState<I, P> {
    /// Cancellation token and deadline for one incoming request.
    ///
    /// The returned guard cancels the token when dropped. Axum drops the
    /// handler future when the client disconnects, so in-flight upstream
    /// fetches are abandoned along with it.
    pub fn request_scope(&self) -> (CancellationToken, Instant, DropGuard) {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        (token, Instant::now() + self.upstream_timeout, guard)
    }
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid product ID '{id}': {e}")))
}
