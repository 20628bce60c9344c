//! Fan-out orchestrator over the inventory and price services.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use common::ProductId;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use upstream::{
    FetchError, FetchScope, InventoryClient, InventoryRecord, PriceClient, PriceRecord,
};
use uuid::Uuid;

use crate::catalog::ProductCatalog;
use crate::error::OrderError;
use crate::orders::{Order, OrderBook, OrderRequest};
use crate::outcome::Outcome;
use crate::reconcile::{Upstream, reconcile, reconcile_single};
use crate::summary::{ProductSummary, StockLevel};

/// Input to the single-product lookups.
///
/// `cancel` is the caller's request-level signal; the orchestrator derives a
/// child token from it, so cancelling here stops every upstream fetch but
/// cancelling inside the orchestrator never reaches the caller.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub product_id: ProductId,
    pub cancel: CancellationToken,
    pub deadline: Instant,
}

impl LookupRequest {
    pub fn new(product_id: ProductId, cancel: CancellationToken, deadline: Instant) -> Self {
        Self {
            product_id,
            cancel,
            deadline,
        }
    }

    /// A request with a fresh token and a deadline `timeout` from now.
    pub fn with_timeout(product_id: ProductId, timeout: Duration) -> Self {
        Self::new(product_id, CancellationToken::new(), Instant::now() + timeout)
    }
}

/// Composes the inventory and price services.
///
/// Holds no per-request state; one instance serves all requests concurrently.
pub struct Orchestrator<I, P>
where
    I: InventoryClient,
    P: PriceClient,
{
    inventory: I,
    price: P,
    catalog: Option<ProductCatalog>,
    orders: OrderBook,
}

impl<I, P> Orchestrator<I, P>
where
    I: InventoryClient,
    P: PriceClient,
{
    /// Creates an orchestrator with no local catalog.
    pub fn new(inventory: I, price: P) -> Self {
        Self {
            inventory,
            price,
            catalog: None,
            orders: OrderBook::new(),
        }
    }

    /// Enables the local catalog short-circuit and product names.
    pub fn with_catalog(mut self, catalog: ProductCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn catalog(&self) -> Option<&ProductCatalog> {
        self.catalog.as_ref()
    }

    pub fn order_book(&self) -> &OrderBook {
        &self.orders
    }

    /// Returns availability and price of a product.
    ///
    /// `Success` only when both fetches succeeded before the deadline and
    /// before cancellation. See [`crate::reconcile`] for the full policy.
    #[tracing::instrument(skip(self, request), fields(product_id = %request.product_id))]
    pub async fn get_product_summary(&self, request: LookupRequest) -> Outcome<ProductSummary> {
        let started = std::time::Instant::now();

        let outcome = match self.local_name(request.product_id) {
            Ok(name) => {
                let scope = FetchScope::new(request.deadline, request.cancel.child_token());
                self.fan_out(request.product_id, &scope)
                    .await
                    .map(|(inventory, price)| ProductSummary::merge(inventory, price, name))
            }
            Err(failure) => failure,
        };

        record_outcome("summary", &outcome, started);
        outcome
    }

    /// Returns the stock of a product from the inventory service alone.
    #[tracing::instrument(skip(self, request), fields(product_id = %request.product_id))]
    pub async fn check_stock(&self, request: LookupRequest) -> Outcome<StockLevel> {
        let started = std::time::Instant::now();

        let outcome = match self.local_name(request.product_id) {
            Ok(name) => {
                let scope = FetchScope::new(request.deadline, request.cancel.child_token());
                let fetch = observe(
                    Upstream::Inventory,
                    self.inventory.fetch_inventory(request.product_id, &scope),
                );
                let outcome = tokio::select! {
                    biased;
                    () = scope.cancel_token().cancelled() => Outcome::Cancelled,
                    result = fetch => reconcile_single(
                        request.product_id,
                        Upstream::Inventory,
                        result,
                        scope.is_cancelled(),
                    ),
                };
                outcome.map(|inventory| StockLevel::from_inventory(inventory, name))
            }
            Err(failure) => failure,
        };

        record_outcome("stock", &outcome, started);
        outcome
    }

    /// Prices an order from live upstream data and records it in the order book.
    ///
    /// Input and stock rule violations are `Err`; upstream failures are
    /// `Ok` with a failure outcome and leave the order book untouched.
    #[tracing::instrument(
        skip(self, request),
        fields(product_id = %request.product_id, quantity = request.quantity)
    )]
    pub async fn place_order(&self, request: OrderRequest) -> Result<Outcome<Order>, OrderError> {
        let started = std::time::Instant::now();
        if request.quantity == 0 {
            return Err(record_rejection("order", OrderError::InvalidQuantity, started));
        }

        let name = match self.local_name(request.product_id) {
            Ok(name) => name,
            Err(failure) => {
                record_outcome("order", &failure, started);
                return Ok(failure);
            }
        };

        let scope = FetchScope::new(request.deadline, request.cancel.child_token());
        let (inventory, price) = match self.fan_out(request.product_id, &scope).await.into_result() {
            Ok(records) => records,
            Err(failure) => {
                record_outcome("order", &failure, started);
                return Ok(failure);
            }
        };

        let order = build_order(&request, name, inventory, price)
            .map_err(|err| record_rejection("order", err, started))?;
        self.orders.record(order.clone()).await;

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(order_id = %order.order_id, total = %order.total, "order placed");

        let outcome = Outcome::Success(order);
        record_outcome("order", &outcome, started);
        Ok(outcome)
    }

    /// Returns every order placed so far, oldest first.
    pub async fn list_orders(&self) -> Vec<Order> {
        self.orders.all().await
    }

    /// Returns a previously placed order.
    pub async fn get_order(&self, order_id: Uuid) -> Option<Order> {
        self.orders.get(order_id).await
    }

    /// Resolves the local product name.
    ///
    /// Without a catalog every product resolves, unnamed. With one, unknown
    /// products fail here and no upstream is contacted.
    fn local_name<T>(&self, product_id: ProductId) -> Result<Option<String>, Outcome<T>> {
        match &self.catalog {
            None => Ok(None),
            Some(catalog) => match catalog.name(product_id) {
                Some(name) => Ok(Some(name.to_string())),
                None => {
                    tracing::debug!("product not in local catalog");
                    Err(Outcome::NotFound(format!(
                        "product {product_id} is not in the catalog"
                    )))
                }
            },
        }
    }

    /// Fetches both records concurrently and reconciles them.
    ///
    /// Both fetches are joined, not raced. If the scope's token fires first
    /// the join is dropped mid-flight and any record already received is
    /// discarded.
    async fn fan_out(
        &self,
        product_id: ProductId,
        scope: &FetchScope,
    ) -> Outcome<(InventoryRecord, PriceRecord)> {
        let started = std::time::Instant::now();

        let both = async {
            tokio::join!(
                observe(
                    Upstream::Inventory,
                    self.inventory.fetch_inventory(product_id, scope),
                ),
                observe(Upstream::Price, self.price.fetch_price(product_id, scope))
            )
        };

        let outcome = tokio::select! {
            biased;
            () = scope.cancel_token().cancelled() => Outcome::Cancelled,
            (inventory, price) = both => {
                reconcile(product_id, inventory, price, scope.is_cancelled())
            }
        };

        metrics::histogram!("orchestrator_fanout_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        outcome
    }
}

/// Applies the stock and total rules to live upstream records.
fn build_order(
    request: &OrderRequest,
    product_name: Option<String>,
    inventory: InventoryRecord,
    price: PriceRecord,
) -> Result<Order, OrderError> {
    if inventory.stock < request.quantity {
        return Err(OrderError::InsufficientStock {
            requested: request.quantity,
            available: inventory.stock,
        });
    }

    let total = price
        .amount
        .checked_multiply(request.quantity)
        .ok_or(OrderError::TotalOverflow {
            quantity: request.quantity,
        })?;

    Ok(Order {
        order_id: Uuid::new_v4(),
        product_id: request.product_id,
        product_name,
        sku: inventory.sku,
        quantity: request.quantity,
        unit_price: price.amount,
        total,
        currency: price.currency,
        created_at: Utc::now(),
    })
}

/// Records latency and result metrics for one upstream fetch.
async fn observe<T>(
    upstream: Upstream,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    let started = std::time::Instant::now();
    let result = fetch.await;

    let label = match &result {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    };
    metrics::histogram!("upstream_fetch_duration_seconds", "upstream" => upstream.as_str())
        .record(started.elapsed().as_secs_f64());
    metrics::counter!(
        "upstream_fetch_total",
        "upstream" => upstream.as_str(),
        "result" => label
    )
    .increment(1);

    match &result {
        Ok(_) | Err(FetchError::Cancelled) => {}
        Err(FetchError::NotFound) => tracing::debug!(%upstream, "upstream reported not found"),
        Err(err) => tracing::warn!(%upstream, error = %err, "upstream fetch failed"),
    }
    result
}

fn record_outcome<T>(operation: &'static str, outcome: &Outcome<T>, started: std::time::Instant) {
    metrics::counter!(
        "orchestrator_outcomes_total",
        "operation" => operation,
        "outcome" => outcome.label()
    )
    .increment(1);
    tracing::info!(
        operation,
        outcome = outcome.label(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request reconciled"
    );
}

fn record_rejection(
    operation: &'static str,
    err: OrderError,
    started: std::time::Instant,
) -> OrderError {
    metrics::counter!(
        "orchestrator_outcomes_total",
        "operation" => operation,
        "outcome" => "rejected"
    )
    .increment(1);
    tracing::info!(
        operation,
        error = %err,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request rejected"
    );
    err
}
