//! Integration tests for the fan-out orchestrator against in-memory upstreams.

use std::time::Duration;

use common::{Money, ProductId};
use orchestrator::{
    LookupRequest, Orchestrator, OrderError, OrderRequest, Outcome, ProductCatalog,
    ProductSummary,
};
use tokio_util::sync::CancellationToken;
use upstream::{FetchError, InMemoryInventoryService, InMemoryPriceService, PriceRecord};

type TestOrchestrator = Orchestrator<InMemoryInventoryService, InMemoryPriceService>;

const TIMEOUT: Duration = Duration::from_secs(1);

struct TestHarness {
    orchestrator: TestOrchestrator,
    inventory: InMemoryInventoryService,
    price: InMemoryPriceService,
}

impl TestHarness {
    fn new() -> Self {
        let inventory = InMemoryInventoryService::seeded();
        let price = InMemoryPriceService::seeded();
        let orchestrator = Orchestrator::new(inventory.clone(), price.clone());
        Self {
            orchestrator,
            inventory,
            price,
        }
    }

    fn with_catalog(catalog: ProductCatalog) -> Self {
        let inventory = InMemoryInventoryService::seeded();
        let price = InMemoryPriceService::seeded();
        let orchestrator = Orchestrator::new(inventory.clone(), price.clone()).with_catalog(catalog);
        Self {
            orchestrator,
            inventory,
            price,
        }
    }

    async fn summary(&self, id: i64) -> Outcome<ProductSummary> {
        self.orchestrator
            .get_product_summary(LookupRequest::with_timeout(ProductId::new(id), TIMEOUT))
            .await
    }
}

/// Cancels `token` after `delay` on a background task.
fn cancel_after(token: &CancellationToken, delay: Duration) {
    let token = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        token.cancel();
    });
}

// -- Product summary --

#[tokio::test]
async fn test_summary_merges_both_records() {
    let h = TestHarness::new();

    let outcome = h.summary(1).await;

    let Outcome::Success(summary) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(summary.product_id, ProductId::new(1));
    assert_eq!(summary.stock, 100);
    assert_eq!(summary.sku, "SKU001");
    assert_eq!(summary.price, Money::from_cents(120050));
    assert_eq!(summary.currency, "USD");
    assert_eq!(summary.name, None);
    assert_eq!(h.inventory.call_count(), 1);
    assert_eq!(h.price.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_summary_does_not_depend_on_completion_order() {
    let h = TestHarness::new();

    h.inventory.set_latency(Some(Duration::from_millis(80)));
    h.price.set_latency(Some(Duration::from_millis(5)));
    let price_first = h.summary(3).await;

    h.inventory.set_latency(Some(Duration::from_millis(5)));
    h.price.set_latency(Some(Duration::from_millis(80)));
    let inventory_first = h.summary(3).await;

    assert!(price_first.is_success());
    assert_eq!(price_first, inventory_first);
}

#[tokio::test(start_paused = true)]
async fn test_fetches_run_concurrently() {
    let h = TestHarness::new();
    h.inventory.set_latency(Some(Duration::from_millis(300)));
    h.price.set_latency(Some(Duration::from_millis(300)));

    let started = tokio::time::Instant::now();
    let outcome = h.summary(1).await;

    assert!(outcome.is_success());
    assert!(started.elapsed() < Duration::from_millis(600));
}

#[tokio::test]
async fn test_missing_inventory_is_not_found_even_when_price_exists() {
    let h = TestHarness::new();
    h.price
        .insert(PriceRecord::new(99, Money::from_cents(100), "USD"));

    let outcome = h.summary(99).await;

    assert_eq!(
        outcome,
        Outcome::NotFound("inventory record for product 99 not found".to_string())
    );
}

#[tokio::test]
async fn test_missing_price_is_not_found() {
    let h = TestHarness::new();
    h.inventory
        .insert(upstream::InventoryRecord::new(4, 10, "SKU004"));

    let outcome = h.summary(4).await;

    assert_eq!(
        outcome,
        Outcome::NotFound("price for product 4 not found".to_string())
    );
}

#[tokio::test]
async fn test_not_found_wins_over_unavailable() {
    let h = TestHarness::new();
    h.price
        .set_failure(Some(FetchError::Unreachable("connection refused".to_string())));

    let outcome = h.summary(99).await;

    assert!(matches!(outcome, Outcome::NotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn test_price_timeout_cites_price_upstream() {
    let h = TestHarness::new();
    h.price.set_latency(Some(Duration::from_secs(10)));

    let outcome = h.summary(1).await;

    assert_eq!(
        outcome,
        Outcome::UpstreamUnavailable("price service timed out".to_string())
    );
}

#[tokio::test]
async fn test_two_unavailable_upstreams_cite_inventory_first() {
    let h = TestHarness::new();
    h.inventory.set_failure(Some(FetchError::Timeout));
    h.price
        .set_failure(Some(FetchError::Unreachable("connection refused".to_string())));

    let outcome = h.summary(1).await;

    assert_eq!(
        outcome,
        Outcome::UpstreamUnavailable(
            "inventory service timed out; price service unreachable: connection refused"
                .to_string()
        )
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_before_any_response() {
    let h = TestHarness::new();
    h.inventory.set_latency(Some(Duration::from_millis(100)));
    h.price.set_latency(Some(Duration::from_millis(100)));

    let token = CancellationToken::new();
    let request = LookupRequest::new(
        ProductId::new(1),
        token.clone(),
        tokio::time::Instant::now() + TIMEOUT,
    );
    cancel_after(&token, Duration::from_millis(1));

    let started = tokio::time::Instant::now();
    let outcome = h.orchestrator.get_product_summary(request).await;

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_discards_already_received_record() {
    let h = TestHarness::new();
    h.price.set_latency(Some(Duration::from_millis(100)));

    let token = CancellationToken::new();
    let request = LookupRequest::new(
        ProductId::new(1),
        token.clone(),
        tokio::time::Instant::now() + TIMEOUT,
    );
    cancel_after(&token, Duration::from_millis(10));

    let outcome = h.orchestrator.get_product_summary(request).await;

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(h.inventory.call_count(), 1);
}

#[tokio::test]
async fn test_already_cancelled_request() {
    let h = TestHarness::new();
    let token = CancellationToken::new();
    token.cancel();

    let outcome = h
        .orchestrator
        .get_product_summary(LookupRequest::new(
            ProductId::new(1),
            token,
            tokio::time::Instant::now() + TIMEOUT,
        ))
        .await;

    assert_eq!(outcome, Outcome::Cancelled);
}

#[tokio::test]
async fn test_repeated_summaries_are_identical() {
    let h = TestHarness::new();

    let first = h.summary(1).await;
    let second = h.summary(1).await;
    let missing_first = h.summary(42).await;
    let missing_second = h.summary(42).await;

    assert_eq!(first, second);
    assert_eq!(missing_first, missing_second);
}

#[tokio::test]
async fn test_catalog_short_circuits_unknown_products() {
    let h = TestHarness::with_catalog(ProductCatalog::new().with_product(1, "Super Laptop"));

    let outcome = h.summary(99).await;

    assert_eq!(
        outcome,
        Outcome::NotFound("product 99 is not in the catalog".to_string())
    );
    assert_eq!(h.inventory.call_count(), 0);
    assert_eq!(h.price.call_count(), 0);
}

#[tokio::test]
async fn test_catalog_name_is_merged_into_summary() {
    let h = TestHarness::with_catalog(ProductCatalog::new().with_product(1, "Super Laptop"));

    let Outcome::Success(summary) = h.summary(1).await else {
        panic!("expected success");
    };
    assert_eq!(summary.name.as_deref(), Some("Super Laptop"));
}

// -- Stock check --

#[tokio::test]
async fn test_check_stock_uses_inventory_only() {
    let h = TestHarness::new();

    let outcome = h
        .orchestrator
        .check_stock(LookupRequest::with_timeout(ProductId::new(2), TIMEOUT))
        .await;

    let Outcome::Success(level) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(level.stock, 0);
    assert!(!level.in_stock);
    assert_eq!(h.price.call_count(), 0);
}

#[tokio::test]
async fn test_check_stock_ignores_price_outage() {
    let h = TestHarness::new();
    h.price.set_failure(Some(FetchError::Timeout));

    let outcome = h
        .orchestrator
        .check_stock(LookupRequest::with_timeout(ProductId::new(1), TIMEOUT))
        .await;

    assert!(outcome.is_success());
}

// -- Order placement --

#[tokio::test]
async fn test_place_order_prices_and_records() {
    let h = TestHarness::new();

    let outcome = h
        .orchestrator
        .place_order(OrderRequest::with_timeout(ProductId::new(1), 3, TIMEOUT))
        .await
        .unwrap();

    let Outcome::Success(order) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(order.sku, "SKU001");
    assert_eq!(order.quantity, 3);
    assert_eq!(order.unit_price, Money::from_cents(120050));
    assert_eq!(order.total, Money::from_cents(360150));
    assert_eq!(order.currency, "USD");

    assert_eq!(h.orchestrator.get_order(order.order_id).await, Some(order.clone()));
    let orders = h.orchestrator.list_orders().await;
    assert_eq!(orders, vec![order]);
}

#[tokio::test]
async fn test_place_order_rejects_zero_quantity_without_fetching() {
    let h = TestHarness::new();

    let result = h
        .orchestrator
        .place_order(OrderRequest::with_timeout(ProductId::new(1), 0, TIMEOUT))
        .await;

    assert_eq!(result, Err(OrderError::InvalidQuantity));
    assert_eq!(h.inventory.call_count(), 0);
    assert_eq!(h.price.call_count(), 0);
}

#[tokio::test]
async fn test_place_order_rejects_insufficient_stock() {
    let h = TestHarness::new();

    let result = h
        .orchestrator
        .place_order(OrderRequest::with_timeout(ProductId::new(2), 1, TIMEOUT))
        .await;

    assert_eq!(
        result,
        Err(OrderError::InsufficientStock {
            requested: 1,
            available: 0
        })
    );
    assert!(h.orchestrator.order_book().is_empty().await);
}

#[tokio::test]
async fn test_place_order_upstream_failure_records_nothing() {
    let h = TestHarness::new();
    h.price
        .set_failure(Some(FetchError::Malformed("expected value".to_string())));

    let outcome = h
        .orchestrator
        .place_order(OrderRequest::with_timeout(ProductId::new(1), 1, TIMEOUT))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::UpstreamUnavailable(_)));
    assert!(h.orchestrator.list_orders().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_order_records_nothing() {
    let h = TestHarness::new();
    h.price.set_latency(Some(Duration::from_millis(50)));

    let token = CancellationToken::new();
    let request = OrderRequest::new(
        ProductId::new(1),
        1,
        token.clone(),
        tokio::time::Instant::now() + TIMEOUT,
    );
    cancel_after(&token, Duration::from_millis(1));

    let outcome = h.orchestrator.place_order(request).await.unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(h.orchestrator.list_orders().await.is_empty());
}
