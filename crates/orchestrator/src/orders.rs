//! Order placement types and the in-memory order book.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Input to [`crate::Orchestrator::place_order`].
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub cancel: CancellationToken,
    pub deadline: Instant,
}

impl OrderRequest {
    pub fn new(
        product_id: ProductId,
        quantity: u32,
        cancel: CancellationToken,
        deadline: Instant,
    ) -> Self {
        Self {
            product_id,
            quantity,
            cancel,
            deadline,
        }
    }

    /// A request with a fresh token and a deadline `timeout` from now.
    pub fn with_timeout(product_id: ProductId, quantity: u32, timeout: Duration) -> Self {
        Self::new(
            product_id,
            quantity,
            CancellationToken::new(),
            Instant::now() + timeout,
        )
    }
}

/// A placed order, priced at the moment it was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub order_id: Uuid,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total: Money,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Orders placed during the lifetime of the process, in placement order.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    pub async fn all(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }

    pub async fn get(&self, order_id: Uuid) -> Option<Order> {
        self.orders
            .read()
            .await
            .iter()
            .find(|order| order.order_id == order_id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(sku: &str) -> Order {
        Order {
            order_id: Uuid::new_v4(),
            product_id: ProductId::new(1),
            product_name: None,
            sku: sku.to_string(),
            quantity: 2,
            unit_price: Money::from_cents(1000),
            total: Money::from_cents(2000),
            currency: "USD".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_book_keeps_placement_order() {
        let book = OrderBook::new();
        assert!(book.is_empty().await);

        let first = order("A");
        let second = order("B");
        book.record(first.clone()).await;
        book.record(second.clone()).await;

        assert_eq!(book.len().await, 2);
        assert_eq!(book.all().await, vec![first.clone(), second]);
        assert_eq!(book.get(first.order_id).await, Some(first));
        assert_eq!(book.get(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn test_clones_share_the_same_book() {
        let book = OrderBook::new();
        let clone = book.clone();
        clone.record(order("A")).await;
        assert_eq!(book.len().await, 1);
    }
}
