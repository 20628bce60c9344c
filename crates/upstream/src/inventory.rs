//! Inventory client trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::ProductId;

use crate::error::FetchError;
use crate::records::InventoryRecord;
use crate::scope::FetchScope;

/// Fetches stock levels from the inventory service.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Looks up the inventory record for a product.
    ///
    /// Must return promptly with `Timeout` or `Cancelled` once the scope's
    /// deadline passes or its token fires.
    async fn fetch_inventory(
        &self,
        product_id: ProductId,
        scope: &FetchScope,
    ) -> Result<InventoryRecord, FetchError>;
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    records: HashMap<ProductId, InventoryRecord>,
    latency: Option<Duration>,
    fail_with: Option<FetchError>,
    calls: usize,
}

/// In-memory inventory service for tests and local demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryService {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryService {
    /// Creates an empty in-memory inventory service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service holding the three demo products.
    pub fn seeded() -> Self {
        let service = Self::new();
        service.insert(InventoryRecord::new(1, 100, "SKU001"));
        service.insert(InventoryRecord::new(2, 0, "SKU002"));
        service.insert(InventoryRecord::new(3, 200, "SKU003"));
        service
    }

    /// Adds or replaces the record for a product.
    pub fn insert(&self, record: InventoryRecord) {
        self.write().records.insert(record.product_id, record);
    }

    /// Delays every answer by `latency`, or removes the delay with `None`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.write().latency = latency;
    }

    /// Makes every fetch fail with `error`, or restores normal lookups with `None`.
    pub fn set_failure(&self, error: Option<FetchError>) {
        self.write().fail_with = error;
    }

    /// Returns how many fetches have been issued against this service.
    pub fn call_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryInventoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventoryService {
    async fn fetch_inventory(
        &self,
        product_id: ProductId,
        scope: &FetchScope,
    ) -> Result<InventoryRecord, FetchError> {
        let (latency, answer) = {
            let mut state = self.write();
            state.calls += 1;
            let answer = match &state.fail_with {
                Some(err) => Err(err.clone()),
                None => state
                    .records
                    .get(&product_id)
                    .cloned()
                    .ok_or(FetchError::NotFound),
            };
            (state.latency, answer)
        };

        scope
            .guard(async move {
                if let Some(latency) = latency {
                    tokio::time::sleep(latency).await;
                }
                answer
            })
            .await
    }
}
