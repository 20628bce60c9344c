//! Price client trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::{Money, ProductId};

use crate::error::FetchError;
use crate::records::PriceRecord;
use crate::scope::FetchScope;

/// Fetches unit prices from the price service.
#[async_trait]
pub trait PriceClient: Send + Sync {
    /// Looks up the price record for a product.
    ///
    /// Must return promptly with `Timeout` or `Cancelled` once the scope's
    /// deadline passes or its token fires.
    async fn fetch_price(
        &self,
        product_id: ProductId,
        scope: &FetchScope,
    ) -> Result<PriceRecord, FetchError>;
}

#[derive(Debug, Default)]
struct InMemoryPriceState {
    records: HashMap<ProductId, PriceRecord>,
    latency: Option<Duration>,
    fail_with: Option<FetchError>,
    calls: usize,
}

/// In-memory price service for tests and local demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceService {
    state: Arc<RwLock<InMemoryPriceState>>,
}

impl InMemoryPriceService {
    /// Creates an empty in-memory price service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service holding the three demo prices.
    pub fn seeded() -> Self {
        let service = Self::new();
        service.insert(PriceRecord::new(1, Money::from_cents(120050), "USD"));
        service.insert(PriceRecord::new(2, Money::from_cents(95000000), "COP"));
        service.insert(PriceRecord::new(3, Money::from_cents(45000), "USD"));
        service
    }

    /// Adds or replaces the record for a product.
    pub fn insert(&self, record: PriceRecord) {
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

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryPriceState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PriceClient for InMemoryPriceService {
    async fn fetch_price(
        &self,
        product_id: ProductId,
        scope: &FetchScope,
    ) -> Result<PriceRecord, FetchError> {
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
