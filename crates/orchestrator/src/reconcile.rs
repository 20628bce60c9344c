//! Reconciliation of upstream fetch results into an [`Outcome`].
//!
//! Priority, highest first:
//! 1. cancellation by the caller → `Cancelled`
//! 2. any `NotFound` → `NotFound` (inventory named first if both are missing)
//! 3. any other failure → `UpstreamUnavailable` listing every failed upstream,
//!    inventory first
//! 4. otherwise → `Success`
//!
//! A confirmed absence outranks a transient failure when both happen in the
//! same request. The result depends only on the fetch results and the
//! cancellation flag, never on completion order.

use common::ProductId;
use upstream::{FetchError, InventoryRecord, PriceRecord};

use crate::outcome::Outcome;

/// The upstream services the orchestrator fans out to, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Upstream {
    Inventory,
    Price,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Inventory => "inventory",
            Upstream::Price => "price",
        }
    }

    fn resource(&self) -> &'static str {
        match self {
            Upstream::Inventory => "inventory record",
            Upstream::Price => "price",
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconciles the inventory and price fetches of one request.
pub fn reconcile(
    product_id: ProductId,
    inventory: Result<InventoryRecord, FetchError>,
    price: Result<PriceRecord, FetchError>,
    cancelled: bool,
) -> Outcome<(InventoryRecord, PriceRecord)> {
    if cancelled {
        return Outcome::Cancelled;
    }

    match (inventory, price) {
        (Ok(inventory), Ok(price)) => Outcome::Success((inventory, price)),
        (inventory, price) => {
            let failures = [
                inventory.err().map(|err| (Upstream::Inventory, err)),
                price.err().map(|err| (Upstream::Price, err)),
            ];
            failure_outcome(product_id, failures.into_iter().flatten().collect())
        }
    }
}

/// Reconciles a single upstream fetch, for operations that need only one.
pub fn reconcile_single<T>(
    product_id: ProductId,
    upstream: Upstream,
    result: Result<T, FetchError>,
    cancelled: bool,
) -> Outcome<T> {
    if cancelled {
        return Outcome::Cancelled;
    }

    match result {
        Ok(record) => Outcome::Success(record),
        Err(err) => failure_outcome(product_id, vec![(upstream, err)]),
    }
}

fn failure_outcome<T>(product_id: ProductId, failures: Vec<(Upstream, FetchError)>) -> Outcome<T> {
    if let Some((upstream, _)) = failures
        .iter()
        .find(|(_, err)| matches!(err, FetchError::NotFound))
    {
        return Outcome::NotFound(format!(
            "{} for product {product_id} not found",
            upstream.resource()
        ));
    }

    let reason = failures
        .iter()
        .map(|(upstream, err)| describe(*upstream, err))
        .collect::<Vec<_>>()
        .join("; ");
    Outcome::UpstreamUnavailable(reason)
}

fn describe(upstream: Upstream, err: &FetchError) -> String {
    match err {
        FetchError::NotFound => format!("{} not found", upstream.resource()),
        FetchError::Unreachable(detail) => format!("{upstream} service unreachable: {detail}"),
        FetchError::Timeout => format!("{upstream} service timed out"),
        // The caller's token was not cancelled, so the upstream gave up on its own.
        FetchError::Cancelled => format!("{upstream} fetch was cancelled"),
        FetchError::Malformed(detail) => {
            format!("{upstream} service sent a malformed response: {detail}")
        }
    }
}
