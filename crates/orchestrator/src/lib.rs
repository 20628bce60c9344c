//! Fan-out orchestration over the inventory and price services.
//!
//! For one product the orchestrator:
//! 1. Short-circuits to `NotFound` if a local catalog is configured and does
//!    not know the product
//! 2. Fetches inventory and price concurrently under one deadline and one
//!    cancellation token
//! 3. Joins both fetches and reconciles them into a single [`Outcome`]
//!
//! Upstream failures never surface as errors; they become `Outcome` variants.
//! Order placement builds on the same fan-out and keeps placed orders in an
//! in-memory [`OrderBook`].

pub mod catalog;
pub mod error;
pub mod orchestrator;
pub mod orders;
pub mod outcome;
pub mod reconcile;
pub mod summary;

pub use catalog::ProductCatalog;
pub use error::{CatalogError, OrderError};
pub use orchestrator::{LookupRequest, Orchestrator};
pub use orders::{Order, OrderBook, OrderRequest};
pub use outcome::Outcome;
pub use reconcile::Upstream;
pub use summary::{ProductSummary, StockLevel};
