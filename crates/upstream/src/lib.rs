//! Upstream client interface for the inventory and price services.
//!
//! Every fetch runs inside a [`FetchScope`]: a deadline plus a cancellation
//! token. Whichever fires first abandons the in-flight request, and every
//! transport fault is converted into a typed [`FetchError`] at this boundary.
//! No retries happen here.
//!
//! Two implementations are provided per upstream:
//! - HTTP clients backed by a shared `reqwest::Client`
//! - in-memory services used as fixtures by tests and the local demo mode

pub mod error;
pub mod http;
pub mod inventory;
pub mod price;
pub mod records;
pub mod scope;

pub use error::FetchError;
pub use http::{HttpInventoryClient, HttpPriceClient, build_http_client};
pub use inventory::{InMemoryInventoryService, InventoryClient};
pub use price::{InMemoryPriceService, PriceClient};
pub use records::{InventoryRecord, PriceRecord};
pub use scope::FetchScope;
