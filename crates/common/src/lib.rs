//! Value types shared by the upstream clients, the orchestrator and the API.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::ProductId;
