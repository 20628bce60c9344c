//! Views composed from upstream records.

use common::{Money, ProductId};
use serde::Serialize;
use upstream::{InventoryRecord, PriceRecord};

/// Availability and price of one product, merged from both upstreams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub product_id: ProductId,
    pub name: Option<String>,
    pub stock: u32,
    pub sku: String,
    pub price: Money,
    pub currency: String,
}

impl ProductSummary {
    /// Merges the two records. The product id is taken from the inventory record.
    pub fn merge(inventory: InventoryRecord, price: PriceRecord, name: Option<String>) -> Self {
        Self {
            product_id: inventory.product_id,
            name,
            stock: inventory.stock,
            sku: inventory.sku,
            price: price.amount,
            currency: price.currency,
        }
    }
}

/// Stock of one product, from the inventory service alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    pub product_id: ProductId,
    pub name: Option<String>,
    pub stock: u32,
    pub sku: String,
    pub in_stock: bool,
}

impl StockLevel {
    pub fn from_inventory(inventory: InventoryRecord, name: Option<String>) -> Self {
        Self {
            product_id: inventory.product_id,
            name,
            in_stock: inventory.stock > 0,
            stock: inventory.stock,
            sku: inventory.sku,
        }
    }
}
