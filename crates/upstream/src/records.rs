//! Records returned by the inventory and price services.
//!
//! Both services have been seen answering in camelCase (`productId`,
//! `basePrice`) as well as snake_case, so the field aliases accept either.
//! Records are always written back out in snake_case.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// Stock level of one product, as reported by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(alias = "productId", alias = "productID")]
    pub product_id: ProductId,
    pub stock: u32,
    #[serde(alias = "SKU")]
    pub sku: String,
}

impl InventoryRecord {
    pub fn new(product_id: impl Into<ProductId>, stock: u32, sku: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            stock,
            sku: sku.into(),
        }
    }
}

/// Unit price of one product, as reported by the price service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(alias = "productId")]
    pub product_id: ProductId,
    #[serde(alias = "basePrice", alias = "base_price")]
    pub amount: Money,
    pub currency: String,
}

impl PriceRecord {
    pub fn new(product_id: impl Into<ProductId>, amount: Money, currency: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            amount,
            currency: currency.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_accepts_camel_case() {
        let record: InventoryRecord =
            serde_json::from_str(r#"{"productId":1,"stock":100,"sku":"SKU001"}"#).unwrap();
        assert_eq!(record, InventoryRecord::new(1, 100, "SKU001"));
    }

    #[test]
    fn test_inventory_rejects_negative_stock() {
        let result =
            serde_json::from_str::<InventoryRecord>(r#"{"product_id":1,"stock":-3,"sku":"X"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_price_accepts_base_price_alias() {
        let record: PriceRecord =
            serde_json::from_str(r#"{"productId":1,"basePrice":1200.50,"currency":"USD"}"#)
                .unwrap();
        assert_eq!(record.amount, Money::from_cents(120050));
        assert_eq!(record.currency, "USD");
    }

    #[test]
    fn test_price_writes_snake_case() {
        let json =
            serde_json::to_value(PriceRecord::new(3, Money::from_cents(45000), "USD")).unwrap();
        assert_eq!(json["product_id"], 3);
        assert_eq!(json["amount"], 450.0);
        assert_eq!(json["currency"], "USD");
    }
}
