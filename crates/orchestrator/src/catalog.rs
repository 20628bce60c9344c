//! Local product catalog used to short-circuit unknown products.

use std::collections::HashMap;
use std::str::FromStr;

use common::ProductId;

use crate::error::CatalogError;

/// Marketing names of the products this deployment knows about.
///
/// When an orchestrator has a catalog, a product missing from it is reported
/// as not found without contacting any upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCatalog {
    names: HashMap<ProductId, String>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_product(mut self, product_id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        self.insert(product_id, name);
        self
    }

    pub fn insert(&mut self, product_id: impl Into<ProductId>, name: impl Into<String>) {
        self.names.insert(product_id.into(), name.into());
    }

    pub fn name(&self, product_id: ProductId) -> Option<&str> {
        self.names.get(&product_id).map(String::as_str)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.names.contains_key(&product_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parses `"1=Super Laptop;2=Gaming Mouse"`. Blank entries are ignored.
impl FromStr for ProductCatalog {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut catalog = ProductCatalog::new();
        for entry in s.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (id, name) = entry
                .split_once('=')
                .ok_or_else(|| CatalogError::InvalidEntry(entry.to_string()))?;
            let id: ProductId = id
                .parse()
                .map_err(|_| CatalogError::InvalidEntry(entry.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(CatalogError::InvalidEntry(entry.to_string()));
            }
            if catalog.contains(id) {
                return Err(CatalogError::DuplicateProduct(id.as_i64()));
            }
            catalog.insert(id, name);
        }
        Ok(catalog)
    }
}
