//! HTTP clients for the inventory and price services.

use std::time::Duration;

use async_trait::async_trait;
use common::ProductId;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::inventory::InventoryClient;
use crate::price::PriceClient;
use crate::records::{InventoryRecord, PriceRecord};
use crate::scope::FetchScope;

/// Builds the connection pool shared by both upstream clients.
///
/// `request_timeout` is a transport-level ceiling; the per-request deadline in
/// [`FetchScope`] is normally tighter and fires first.
pub fn build_http_client(request_timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .connect_timeout(request_timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
}

/// Inventory client speaking `GET {base_url}/inventory/{id}`.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    #[tracing::instrument(skip(self, scope), fields(upstream = "inventory"))]
    async fn fetch_inventory(
        &self,
        product_id: ProductId,
        scope: &FetchScope,
    ) -> Result<InventoryRecord, FetchError> {
        let url = format!("{}/inventory/{product_id}", self.base_url);
        let record: InventoryRecord = scope.guard(get_json(&self.http, &url, "inventory")).await?;
        check_product_id(product_id, record.product_id)?;
        Ok(record)
    }
}

/// Price client speaking `GET {base_url}/price/{id}`.
#[derive(Debug, Clone)]
pub struct HttpPriceClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPriceClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: trim_base(base_url.into()),
        }
    }
}

#[async_trait]
impl PriceClient for HttpPriceClient {
    #[tracing::instrument(skip(self, scope), fields(upstream = "price"))]
    async fn fetch_price(
        &self,
        product_id: ProductId,
        scope: &FetchScope,
    ) -> Result<PriceRecord, FetchError> {
        let url = format!("{}/price/{product_id}", self.base_url);
        let record: PriceRecord = scope.guard(get_json(&self.http, &url, "price")).await?;
        check_product_id(product_id, record.product_id)?;
        Ok(record)
    }
}

/// Issues one GET and maps the answer onto [`FetchError`].
///
/// 404 is a confirmed absence; any other non-2xx status means the service is
/// not answering usefully.
async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    upstream: &'static str,
) -> Result<T, FetchError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(FetchError::from_transport)?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound);
    }
    if !status.is_success() {
        tracing::debug!(%status, upstream, "unexpected upstream status");
        return Err(FetchError::Unreachable(format!(
            "{upstream} service returned status {}",
            status.as_u16()
        )));
    }

    let body = response.bytes().await.map_err(FetchError::from_transport)?;
    serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.to_string()))
}

fn check_product_id(requested: ProductId, returned: ProductId) -> Result<(), FetchError> {
    if requested == returned {
        Ok(())
    } else {
        Err(FetchError::Malformed(format!(
            "asked for product {requested}, got product {returned}"
        )))
    }
}

fn trim_base(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
