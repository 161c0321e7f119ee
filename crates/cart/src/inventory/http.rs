//! REST inventory client.
//!
//! Talks to the inventory API with `reqwest`:
//! - `GET {base}/products/{id}` returns `{id, title, price, image}`
//! - `GET {base}/stock/{id}` returns `{id, amount}`
//!
//! Product details are cached with `moka`. Stock is never cached.

use std::sync::Arc;

use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::{InventoryError, InventoryService};
use crate::config::InventoryConfig;

/// Maximum number of product entries kept in the cache.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Stock payload as returned by the API.
#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: i64,
}

/// HTTP client for the inventory API.
///
/// Cheaply cloneable; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct HttpInventory {
    inner: Arc<HttpInventoryInner>,
}

struct HttpInventoryInner {
    client: reqwest::Client,
    base_url: String,
    products: Option<Cache<ProductId, Product>>,
}

impl HttpInventory {
    /// Create a new inventory client.
    ///
    /// A zero `product_cache_ttl` disables product caching.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder().build()?;

        let products = (!config.product_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(PRODUCT_CACHE_CAPACITY)
                .time_to_live(config.product_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(HttpInventoryInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                products,
            }),
        })
    }

    fn endpoint(&self, resource: &str, product_id: ProductId) -> String {
        format!("{}/{resource}/{product_id}", self.inner.base_url)
    }

    /// GET a JSON resource, mapping 404 to `NotFound`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        product_id: ProductId,
    ) -> Result<T, InventoryError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(product_id));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %message.chars().take(500).collect::<String>(),
                "Inventory API returned non-success status"
            );
            return Err(InventoryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| InventoryError::Parse(e.to_string()))
    }
}

impl InventoryService for HttpInventory {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        if let Some(cache) = &self.inner.products
            && let Some(product) = cache.get(&product_id).await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let url = self.endpoint("products", product_id);
        let product: Product = self.fetch(&url, product_id).await?;

        if product.id != product_id {
            return Err(InventoryError::Parse(format!(
                "requested product {product_id}, received {}",
                product.id
            )));
        }

        if let Some(cache) = &self.inner.products {
            cache.insert(product_id, product.clone()).await;
        }

        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock, InventoryError> {
        let url = self.endpoint("stock", product_id);
        let stock: StockResponse = self.fetch(&url, product_id).await?;

        debug!(amount = stock.amount, "Fetched stock");
        Ok(Stock::new(product_id, stock.amount))
    }
}
