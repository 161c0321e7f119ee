//! Inventory lookups: product details and stock levels.
//!
//! The cart only reads from the inventory. Any lookup failure is reported to
//! the caller as [`CartError::RemoteFetchFailure`](crate::CartError).

mod http;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use http::HttpInventory;

/// Errors that can occur when querying the inventory.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The inventory has no such product.
    #[error("Not found: product {0}")]
    NotFound(ProductId),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Read-only access to product details and stock levels.
///
/// Both lookups are independent and independently fallible.
pub trait InventoryService: Send + Sync {
    /// Fetch catalog details for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the lookup fails.
    fn get_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Product, InventoryError>> + Send;

    /// Fetch the current stock level for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the lookup fails.
    fn get_stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Stock, InventoryError>> + Send;
}
