//! Catalog products and stock levels.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A catalog product, optionally carrying the quantity held in a cart.
///
/// The inventory API returns products without an `amount`; the field then
/// defaults to `0` and only becomes meaningful once the product is in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Display name. Serialized as `title`, `name` is accepted on input.
    #[serde(alias = "name")]
    pub title: String,
    /// Unit price in the store currency.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    /// Quantity held in the cart.
    #[serde(default)]
    pub amount: i64,
}

/// Available inventory for a product.
///
/// Always fetched fresh; stock can change at any time outside the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub product_id: ProductId,
    pub amount: i64,
}

impl Stock {
    /// Create a stock level for a product.
    #[must_use]
    pub const fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }

    /// Whether `requested` units can be held in a cart.
    #[must_use]
    pub const fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}
