//! The shopping cart and its pure transitions.
//!
//! A [`Cart`] is never mutated in place by callers. Each transition returns a
//! candidate cart which the owner persists first and commits second, so a
//! failure at any step leaves the current cart untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Product, ProductId, Stock};

/// A rule the cart refused to break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartRuleViolation {
    /// The requested quantity exceeds the available stock.
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// Why a stored list of products is not a valid cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// A cart line must hold at least one unit.
    #[error("product {product_id}: invalid amount {amount}")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    /// Product ids are unique within a cart.
    #[error("product {0} appears more than once")]
    DuplicateProduct(ProductId),
}

/// Request to set the quantity of a product already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Ordered collection of products, each with a cart quantity.
///
/// Serializes as a bare JSON array of products. Deserialization rejects
/// duplicate ids and non-positive amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Products in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Iterate over the products in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the cart line for a product.
    #[must_use]
    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|item| item.id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.find(product_id).is_some()
    }

    /// Quantity of a product in the cart, `0` when absent.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> i64 {
        self.find(product_id).map_or(0, |item| item.amount)
    }

    /// Total number of units across all lines, saturating at `i64::MAX`.
    #[must_use]
    pub fn total_items(&self) -> i64 {
        self.items
            .iter()
            .map(|item| item.amount)
            .fold(0, i64::saturating_add)
    }

    /// Add one unit of `product`.
    ///
    /// An existing line keeps its product details and gains one unit; a new
    /// line is appended with the fetched details and an amount of one.
    ///
    /// # Errors
    ///
    /// Returns `OutOfStock` if the resulting amount would exceed `stock` or
    /// cannot be represented.
    pub fn with_added(&self, product: &Product, stock: &Stock) -> Result<Self, CartRuleViolation> {
        let current = self.amount_of(product.id);
        let Some(requested) = current.checked_add(1).filter(|&n| stock.covers(n)) else {
            return Err(CartRuleViolation::OutOfStock {
                product_id: product.id,
                requested: current.saturating_add(1),
                available: stock.amount,
            });
        };

        let mut items = self.items.clone();
        match items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.amount = requested,
            None => items.push(Product {
                amount: 1,
                ..product.clone()
            }),
        }

        Ok(Self { items })
    }

    /// Remove the line for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotInCart` if there is no such line.
    pub fn without(&self, product_id: ProductId) -> Result<Self, CartRuleViolation> {
        if !self.contains(product_id) {
            return Err(CartRuleViolation::NotInCart(product_id));
        }

        let items = self
            .items
            .iter()
            .filter(|item| item.id != product_id)
            .cloned()
            .collect();

        Ok(Self { items })
    }

    /// Set the amount of an existing line.
    ///
    /// A non-positive `amount` leaves the cart as it is. Stock is checked
    /// before the line is looked up, so an out-of-stock request for a product
    /// not in the cart reports `OutOfStock`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfStock` if `amount` exceeds `stock`, and `NotInCart` if
    /// there is no such line.
    pub fn with_amount(
        &self,
        product_id: ProductId,
        amount: i64,
        stock: &Stock,
    ) -> Result<Self, CartRuleViolation> {
        if amount < 1 {
            return Ok(self.clone());
        }
        if !stock.covers(amount) {
            return Err(CartRuleViolation::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let mut items = self.items.clone();
        let line = items
            .iter_mut()
            .find(|item| item.id == product_id)
            .ok_or(CartRuleViolation::NotInCart(product_id))?;
        line.amount = amount;

        Ok(Self { items })
    }
}

impl TryFrom<Vec<Product>> for Cart {
    type Error = SnapshotError;

    fn try_from(items: Vec<Product>) -> Result<Self, Self::Error> {
        for (index, item) in items.iter().enumerate() {
            if item.amount < 1 {
                return Err(SnapshotError::InvalidAmount {
                    product_id: item.id,
                    amount: item.amount,
                });
            }
            if items.iter().take(index).any(|earlier| earlier.id == item.id) {
                return Err(SnapshotError::DuplicateProduct(item.id));
            }
        }

        Ok(Self { items })
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
