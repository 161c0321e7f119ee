//! Cart operation errors and their user-facing messages.
//!
//! Every cart mutation returns `Result<(), CartError>`. The manager also sends
//! the operation's fixed message to the injected notification channel, so a
//! single presentation layer can rely on notices while other callers match on
//! the error kind.

use rocketshoes_core::{CartRuleViolation, ProductId};
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::storage::StoreError;

/// Shown when a requested quantity exceeds the available stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Quantidade solicitada fora de estoque";
/// Shown when adding a product fails for any other reason.
pub const ADD_FAILED_MESSAGE: &str = "Erro na adição do produto";
/// Shown when removing a product fails.
pub const REMOVE_FAILED_MESSAGE: &str = "Erro na remoção do produto";
/// Shown when changing a product's quantity fails for any other reason.
pub const UPDATE_FAILED_MESSAGE: &str = "Erro na alteração de quantidade do produto";

/// The cart operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartOperation {
    /// Message shown when this operation fails for a reason other than stock.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => ADD_FAILED_MESSAGE,
            Self::Remove => REMOVE_FAILED_MESSAGE,
            Self::Update => UPDATE_FAILED_MESSAGE,
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
        })
    }
}

/// Why a cart operation failed.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity exceeds the available stock.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// A product or stock lookup failed.
    #[error("inventory lookup failed: {0}")]
    RemoteFetchFailure(#[from] InventoryError),

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// The cart snapshot could not be persisted.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// The cart task is no longer running.
    #[error("cart is closed")]
    Closed,
}

impl CartError {
    /// The fixed user-facing message for this error in `operation`.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => OUT_OF_STOCK_MESSAGE,
            _ => operation.failure_message(),
        }
    }

    /// Whether the error is a business rejection rather than a collaborator failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::InsufficientStock { .. } | Self::ItemNotFound(_))
    }
}

impl From<CartRuleViolation> for CartError {
    fn from(violation: CartRuleViolation) -> Self {
        match violation {
            CartRuleViolation::OutOfStock {
                product_id,
                requested,
                available,
            } => Self::InsufficientStock {
                product_id,
                requested,
                available,
            },
            CartRuleViolation::NotInCart(product_id) => Self::ItemNotFound(product_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::ItemNotFound(ProductId::new(3));
        assert_eq!(err.to_string(), "product 3 is not in the cart");

        let err = CartError::InsufficientStock {
            product_id: ProductId::new(1),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product 1: requested 6, available 5"
        );
    }

    #[test]
    fn test_user_messages() {
        let out_of_stock = CartError::InsufficientStock {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        };
        assert_eq!(out_of_stock.user_message(CartOperation::Add), OUT_OF_STOCK_MESSAGE);
        assert_eq!(out_of_stock.user_message(CartOperation::Update), OUT_OF_STOCK_MESSAGE);

        let remote = CartError::RemoteFetchFailure(InventoryError::NotFound(ProductId::new(1)));
        assert_eq!(remote.user_message(CartOperation::Add), ADD_FAILED_MESSAGE);
        assert_eq!(remote.user_message(CartOperation::Update), UPDATE_FAILED_MESSAGE);

        let missing = CartError::ItemNotFound(ProductId::new(1));
        assert_eq!(missing.user_message(CartOperation::Remove), REMOVE_FAILED_MESSAGE);
        assert_eq!(missing.user_message(CartOperation::Update), UPDATE_FAILED_MESSAGE);
    }

    #[test]
    fn test_rule_violation_mapping() {
        let err = CartError::from(CartRuleViolation::NotInCart(ProductId::new(2)));
        assert!(matches!(err, CartError::ItemNotFound(id) if id == ProductId::new(2)));
        assert!(err.is_rejection());

        let err = CartError::from(CartRuleViolation::OutOfStock {
            product_id: ProductId::new(2),
            requested: 4,
            available: 3,
        });
        assert!(matches!(
            err,
            CartError::InsufficientStock {
                requested: 4,
                available: 3,
                ..
            }
        ));
        assert!(err.is_rejection());
        assert!(!CartError::Closed.is_rejection());
    }
}
