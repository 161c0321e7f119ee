//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::{Cart, CartRuleViolation, SnapshotError, UpdateProductAmount};
pub use id::*;
pub use product::{Product, Stock};
