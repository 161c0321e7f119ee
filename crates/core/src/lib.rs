//! RocketShoes Core - Cart data model.
//!
//! This crate provides the types shared by every RocketShoes component:
//! - `cart` - Cart manager, collaborator ports and adapters
//! - `cli` - Command-line consumer of the cart operations
//!
//! # Architecture
//!
//! The core crate contains only types and pure transitions - no I/O, no
//! storage access, no HTTP clients. Every cart mutation is computed here as a
//! new [`Cart`] value so that callers can persist it before committing it.
//!
//! # Modules
//!
//! - [`types`] - Product ids, products, stock levels and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
