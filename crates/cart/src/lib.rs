//! RocketShoes Cart - stock-checked shopping cart.
//!
//! # Architecture
//!
//! - [`CartManager`] owns the in-memory [`Cart`] and is its only writer
//! - Collaborators are injected through three ports:
//!   [`InventoryService`], [`PersistentStore`] and [`NotificationChannel`]
//! - Every mutation computes a candidate cart, persists it, and only then
//!   commits it in memory; a failure at any step leaves the cart unchanged
//! - [`CartHandle`] runs a manager on its own task and serializes operations
//!   issued from many tasks
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartManager, FileStore, HttpInventory, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let inventory = HttpInventory::new(&config.inventory)?;
//! let store = FileStore::new(&config.store_path);
//!
//! let mut manager = CartManager::load(inventory, store, TracingNotifier).await?;
//! manager.add_product(ProductId::new(1)).await?;
//! ```
//!
//! [`Cart`]: rocketshoes_core::Cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod handle;
pub mod inventory;
pub mod manager;
pub mod notify;
pub mod storage;

pub use config::{CartConfig, ConfigError, InventoryConfig};
pub use error::{CartError, CartOperation};
pub use handle::CartHandle;
pub use inventory::{HttpInventory, InventoryError, InventoryService};
pub use manager::CartManager;
pub use notify::{NotificationChannel, TracingNotifier};
pub use storage::{CART_STORAGE_KEY, FileStore, MemoryStore, PersistentStore, StoreError};
