//! Persistent key-value storage for the cart snapshot.
//!
//! The cart is stored under a single key, [`CART_STORAGE_KEY`], as a JSON
//! array of products. Every write replaces the whole snapshot.
//!
//! # Adapters
//!
//! - [`FileStore`] - one JSON object per scope file, used by the CLI
//! - [`MemoryStore`] - in-process map for tests and ephemeral sessions

mod file;
mod memory;

use std::future::Future;

use rocketshoes_core::Cart;
use thiserror::Error;
use tracing::{debug, warn};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the cart snapshot is stored.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors that can occur when reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backing data is not in the expected format.
    #[error("Corrupt store: {0}")]
    Corrupt(String),
}

/// Scoped string key-value store.
pub trait PersistentStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Load the persisted cart, or an empty cart if none was saved.
///
/// An unreadable snapshot is logged and discarded; the next successful
/// mutation overwrites it.
///
/// # Errors
///
/// Returns an error if the store itself cannot be read.
pub async fn load_cart<S: PersistentStore>(store: &S) -> Result<Cart, StoreError> {
    let Some(raw) = store.get(CART_STORAGE_KEY).await? else {
        debug!("No saved cart, starting empty");
        return Ok(Cart::new());
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => {
            debug!(items = cart.len(), "Loaded saved cart");
            Ok(cart)
        }
        Err(e) => {
            warn!(error = %e, "Discarding unreadable cart snapshot");
            Ok(Cart::new())
        }
    }
}

/// Overwrite the persisted snapshot with `cart`.
///
/// # Errors
///
/// Returns an error if the cart cannot be serialized or written.
pub async fn save_cart<S: PersistentStore>(store: &S, cart: &Cart) -> Result<(), StoreError> {
    let value = serde_json::to_string(cart)?;
    store.set(CART_STORAGE_KEY, value).await
}
