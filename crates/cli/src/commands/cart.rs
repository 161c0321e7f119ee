//! Cart commands.
//!
//! # Environment Variables
//!
//! - `INVENTORY_API_URL` - Inventory API base URL
//! - `CART_STORE_PATH` - File holding the persisted cart
//! - `INVENTORY_PRODUCT_CACHE_TTL_SECS` - Product details cache TTL

use rocketshoes_cart::{CartConfig, CartManager, FileStore, HttpInventory, TracingNotifier};
use rocketshoes_core::Cart;
use tracing::info;

/// Cart manager wired to the HTTP inventory and the file store.
pub type Manager = CartManager<HttpInventory, FileStore, TracingNotifier>;

/// Load configuration and restore the saved cart.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the HTTP client cannot
/// be built, or the store cannot be read.
pub async fn open() -> Result<Manager, Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    info!(
        inventory = %config.inventory.base_url,
        store = %config.store_path.display(),
        "Opening cart"
    );

    let inventory = HttpInventory::new(&config.inventory)?;
    let store = FileStore::new(&config.store_path);

    Ok(CartManager::load(inventory, store, TracingNotifier).await?)
}

/// Print the cart as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if the cart cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print(cart: &Cart) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(cart)?);
    info!(products = cart.len(), units = cart.total_items(), "Cart printed");
    Ok(())
}
