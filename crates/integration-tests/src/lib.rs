//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! The tests start a [`FakeInventory`] server on a random local port and
//! persist carts to a [`ScratchDir`] under the system temp directory, so no
//! external services are needed.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart operations over HTTP with a file-backed store
//! - `concurrent_cart` - Cart handles shared between tasks

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use rocketshoes_cart::{FileStore, InventoryConfig, NotificationChannel};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Mutable inventory served by [`FakeInventory`].
#[derive(Default)]
pub struct InventoryState {
    products: Mutex<HashMap<i32, Value>>,
    stock: Mutex<HashMap<i32, i64>>,
    failing: AtomicBool,
    product_requests: AtomicUsize,
    stock_requests: AtomicUsize,
}

/// In-process inventory API answering `/products/{id}` and `/stock/{id}`.
///
/// The server task is aborted when the value is dropped.
pub struct FakeInventory {
    base_url: String,
    state: Arc<InventoryState>,
    task: JoinHandle<()>,
}

impl FakeInventory {
    /// Bind to a random local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let state = Arc::new(InventoryState::default());

        let app = Router::new()
            .route("/products/{id}", get(product))
            .route("/stock/{id}", get(stock))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            task,
        }
    }

    /// Client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the base URL does not parse.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn config(&self, product_cache_ttl: Duration) -> InventoryConfig {
        InventoryConfig {
            base_url: self.base_url.parse().unwrap(),
            product_cache_ttl,
        }
    }

    /// Register a product and its stock.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn insert_product(&self, id: i32, title: &str, price: f64, stock: i64) {
        self.state.products.lock().unwrap().insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
            }),
        );
        self.set_stock(id, stock);
    }

    /// Change the stock of a product.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn set_stock(&self, id: i32, amount: i64) {
        self.state.stock.lock().unwrap().insert(id, amount);
    }

    /// Make every request answer 500 until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `/products/{id}` requests received.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// Number of `/stock/{id}` requests received.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.state.stock_requests.load(Ordering::SeqCst)
    }
}

impl Drop for FakeInventory {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn product(
    State(state): State<Arc<InventoryState>>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let products = state
        .products
        .lock()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    products.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn stock(
    State(state): State<Arc<InventoryState>>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    state.stock_requests.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let stock = state
        .stock
        .lock()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    stock
        .get(&id)
        .map(|amount| Json(json!({ "id": id, "amount": amount })))
        .ok_or(StatusCode::NOT_FOUND)
}

/// Notification channel that keeps every message.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// Messages received so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationChannel for RecordingNotifier {
    #[allow(clippy::unwrap_used)]
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Scratch directory under the system temp directory, removed on drop.
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Reserve a uniquely named directory. It is created on first write.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: std::env::temp_dir().join(format!("rocketshoes-it-{}", uuid::Uuid::new_v4())),
        }
    }

    /// Path of the store file inside the directory.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.root.join("storage.json")
    }

    /// A file store backed by [`Self::store_path`].
    #[must_use]
    pub fn store(&self) -> FileStore {
        FileStore::new(self.store_path())
    }
}

impl Default for ScratchDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_cart::PersistentStore;

    use super::*;

    #[tokio::test]
    async fn test_scratch_dir_is_removed_on_drop() {
        let scratch = ScratchDir::new();
        let path = scratch.store_path();
        scratch.store().set("key", "value".to_string()).await.unwrap();
        assert!(path.exists());

        drop(scratch);
        assert!(!path.exists());
        assert!(path.parent().is_some_and(|dir| !dir.exists()));
    }
}
