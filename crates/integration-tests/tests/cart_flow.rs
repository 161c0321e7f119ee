//! Cart operations against the HTTP inventory with a file-backed store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use rocketshoes_cart::error::{
    ADD_FAILED_MESSAGE, OUT_OF_STOCK_MESSAGE, REMOVE_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE,
};
use rocketshoes_cart::{
    CartError, CartManager, FileStore, HttpInventory, InventoryError, PersistentStore,
    CART_STORAGE_KEY,
};
use rocketshoes_core::{ProductId, UpdateProductAmount};
use rocketshoes_integration_tests::{FakeInventory, RecordingNotifier, ScratchDir};
use rust_decimal::Decimal;

const CACHE_TTL: Duration = Duration::from_secs(300);

type Manager = CartManager<HttpInventory, FileStore, RecordingNotifier>;

async fn shop() -> FakeInventory {
    let server = FakeInventory::start().await;
    server.insert_product(1, "Tênis de Caminhada Leve Confortável", 179.9, 3);
    server.insert_product(2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9, 5);
    server.insert_product(3, "Tênis Adidas Duramo Lite 2.0", 219.9, 2);
    server
}

async fn open(server: &FakeInventory, store: FileStore, notifier: RecordingNotifier) -> Manager {
    let inventory = HttpInventory::new(&server.config(CACHE_TTL)).unwrap();
    CartManager::load(inventory, store, notifier).await.unwrap()
}

fn update(id: i32, amount: i64) -> UpdateProductAmount {
    UpdateProductAmount {
        product_id: ProductId::new(id),
        amount,
    }
}

#[tokio::test]
async fn test_shopping_session_round_trip() {
    let server = shop().await;
    let scratch = ScratchDir::new();
    let path = scratch.store_path();
    let notifier = RecordingNotifier::default();
    let mut manager = open(&server, FileStore::new(&path), notifier.clone()).await;

    manager.add_product(ProductId::new(1)).await.unwrap();
    manager.add_product(ProductId::new(1)).await.unwrap();
    manager.add_product(ProductId::new(2)).await.unwrap();
    manager.update_product_amount(update(2, 4)).await.unwrap();
    manager.remove_product(ProductId::new(1)).await.unwrap();

    let cart = manager.cart().clone();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.amount_of(ProductId::new(2)), 4);
    assert!(notifier.messages().is_empty());

    // A new session over the same file sees the same cart
    let reopened = open(&server, FileStore::new(&path), RecordingNotifier::default()).await;
    assert_eq!(reopened.cart(), &cart);
}

#[tokio::test]
async fn test_added_product_carries_inventory_details() {
    let scratch = ScratchDir::new();
    let server = shop().await;
    let mut manager = open(&server, scratch.store(), RecordingNotifier::default()).await;

    manager.add_product(ProductId::new(1)).await.unwrap();

    let line = manager.cart().find(ProductId::new(1)).unwrap();
    assert_eq!(line.title, "Tênis de Caminhada Leve Confortável");
    assert_eq!(line.price, Decimal::new(1799, 1));
    assert!(line.image.ends_with("tenis1.jpg"));
    assert_eq!(line.amount, 1);
}

#[tokio::test]
async fn test_snapshot_is_stored_under_cart_key() {
    let server = shop().await;
    let scratch = ScratchDir::new();
    let path = scratch.store_path();
    let mut manager = open(&server, FileStore::new(&path), RecordingNotifier::default()).await;

    manager.add_product(ProductId::new(3)).await.unwrap();

    let raw = FileStore::new(&path)
        .get(CART_STORAGE_KEY)
        .await
        .unwrap()
        .unwrap();
    let items: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(items[0]["id"], 3);
    assert_eq!(items[0]["amount"], 1);
    assert_eq!(items[0]["title"], "Tênis Adidas Duramo Lite 2.0");
}

#[tokio::test]
async fn test_add_beyond_stock_is_rejected() {
    let server = shop().await;
    let scratch = ScratchDir::new();
    let path = scratch.store_path();
    let notifier = RecordingNotifier::default();
    let mut manager = open(&server, FileStore::new(&path), notifier.clone()).await;

    manager.add_product(ProductId::new(3)).await.unwrap();
    manager.add_product(ProductId::new(3)).await.unwrap();
    let result = manager.add_product(ProductId::new(3)).await;

    assert!(matches!(
        result,
        Err(CartError::InsufficientStock {
            requested: 3,
            available: 2,
            ..
        })
    ));
    assert_eq!(manager.cart().amount_of(ProductId::new(3)), 2);
    assert_eq!(notifier.messages(), vec![OUT_OF_STOCK_MESSAGE]);

    let reopened = open(&server, FileStore::new(&path), RecordingNotifier::default()).await;
    assert_eq!(reopened.cart().amount_of(ProductId::new(3)), 2);
}

#[tokio::test]
async fn test_update_checks_current_stock() {
    let scratch = ScratchDir::new();
    let server = shop().await;
    let notifier = RecordingNotifier::default();
    let mut manager = open(&server, scratch.store(), notifier.clone()).await;

    manager.add_product(ProductId::new(2)).await.unwrap();

    let result = manager.update_product_amount(update(2, 6)).await;
    assert!(matches!(result, Err(CartError::InsufficientStock { .. })));
    assert_eq!(manager.cart().amount_of(ProductId::new(2)), 1);

    server.set_stock(2, 6);
    manager.update_product_amount(update(2, 6)).await.unwrap();
    assert_eq!(manager.cart().amount_of(ProductId::new(2)), 6);

    assert_eq!(notifier.messages(), vec![OUT_OF_STOCK_MESSAGE]);
}

#[tokio::test]
async fn test_product_details_are_cached_but_stock_is_not() {
    let scratch = ScratchDir::new();
    let server = shop().await;
    let mut manager = open(&server, scratch.store(), RecordingNotifier::default()).await;

    manager.add_product(ProductId::new(2)).await.unwrap();
    manager.add_product(ProductId::new(2)).await.unwrap();
    manager.add_product(ProductId::new(2)).await.unwrap();

    assert_eq!(server.product_requests(), 1);
    assert_eq!(server.stock_requests(), 3);
}

#[tokio::test]
async fn test_zero_ttl_fetches_product_every_time() {
    let scratch = ScratchDir::new();
    let server = shop().await;
    let inventory = HttpInventory::new(&server.config(Duration::ZERO)).unwrap();
    let mut manager = CartManager::load(
        inventory,
        scratch.store(),
        RecordingNotifier::default(),
    )
    .await
    .unwrap();

    manager.add_product(ProductId::new(1)).await.unwrap();
    manager.add_product(ProductId::new(1)).await.unwrap();

    assert_eq!(server.product_requests(), 2);
}

#[tokio::test]
async fn test_unknown_product_fails_to_add() {
    let server = shop().await;
    let scratch = ScratchDir::new();
    let path = scratch.store_path();
    let notifier = RecordingNotifier::default();
    let mut manager = open(&server, FileStore::new(&path), notifier.clone()).await;

    let result = manager.add_product(ProductId::new(99)).await;

    assert!(matches!(
        result,
        Err(CartError::RemoteFetchFailure(InventoryError::NotFound(id))) if id == ProductId::new(99)
    ));
    assert!(manager.cart().is_empty());
    assert_eq!(notifier.messages(), vec![ADD_FAILED_MESSAGE]);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_inventory_outage_leaves_cart_unchanged() {
    let scratch = ScratchDir::new();
    let server = shop().await;
    let notifier = RecordingNotifier::default();
    let mut manager = open(&server, scratch.store(), notifier.clone()).await;

    manager.add_product(ProductId::new(1)).await.unwrap();
    let before = manager.cart().clone();

    server.set_failing(true);
    let add = manager.add_product(ProductId::new(2)).await;
    let change = manager.update_product_amount(update(1, 2)).await;

    assert!(matches!(
        add,
        Err(CartError::RemoteFetchFailure(InventoryError::Api { status: 500, .. }))
    ));
    assert!(matches!(
        change,
        Err(CartError::RemoteFetchFailure(InventoryError::Api { status: 500, .. }))
    ));
    assert_eq!(manager.cart(), &before);
    assert_eq!(
        notifier.messages(),
        vec![ADD_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE]
    );
}

#[tokio::test]
async fn test_remove_needs_no_inventory() {
    let scratch = ScratchDir::new();
    let server = shop().await;
    let notifier = RecordingNotifier::default();
    let mut manager = open(&server, scratch.store(), notifier.clone()).await;

    manager.add_product(ProductId::new(1)).await.unwrap();
    server.set_failing(true);

    manager.remove_product(ProductId::new(1)).await.unwrap();
    assert!(manager.cart().is_empty());

    let missing = manager.remove_product(ProductId::new(1)).await;
    assert!(matches!(missing, Err(CartError::ItemNotFound(_))));
    assert_eq!(notifier.messages(), vec![REMOVE_FAILED_MESSAGE]);
}

#[tokio::test]
async fn test_non_positive_update_is_ignored() {
    let scratch = ScratchDir::new();
    let server = shop().await;
    let notifier = RecordingNotifier::default();
    let mut manager = open(&server, scratch.store(), notifier.clone()).await;

    manager.add_product(ProductId::new(1)).await.unwrap();
    let stock_requests = server.stock_requests();

    manager.update_product_amount(update(1, 0)).await.unwrap();
    manager.update_product_amount(update(1, -3)).await.unwrap();

    assert_eq!(manager.cart().amount_of(ProductId::new(1)), 1);
    assert_eq!(server.stock_requests(), stock_requests);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let server = shop().await;
    let scratch = ScratchDir::new();
    let path = scratch.store_path();
    let store = FileStore::new(&path);
    store
        .set(CART_STORAGE_KEY, "not a cart".to_string())
        .await
        .unwrap();

    let mut manager = open(&server, store, RecordingNotifier::default()).await;
    assert!(manager.cart().is_empty());

    manager.add_product(ProductId::new(1)).await.unwrap();
    let reopened = open(&server, FileStore::new(&path), RecordingNotifier::default()).await;
    assert_eq!(reopened.cart().amount_of(ProductId::new(1)), 1);
}
