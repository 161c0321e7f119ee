//! The cart manager.
//!
//! Owns the in-memory cart and is the only writer of the persisted snapshot.
//! Each mutation runs to completion before the next can start (`&mut self`):
//! fetch from the inventory, compute a candidate cart, persist it, commit it.
//! A failure at any step notifies the user, leaves both the in-memory and the
//! persisted cart untouched, and is returned to the caller.

use rocketshoes_core::{Cart, ProductId, UpdateProductAmount};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{CartError, CartOperation};
use crate::inventory::InventoryService;
use crate::notify::NotificationChannel;
use crate::storage::{self, PersistentStore, StoreError};

/// Stock-checked cart with injected collaborators.
pub struct CartManager<I, S, N> {
    inventory: I,
    store: S,
    notifier: N,
    cart: Cart,
}

impl<I, S, N> CartManager<I, S, N>
where
    I: InventoryService,
    S: PersistentStore,
    N: NotificationChannel,
{
    /// Create a manager, restoring the cart saved in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    #[instrument(skip_all)]
    pub async fn load(inventory: I, store: S, notifier: N) -> Result<Self, StoreError> {
        let cart = storage::load_cart(&store).await?;
        info!(items = cart.len(), "Cart loaded");

        Ok(Self {
            inventory,
            store,
            notifier,
            cart,
        })
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Consume the manager, returning the current cart.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// - `RemoteFetchFailure` if the product or its stock cannot be fetched
    /// - `InsufficientStock` if the cart already holds all available units
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_add_product(product_id).await;
        self.finish(CartOperation::Add, result)
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` if the product is not in the cart
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_remove_product(product_id).await;
        self.finish(CartOperation::Remove, result)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Non-positive amounts are ignored: nothing is fetched, changed or
    /// reported.
    ///
    /// # Errors
    ///
    /// - `RemoteFetchFailure` if the stock cannot be fetched
    /// - `InsufficientStock` if `amount` exceeds the available stock
    /// - `ItemNotFound` if the product is not in the cart
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(
        skip(self, request),
        fields(product_id = %request.product_id, amount = request.amount)
    )]
    pub async fn update_product_amount(
        &mut self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        if request.amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(());
        }

        let result = self.try_update_product_amount(request).await;
        self.finish(CartOperation::Update, result)
    }

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let product = self.inventory.get_product(product_id).await?;
        let stock = self.inventory.get_stock(product_id).await?;

        let next = self.cart.with_added(&product, &stock)?;
        self.commit(next).await
    }

    async fn try_remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let next = self.cart.without(product_id)?;
        self.commit(next).await
    }

    async fn try_update_product_amount(
        &mut self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let stock = self.inventory.get_stock(request.product_id).await?;

        let next = self
            .cart
            .with_amount(request.product_id, request.amount, &stock)?;
        self.commit(next).await
    }

    /// Persist `next`, then make it the current cart.
    async fn commit(&mut self, next: Cart) -> Result<(), CartError> {
        storage::save_cart(&self.store, &next).await?;
        self.cart = next;
        Ok(())
    }

    /// Log the outcome and notify the user on failure.
    fn finish(
        &self,
        operation: CartOperation,
        result: Result<(), CartError>,
    ) -> Result<(), CartError> {
        match &result {
            Ok(()) => info!(%operation, items = self.cart.total_items(), "Cart updated"),
            Err(e) if e.is_rejection() => warn!(%operation, error = %e, "Cart operation rejected"),
            Err(e) => error!(%operation, error = %e, "Cart operation failed"),
        }

        if let Err(e) = &result {
            self.notifier.notify(e.user_message(operation));
        }

        result
    }
}
