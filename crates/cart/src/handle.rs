//! Serial queue in front of a [`CartManager`].
//!
//! The manager runs on its own task and executes commands one at a time in
//! arrival order. Any number of [`CartHandle`] clones can issue operations
//! concurrently; each operation sees the cart left by the previous one, so
//! concurrent updates are never lost.

use rocketshoes_core::{Cart, ProductId, UpdateProductAmount};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::error::CartError;
use crate::inventory::InventoryService;
use crate::manager::CartManager;
use crate::notify::NotificationChannel;
use crate::storage::PersistentStore;

/// Commands waiting for the cart task.
const COMMAND_BUFFER: usize = 64;

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Add {
        product_id: ProductId,
        reply: Reply<Result<(), CartError>>,
    },
    Remove {
        product_id: ProductId,
        reply: Reply<Result<(), CartError>>,
    },
    Update {
        request: UpdateProductAmount,
        reply: Reply<Result<(), CartError>>,
    },
    Snapshot {
        reply: Reply<Cart>,
    },
}

/// Cloneable handle to a cart running on its own task.
#[derive(Clone)]
pub struct CartHandle {
    sender: mpsc::Sender<Command>,
}

impl CartHandle {
    /// Move `manager` onto a new task and return a handle to it.
    ///
    /// The task stops once every handle has been dropped and the queued
    /// commands are drained; the returned `JoinHandle` then yields the final
    /// cart.
    #[must_use]
    pub fn spawn<I, S, N>(manager: CartManager<I, S, N>) -> (Self, JoinHandle<Cart>)
    where
        I: InventoryService + 'static,
        S: PersistentStore + 'static,
        N: NotificationChannel + 'static,
    {
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(run(manager, receiver));
        (Self { sender }, task)
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns the manager's error, or `Closed` if the cart task has stopped.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        self.request(|reply| Command::Add { product_id, reply }).await?
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// Returns the manager's error, or `Closed` if the cart task has stopped.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        self.request(|reply| Command::Remove { product_id, reply }).await?
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns the manager's error, or `Closed` if the cart task has stopped.
    #[instrument(skip(self))]
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        self.request(|reply| Command::Update { request, reply }).await?
    }

    /// A copy of the cart after every previously issued operation.
    ///
    /// # Errors
    ///
    /// Returns `Closed` if the cart task has stopped.
    pub async fn cart(&self) -> Result<Cart, CartError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, CartError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(command(reply))
            .await
            .map_err(|_| CartError::Closed)?;
        response.await.map_err(|_| CartError::Closed)
    }
}

async fn run<I, S, N>(
    mut manager: CartManager<I, S, N>,
    mut receiver: mpsc::Receiver<Command>,
) -> Cart
where
    I: InventoryService,
    S: PersistentStore,
    N: NotificationChannel,
{
    while let Some(command) = receiver.recv().await {
        // A dropped reply receiver means the caller stopped waiting; the
        // operation has still been applied.
        match command {
            Command::Add { product_id, reply } => {
                let _ = reply.send(manager.add_product(product_id).await);
            }
            Command::Remove { product_id, reply } => {
                let _ = reply.send(manager.remove_product(product_id).await);
            }
            Command::Update { request, reply } => {
                let _ = reply.send(manager.update_product_amount(request).await);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(manager.cart().clone());
            }
        }
    }

    debug!("All cart handles dropped, stopping cart task");
    manager.into_cart()
}
