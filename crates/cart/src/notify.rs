//! User-facing notices.
//!
//! The manager reports every failed operation once through a
//! [`NotificationChannel`]. Delivery is fire-and-forget.

/// One-way sink for user-facing error text.
pub trait NotificationChannel: Send + Sync {
    /// Emit `message` to the user.
    fn notify(&self, message: &str);
}

/// Emits notices as `warn` events on the `rocketshoes::notice` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationChannel for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(target: "rocketshoes::notice", "{message}");
    }
}

impl<T: NotificationChannel + ?Sized> NotificationChannel for std::sync::Arc<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message);
    }
}
