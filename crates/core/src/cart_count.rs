//! Cart badge count, shared between views.
//!
//! Views that mutate the cart publish the new count; badges subscribe and
//! re-render when it changes.

use tokio::sync::watch;

use crate::cart::Cart;

/// Publish/subscribe store for the number of items in the cart.
#[derive(Debug, Clone)]
pub struct CartCountStore {
    sender: watch::Sender<u32>,
}

impl Default for CartCountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartCountStore {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);

        Self { sender }
    }

    /// Current count.
    #[must_use]
    pub fn get(&self) -> u32 {
        *self.sender.borrow()
    }

    /// Publish a new count. Subscribers are only woken when it changes.
    pub fn publish(&self, count: u32) {
        self.sender.send_if_modified(|current| {
            if *current == count {
                return false;
            }

            *current = count;

            true
        });
    }

    /// Publish the count of a fresh server snapshot.
    pub fn publish_cart(&self, cart: &Cart) {
        self.publish(cart.item_count());
    }

    /// The cart is gone server-side.
    pub fn reset(&self) {
        self.publish(0);
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn subscribers_see_published_counts() -> TestResult {
        let store = CartCountStore::new();
        let mut badge = store.subscribe();

        store.publish(3);
        badge.changed().await?;

        assert_eq!(*badge.borrow_and_update(), 3);

        store.reset();
        badge.changed().await?;

        assert_eq!(*badge.borrow(), 0);

        Ok(())
    }

    #[test]
    fn republishing_the_same_count_does_not_notify() {
        let store = CartCountStore::new();
        let badge = store.subscribe();

        store.publish(0);

        assert!(!badge.has_changed().unwrap_or(true));
        assert_eq!(store.get(), 0);
    }
}
