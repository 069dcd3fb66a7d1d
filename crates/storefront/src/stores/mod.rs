//! Observable, persisted client-side state.
//!
//! Both the cart and the wishlist are an ordered list held in a
//! `tokio::sync::watch` channel: one current value, any number of receivers.
//! A mutation updates the value in place, is visible to `borrow()` as soon as
//! the call returns, and is then written to storage as a full snapshot.
//!
//! Subscribing is [`watch::Sender::subscribe`]; unsubscribing is dropping the
//! receiver. Dropping the store closes the channel, which receivers observe as
//! an error from `changed()`.

mod cart;
mod wishlist;

pub use cart::{CART_STORAGE_KEY, CartStore};
pub use wishlist::{WISHLIST_STORAGE_KEY, WishlistStore};

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, RestoreState, load_list, save_list};

/// A watch-backed list that snapshots itself to storage after every change.
pub(crate) struct PersistedList<T> {
    key: &'static str,
    storage: Arc<dyn KeyValueStore>,
    tx: watch::Sender<Vec<T>>,
    restore_state: RestoreState,
}

impl<T> PersistedList<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Restore the list under `key`, passing restored items through `sanitize`.
    pub(crate) fn restore(
        key: &'static str,
        storage: Arc<dyn KeyValueStore>,
        sanitize: impl FnOnce(Vec<T>) -> Vec<T>,
    ) -> Self {
        let (items, restore_state) = load_list::<T>(storage.as_ref(), key);
        let items = sanitize(items);
        debug!(key, restored = items.len(), state = ?restore_state, "Store restored");

        let (tx, _rx) = watch::channel(items);
        Self {
            key,
            storage,
            tx,
            restore_state,
        }
    }

    pub(crate) const fn restore_state(&self) -> &RestoreState {
        &self.restore_state
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.tx.subscribe()
    }

    /// Run `f` against the current items without cloning them.
    ///
    /// `f` must not mutate this list.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.tx.borrow().clone()
    }

    /// Mutate, emit and persist unconditionally.
    pub(crate) fn update(&self, f: impl FnOnce(&mut Vec<T>)) {
        self.update_if(|items| {
            f(items);
            true
        });
    }

    /// Mutate, then emit and persist only if `f` reports a change.
    pub(crate) fn update_if(&self, f: impl FnOnce(&mut Vec<T>) -> bool) -> bool {
        let changed = self.tx.send_if_modified(f);
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        let items = self.tx.borrow();
        debug!(key = self.key, len = items.len(), "Store updated");
        if let Err(e) = save_list(self.storage.as_ref(), self.key, &items) {
            warn!(key = self.key, error = %e, "Failed to persist store snapshot");
        }
    }
}
