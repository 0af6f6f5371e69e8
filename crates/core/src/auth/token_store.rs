//! Auth token store with change notifications
//!
//! Holds the bearer token for one running client:
//! - Set/get/clear of the current token
//! - Listener registration with explicit, idempotent unsubscription
//! - Synchronous notification, in registration order, on every write
//!
//! Writes notify unconditionally: setting the same value twice (e.g. two
//! logouts in a row) delivers two notifications.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

/// Callback invoked with the new token value after every write
pub type TokenListener = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Token-centric authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

struct StoreInner {
    token: RwLock<Option<String>>,
    listeners: Mutex<Vec<(u64, TokenListener)>>,
    next_listener_id: AtomicU64,
}

/// In-memory bearer token store
///
/// Cloning yields another handle to the same token and listener list, so one
/// store is created at startup and handed to the request executor, the
/// façade and any UI bootstrap code.
///
/// 1. `set` replaces the value, then notifies every listener
/// 2. Listeners run after all locks are released, over a snapshot of the
///    list, so they may read, write, subscribe or unsubscribe freely
/// 3. A panicking listener is logged and skipped; the remaining listeners
///    still run and the stored value is unaffected
#[derive(Clone)]
pub struct AuthTokenStore {
    inner: Arc<StoreInner>,
}

impl Default for AuthTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AuthTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokenStore")
            .field("state", &self.state())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl AuthTokenStore {
    /// Create an empty store (unauthenticated, no listeners)
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                token: RwLock::new(None),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Replace the current token and notify every listener
    pub fn set(&self, token: Option<String>) {
        *self.inner.token.write() = token.clone();
        debug!(authenticated = token.is_some(), "auth token updated");
        self.notify(token.as_deref());
    }

    /// Current token, if any
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    /// Equivalent to `set(None)`
    pub fn clear(&self) {
        self.set(None);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.token.read().is_some()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Register a listener; it receives every write made after this call
    /// until [`TokenSubscription::unsubscribe`] is invoked.
    ///
    /// Dropping the returned handle does not remove the listener.
    pub fn subscribe<F>(&self, listener: F) -> TokenSubscription
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        TokenSubscription { id, store: Arc::downgrade(&self.inner) }
    }

    /// Number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    fn notify(&self, token: Option<&str>) {
        let snapshot: Vec<(u64, TokenListener)> = self.inner.listeners.lock().clone();

        for (id, listener) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(token))).is_err() {
                error!(listener_id = id, "auth token listener panicked; continuing");
            }
        }
    }
}

/// Handle returned by [`AuthTokenStore::subscribe`]
#[must_use = "keep the subscription to be able to unsubscribe"]
#[derive(Debug, Clone)]
pub struct TokenSubscription {
    id: u64,
    store: Weak<StoreInner>,
}

impl TokenSubscription {
    /// Remove exactly this listener. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.store
            .upgrade()
            .is_some_and(|inner| inner.listeners.lock().iter().any(|(id, _)| *id == self.id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn recorder(store: &AuthTokenStore) -> (TokenSubscription, Arc<Mutex<Vec<Option<String>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = store.subscribe(move |token| sink.lock().push(token.map(str::to_string)));
        (sub, seen)
    }

    #[test]
    fn test_set_then_get() {
        let store = AuthTokenStore::new();
        assert_eq!(store.get(), None);
        assert_eq!(store.state(), AuthState::Unauthenticated);

        store.set(Some("test-token".to_string()));
        assert_eq!(store.get().as_deref(), Some("test-token"));
        assert_eq!(store.state(), AuthState::Authenticated);

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = AuthTokenStore::new();
        let handle = store.clone();
        handle.set(Some("shared".to_string()));
        assert_eq!(store.get().as_deref(), Some("shared"));
    }

    #[test]
    fn test_listener_sees_set_and_clear() {
        let store = AuthTokenStore::new();
        let (_sub, seen) = recorder(&store);

        store.set(Some("test-token".to_string()));
        store.clear();

        assert_eq!(*seen.lock(), vec![Some("test-token".to_string()), None]);
    }

    #[test]
    fn test_listener_window_is_exact() {
        let store = AuthTokenStore::new();
        store.set(Some("before".to_string()));

        let (sub, seen) = recorder(&store);
        store.set(Some("during".to_string()));
        sub.unsubscribe();
        store.set(Some("after".to_string()));

        assert_eq!(*seen.lock(), vec![Some("during".to_string())]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent_and_targeted() {
        let store = AuthTokenStore::new();
        let (first, first_seen) = recorder(&store);
        let (_second, second_seen) = recorder(&store);

        first.unsubscribe();
        first.unsubscribe();
        assert!(!first.is_active());
        assert_eq!(store.listener_count(), 1);

        store.set(Some("t".to_string()));
        assert!(first_seen.lock().is_empty());
        assert_eq!(second_seen.lock().len(), 1);
    }

    #[test]
    fn test_dropping_handle_keeps_listener() {
        let store = AuthTokenStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        drop(store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notifications_follow_registration_order() {
        let store = AuthTokenStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut subs = Vec::new();
        for index in 0..3 {
            let order = Arc::clone(&order);
            subs.push(store.subscribe(move |_| order.lock().push(index)));
        }

        store.set(Some("t".to_string()));
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_listener_reads_new_value() {
        let store = AuthTokenStore::new();
        let observed = Arc::new(Mutex::new(None));
        let reader = store.clone();
        let slot = Arc::clone(&observed);
        let _sub = store.subscribe(move |_| *slot.lock() = reader.get());

        store.set(Some("fresh".to_string()));
        assert_eq!(observed.lock().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_panicking_listener_does_not_stop_others() {
        let store = AuthTokenStore::new();
        let _bad = store.subscribe(|_| panic!("listener failure"));
        let (_good, seen) = recorder(&store);

        store.set(Some("t".to_string()));

        assert_eq!(*seen.lock(), vec![Some("t".to_string())]);
        assert_eq!(store.get().as_deref(), Some("t"));
        assert_eq!(store.listener_count(), 2);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let store = AuthTokenStore::new();
        let slot: Arc<Mutex<Option<TokenSubscription>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let own = Arc::clone(&slot);
        let counter = Arc::clone(&calls);
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = own.lock().as_ref() {
                sub.unsubscribe();
            }
        });
        *slot.lock() = Some(sub);
        let (_other, seen) = recorder(&store);

        store.set(Some("one".to_string()));
        store.set(Some("two".to_string()));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_redundant_clear_still_notifies() {
        let store = AuthTokenStore::new();
        let (_sub, seen) = recorder(&store);

        store.clear();
        store.clear();

        assert_eq!(*seen.lock(), vec![None, None]);
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_unsubscribe_after_store_dropped() {
        let store = AuthTokenStore::new();
        let (sub, _seen) = recorder(&store);
        drop(store);
        sub.unsubscribe();
        assert!(!sub.is_active());
    }
}
