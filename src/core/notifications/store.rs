//! Observable notification state shared by every consumer in one tab
//!
//! The store owns an immutable [`Snapshot`] behind an `Arc`. Every change builds a new
//! snapshot and swaps it in, so consumers can detect "nothing changed" with
//! [`Arc::ptr_eq`]. Listeners run synchronously after the swap, outside every internal
//! lock, and may call back into the store.

use super::ids::IdGenerator;
use super::repository::NotificationRepository;
use crate::config::{NotificationsConfig, DEFAULT_MAX_NOTIFICATIONS};
use crate::core::identity::IdentityStore;
use crate::core::models::{Notification, NotificationKind, Snapshot, User};
use crate::core::storage::{ListenerId, StorageArea};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Change listener; read the new state with [`NotificationStore::snapshot`]
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Listener for newly added notifications
pub type ArrivalListener = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Store tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Number of notifications kept after an add
    pub max_items: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_NOTIFICATIONS,
        }
    }
}

impl From<&NotificationsConfig> for StoreOptions {
    fn from(config: &NotificationsConfig) -> Self {
        Self {
            max_items: config.max_items,
        }
    }
}

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, T)>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> Registry<T> {
    fn insert(&mut self, value: T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, value));
        id
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    fn values(&self) -> Vec<T> {
        self.entries.iter().map(|(_, value)| value.clone()).collect()
    }
}

struct Inner {
    identity: IdentityStore,
    repository: NotificationRepository,
    options: StoreOptions,
    ids: IdGenerator,
    snapshot: Mutex<Arc<Snapshot>>,
    listeners: Mutex<Registry<Listener>>,
    arrivals: Mutex<Registry<ArrivalListener>>,
    identity_listener: Mutex<Option<ListenerId>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self
            .identity_listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = slot.take() {
            self.identity.remove_listener(id);
        }
    }
}

/// Single source of truth for the signed-in user's notifications
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

impl NotificationStore {
    /// Create a store and load the current user's notifications
    ///
    /// The store also refreshes itself whenever another tab changes the identity record.
    #[must_use]
    pub fn new(
        identity: IdentityStore,
        repository: NotificationRepository,
        options: StoreOptions,
    ) -> Self {
        let inner = Arc::new(Inner {
            identity,
            repository,
            options,
            ids: IdGenerator::new(),
            snapshot: Mutex::new(Arc::new(Snapshot::default())),
            listeners: Mutex::new(Registry::default()),
            arrivals: Mutex::new(Registry::default()),
            identity_listener: Mutex::new(None),
        });

        let weak = Arc::downgrade(&inner);
        let listener_id = inner.identity.on_identity_change(move |_| {
            if let Some(inner) = weak.upgrade() {
                crate::debug!("Identity changed in another tab; reloading notifications");
                Self { inner }.refresh();
            }
        });
        *inner
            .identity_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(listener_id);

        let store = Self { inner };
        store.refresh();
        store
    }

    /// Open a new tab on the given session and local areas and build a store for it
    #[must_use]
    pub fn open_tab(session: &StorageArea, local: &StorageArea, options: StoreOptions) -> Self {
        Self::new(
            IdentityStore::new(session.open_tab()),
            NotificationRepository::new(local.open_tab()),
            options,
        )
    }

    /// Identity store this store reads the current user from
    #[must_use]
    pub fn identity(&self) -> &IdentityStore {
        &self.inner.identity
    }

    /// Repository this store persists to
    #[must_use]
    pub fn repository(&self) -> &NotificationRepository {
        &self.inner.repository
    }

    /// Options the store was built with
    #[must_use]
    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    /// Current state; the same `Arc` is returned until the next change
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(
            &self
                .inner
                .snapshot
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Register a change listener. Registration itself never triggers a call.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Arc::new(listener));
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
            kind: SubscriptionKind::Change,
        }
    }

    /// Register a listener for notifications created by [`add_notification`]
    ///
    /// Arrival listeners run after the change listeners for the same add.
    ///
    /// [`add_notification`]: Self::add_notification
    pub fn on_new_notification<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let id = self
            .inner
            .arrivals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Arc::new(listener));
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
            kind: SubscriptionKind::Arrival,
        }
    }

    /// Reload the current user's notifications; empty when nobody is signed in
    pub fn refresh(&self) {
        let items = self
            .current_user()
            .map(|user| self.inner.repository.load(&user.username))
            .unwrap_or_default();
        self.publish(items);
    }

    /// Refresh only when the current snapshot is empty
    pub fn ensure_loaded(&self) {
        if self.snapshot().is_empty() {
            self.refresh();
        }
    }

    /// Mark every notification of the current user as read
    pub fn mark_all_read(&self) {
        self.update("mark all read", |items| {
            for item in items.iter_mut() {
                item.unread = false;
            }
        });
    }

    /// Mark one notification as read; an unknown id changes nothing but still publishes
    pub fn mark_read(&self, id: i64) {
        self.update("mark read", |items| {
            for item in items.iter_mut().filter(|n| n.id == id) {
                item.unread = false;
            }
        });
    }

    /// Replace the current user's list with an authoritative one
    pub fn set_items_from_server(&self, items: Vec<Notification>) {
        self.update("server sync", move |current| *current = items);
    }

    /// Create a notification for the current user
    ///
    /// The new item goes first and the list is cut to the configured cap. Change
    /// listeners fire first, then arrival listeners receive the new item. Returns `None`
    /// when nobody is signed in.
    pub fn add_notification(
        &self,
        title: &str,
        message: &str,
        kind: NotificationKind,
        category: Option<&str>,
    ) -> Option<Notification> {
        let Some(user) = self.current_user() else {
            crate::debug!("Dropping notification '{title}': nobody is signed in");
            return None;
        };

        let mut items = self.inner.repository.load(&user.username);
        let mut notification = Notification::new(
            self.inner.ids.next_id(&items),
            kind,
            title,
            message,
            chrono::Utc::now().to_rfc3339(),
        );
        notification.category = category.map(str::to_string);

        items.insert(0, notification.clone());
        items.truncate(self.inner.options.max_items.max(1));

        self.persist(&user, &items);
        self.publish(items);

        let arrivals = self
            .inner
            .arrivals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values();
        for listener in arrivals {
            listener(&notification);
        }
        Some(notification)
    }

    /// User the store currently acts for
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.identity.current_user()
    }

    fn update<F>(&self, action: &str, apply: F)
    where
        F: FnOnce(&mut Vec<Notification>),
    {
        let Some(user) = self.current_user() else {
            crate::debug!("Ignoring {action}: nobody is signed in");
            return;
        };
        let mut items = self.inner.repository.load(&user.username);
        apply(&mut items);
        self.persist(&user, &items);
        self.publish(items);
    }

    fn persist(&self, user: &User, items: &[Notification]) {
        if let Err(e) = self.inner.repository.save(&user.username, items) {
            crate::error!("Failed to save notifications for {}: {e}", user.username);
        }
    }

    fn publish(&self, items: Vec<Notification>) {
        let next = Arc::new(Snapshot::from_items(items));
        *self
            .inner
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = next;

        let listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values();
        for listener in listeners {
            listener();
        }
    }
}

impl fmt::Debug for NotificationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("NotificationStore")
            .field("items", &snapshot.items().len())
            .field("unread", &snapshot.unread())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubscriptionKind {
    Change,
    Arrival,
}

/// Handle returned by [`NotificationStore::subscribe`] and
/// [`NotificationStore::on_new_notification`]
///
/// Dropping the handle leaves the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    store: Weak<Inner>,
    id: u64,
    kind: SubscriptionKind,
}

impl Subscription {
    /// Remove the listener. Safe to call repeatedly; returns `true` only the first time.
    pub fn unsubscribe(&self) -> bool {
        let Some(inner) = self.store.upgrade() else {
            return false;
        };
        match self.kind {
            SubscriptionKind::Change => inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id),
            SubscriptionKind::Arrival => inner
                .arrivals
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id),
        }
    }
}
