//! Shared storage area with change broadcast between handles

use super::{MemoryStorage, Storage, StorageError, StorageEvent};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Callback receiving changes made through other handles
pub type ChangeListener = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

/// Registration returned by [`StorageHandle::on_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    tab: u64,
    callback: ChangeListener,
}

struct AreaInner {
    backend: Box<dyn Storage>,
    listeners: Mutex<Vec<Registration>>,
    next_tab: AtomicU64,
    next_listener: AtomicU64,
}

/// Origin-wide storage shared by every handle opened from it
#[derive(Clone)]
pub struct StorageArea {
    inner: Arc<AreaInner>,
}

impl StorageArea {
    /// Wrap a backend
    #[must_use]
    pub fn new(backend: impl Storage + 'static) -> Self {
        Self {
            inner: Arc::new(AreaInner {
                backend: Box::new(backend),
                listeners: Mutex::new(Vec::new()),
                next_tab: AtomicU64::new(1),
                next_listener: AtomicU64::new(1),
            }),
        }
    }

    /// Area backed by [`MemoryStorage`]
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Open a handle with its own broadcast identity
    #[must_use]
    pub fn open_tab(&self) -> StorageHandle {
        StorageHandle {
            area: Arc::clone(&self.inner),
            tab: self.inner.next_tab.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageArea")
            .field("keys", &self.inner.backend.keys())
            .finish()
    }
}

/// One consumer's view of a [`StorageArea`]
///
/// Writes are visible to every handle immediately; change events go only to listeners
/// registered through *other* handles, the same way a browser tab never receives its
/// own `storage` events.
#[derive(Clone)]
pub struct StorageHandle {
    area: Arc<AreaInner>,
    tab: u64,
}

impl StorageHandle {
    /// Read a value
    #[must_use]
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.area.backend.get_item(key)
    }

    /// Write a value and broadcast the change if the value differs
    ///
    /// # Errors
    /// Returns an error if the backend cannot persist the value.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let old_value = self.area.backend.get_item(key);
        self.area.backend.set_item(key, value)?;
        if old_value.as_deref() != Some(value) {
            self.broadcast(&StorageEvent {
                key: key.to_string(),
                old_value,
                new_value: Some(value.to_string()),
            });
        }
        Ok(())
    }

    /// Remove a value and broadcast the change if it existed
    ///
    /// # Errors
    /// Returns an error if the backend cannot persist the removal.
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let old_value = self.area.backend.get_item(key);
        self.area.backend.remove_item(key)?;
        if old_value.is_some() {
            self.broadcast(&StorageEvent {
                key: key.to_string(),
                old_value,
                new_value: None,
            });
        }
        Ok(())
    }

    /// All keys in the area
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.area.backend.keys()
    }

    /// Register a listener for changes made through other handles
    pub fn on_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&StorageEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.area.next_listener.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.area.listeners.lock() {
            listeners.push(Registration {
                id,
                tab: self.tab,
                callback: Arc::new(listener),
            });
        }
        id
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let Ok(mut listeners) = self.area.listeners.lock() else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|r| r.id != id);
        listeners.len() != before
    }

    fn broadcast(&self, event: &StorageEvent) {
        // Collect first so callbacks run without the lock and may touch storage again
        let targets: Vec<ChangeListener> = match self.area.listeners.lock() {
            Ok(listeners) => listeners
                .iter()
                .filter(|r| r.tab != self.tab)
                .map(|r| Arc::clone(&r.callback))
                .collect(),
            Err(_) => return,
        };
        crate::debug!(
            "storage change on '{}' delivered to {} listener(s)",
            event.key,
            targets.len()
        );
        for callback in targets {
            callback(event);
        }
    }
}

impl fmt::Debug for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageHandle").field("tab", &self.tab).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<StorageEvent>>>, impl Fn(&StorageEvent) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |e: &StorageEvent| sink.lock().unwrap().push(e.clone()))
    }

    #[test]
    fn test_writes_are_shared() {
        let area = StorageArea::in_memory();
        let a = area.open_tab();
        let b = area.open_tab();

        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_events_skip_the_writing_tab() {
        let area = StorageArea::in_memory();
        let a = area.open_tab();
        let b = area.open_tab();

        let (seen_a, listener_a) = recorder();
        let (seen_b, listener_b) = recorder();
        a.on_change(listener_a);
        b.on_change(listener_b);

        a.set_item("k", "v").unwrap();

        assert!(seen_a.lock().unwrap().is_empty());
        let seen_b = seen_b.lock().unwrap();
        assert_eq!(seen_b.len(), 1);
        assert_eq!(seen_b[0].key, "k");
        assert_eq!(seen_b[0].old_value, None);
        assert_eq!(seen_b[0].new_value.as_deref(), Some("v"));
    }

    #[test]
    fn test_unchanged_value_is_not_broadcast() {
        let area = StorageArea::in_memory();
        let a = area.open_tab();
        let b = area.open_tab();

        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        b.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        a.set_item("k", "v").unwrap();
        a.set_item("k", "v").unwrap();
        a.remove_item("missing").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        a.remove_item("k").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_remove_listener_is_idempotent() {
        let area = StorageArea::in_memory();
        let a = area.open_tab();
        let b = area.open_tab();

        let (seen, listener) = recorder();
        let id = b.on_change(listener);
        assert!(b.remove_listener(id));
        assert!(!b.remove_listener(id));

        a.set_item("k", "v").unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }
}
