//! Per-user notification persistence
//!
//! Each user's list is a JSON array stored under `degreeadmin:notifs:<username>` in the
//! local storage area. Lists are never shared or merged between usernames.

use crate::core::models::Notification;
use crate::core::storage::{StorageError, StorageHandle};

/// Key prefix of every notification list
pub const NOTIF_KEY_PREFIX: &str = "degreeadmin:notifs:";

/// Storage key for `username`'s list
#[must_use]
pub fn notification_key(username: &str) -> String {
    format!("{NOTIF_KEY_PREFIX}{username}")
}

/// Reads and writes notification lists through one storage handle
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    storage: StorageHandle,
}

impl NotificationRepository {
    /// Create a repository over a local storage handle
    #[must_use]
    pub const fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    /// Whether `username` has a stored list (possibly empty)
    #[must_use]
    pub fn exists(&self, username: &str) -> bool {
        self.storage.get_item(&notification_key(username)).is_some()
    }

    /// Load `username`'s list; missing or malformed data loads as empty
    #[must_use]
    pub fn load(&self, username: &str) -> Vec<Notification> {
        let Some(raw) = self.storage.get_item(&notification_key(username)) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            crate::warn!("Ignoring malformed notifications for {username}: {e}");
            Vec::new()
        })
    }

    /// Replace `username`'s list
    ///
    /// # Errors
    /// Returns an error if the list cannot be encoded or written.
    pub fn save(&self, username: &str, items: &[Notification]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.storage.set_item(&notification_key(username), &raw)
    }

    /// Delete `username`'s list
    ///
    /// # Errors
    /// Returns an error if the key cannot be removed.
    pub fn clear(&self, username: &str) -> Result<(), StorageError> {
        self.storage.remove_item(&notification_key(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::NotificationKind;
    use crate::core::storage::StorageArea;

    fn sample(id: i64) -> Notification {
        Notification::new(id, NotificationKind::Info, format!("n{id}"), "", "now")
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(notification_key("evantimm"), "degreeadmin:notifs:evantimm");
    }

    #[test]
    fn test_lists_are_per_user() {
        let repo = NotificationRepository::new(StorageArea::in_memory().open_tab());
        repo.save("evantimm", &[sample(1)]).unwrap();
        repo.save("aidencox", &[sample(2), sample(3)]).unwrap();

        assert_eq!(repo.load("evantimm").len(), 1);
        assert_eq!(repo.load("aidencox").len(), 2);
        assert!(repo.load("nobodyyy").is_empty());
        assert!(!repo.exists("nobodyyy"));
    }

    #[test]
    fn test_malformed_list_loads_empty() {
        let tab = StorageArea::in_memory().open_tab();
        tab.set_item(&notification_key("evantimm"), "[{broken").unwrap();
        let repo = NotificationRepository::new(tab);
        assert!(repo.load("evantimm").is_empty());
    }

    #[test]
    fn test_clear() {
        let repo = NotificationRepository::new(StorageArea::in_memory().open_tab());
        repo.save("evantimm", &[sample(1)]).unwrap();
        repo.clear("evantimm").unwrap();
        assert!(!repo.exists("evantimm"));
    }
}
