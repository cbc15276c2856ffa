//! Session identity record
//!
//! The signed-in user lives as JSON under [`USER_KEY`] in the session storage area.

use crate::core::models::User;
use crate::core::storage::{ListenerId, StorageError, StorageEvent, StorageHandle};

/// Storage key of the identity record
pub const USER_KEY: &str = "degreeadmin:user";

/// Reads and writes the identity record through one storage handle
#[derive(Debug, Clone)]
pub struct IdentityStore {
    storage: StorageHandle,
}

impl IdentityStore {
    /// Create an identity store over a session storage handle
    #[must_use]
    pub const fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    /// The signed-in user, or `None` when nobody is signed in or the record is unreadable
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        let raw = self.storage.get_item(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                crate::warn!("Ignoring malformed identity record: {e}");
                None
            }
        }
    }

    /// Store `user` as the signed-in identity
    ///
    /// # Errors
    /// Returns an error if the record cannot be encoded or written.
    pub fn sign_in(&self, user: &User) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set_item(USER_KEY, &raw)?;
        crate::info!("Signed in as {} ({})", user.username, user.role);
        Ok(())
    }

    /// Clear the identity record. Notification lists are left in place.
    ///
    /// # Errors
    /// Returns an error if the record cannot be removed.
    pub fn sign_out(&self) -> Result<(), StorageError> {
        self.storage.remove_item(USER_KEY)?;
        crate::info!("Signed out");
        Ok(())
    }

    /// Run `listener` whenever another handle changes the identity record
    pub fn on_identity_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&StorageEvent) + Send + Sync + 'static,
    {
        self.storage.on_change(move |event| {
            if event.key == USER_KEY {
                listener(event);
            }
        })
    }

    /// Detach a listener registered with [`on_identity_change`](Self::on_identity_change)
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.storage.remove_listener(id)
    }
}
