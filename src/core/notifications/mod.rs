//! Notification state: persistence, demo seeding and the observable store

mod ids;
pub mod repository;
pub mod seed;
pub mod store;

pub use repository::{notification_key, NotificationRepository, NOTIF_KEY_PREFIX};
pub use seed::{ensure_seed, seed_for};
pub use store::{ArrivalListener, Listener, NotificationStore, StoreOptions, Subscription};
