//! Data models for `DegreeAdmin`

pub mod notification;
pub mod user;

pub use notification::{Notification, NotificationKind, Snapshot};
pub use user::{Role, User};
