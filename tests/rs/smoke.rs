//! Integration smoke tests for `degree_admin`

use degree_admin::core::gate::{resolve, RouteDecision};
use degree_admin::core::notifications::{NotificationStore, StoreOptions};
use degree_admin::core::storage::StorageArea;
use degree_admin::get_version;

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}

#[test]
fn fresh_store_is_empty_and_gated() {
    let store = NotificationStore::open_tab(
        &StorageArea::in_memory(),
        &StorageArea::in_memory(),
        StoreOptions::default(),
    );
    assert!(store.snapshot().is_empty());
    assert_eq!(store.snapshot().unread(), 0);
    assert!(matches!(
        resolve("/student", store.current_user().as_ref()),
        RouteDecision::Redirect { .. }
    ));
}
