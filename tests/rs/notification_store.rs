//! Integration tests for the notification store and cross-tab identity sync.

use degree_admin::core::auth::{login, logout, Credentials, PrefixAuthenticator};
use degree_admin::core::identity::USER_KEY;
use degree_admin::core::models::{Notification, NotificationKind, Role, Snapshot, User};
use degree_admin::core::notifications::{notification_key, NotificationStore, StoreOptions};
use degree_admin::core::storage::{FileStorage, StorageArea};
use degree_admin::config::NotificationsConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn areas() -> (StorageArea, StorageArea) {
    (StorageArea::in_memory(), StorageArea::in_memory())
}

fn sign_in(store: &NotificationStore, username: &str, role: Role) {
    store
        .identity()
        .sign_in(&User::new(username, role))
        .expect("sign in");
    store.refresh();
}

fn sample(id: i64, unread: bool) -> Notification {
    let n = Notification::new(id, NotificationKind::Info, format!("n{id}"), "", "now");
    if unread {
        n
    } else {
        n.read()
    }
}

fn assert_unread_invariant(snapshot: &Snapshot) {
    let counted = snapshot.items().iter().filter(|n| n.unread).count();
    assert_eq!(snapshot.unread(), counted);
}

fn change_counter(store: &NotificationStore) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    store.subscribe(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    calls
}

#[test]
fn refresh_without_user_is_empty() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    store.refresh();
    assert!(store.snapshot().is_empty());
    assert_eq!(store.snapshot().unread(), 0);
}

#[test]
fn mark_all_read_clears_unread() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    sign_in(&store, "evantimm", Role::Student);
    store.set_items_from_server(vec![sample(1, true), sample(2, true), sample(3, false)]);
    assert_eq!(store.snapshot().unread(), 2);

    store.mark_all_read();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.unread(), 0);
    assert_eq!(snapshot.items().len(), 3);
    assert_unread_invariant(&snapshot);
    assert!(store.repository().load("evantimm").iter().all(|n| !n.unread));
}

#[test]
fn mark_read_targets_one_item() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    sign_in(&store, "evantimm", Role::Student);
    store.set_items_from_server(vec![sample(1, true), sample(2, true)]);

    store.mark_read(2);

    let snapshot = store.snapshot();
    assert!(snapshot.get(1).is_some_and(|n| n.unread));
    assert!(snapshot.get(2).is_some_and(|n| !n.unread));
    assert_eq!(snapshot.unread(), 1);
    assert_unread_invariant(&snapshot);
}

#[test]
fn mark_read_unknown_id_publishes_same_content() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    sign_in(&store, "evantimm", Role::Student);
    store.set_items_from_server(vec![sample(1, true)]);
    let calls = change_counter(&store);
    let before = store.snapshot();

    store.mark_read(42);

    let after = store.snapshot();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(*before, *after);
}

#[test]
fn add_prepends_and_caps_at_five() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    sign_in(&store, "evantimm", Role::Student);

    let mut ids = Vec::new();
    for i in 1..=6 {
        let n = store
            .add_notification(&format!("Title {i}"), "Body", NotificationKind::Info, None)
            .expect("signed in");
        ids.push(n.id);
        assert_eq!(store.snapshot().items()[0].id, n.id);
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.items().len(), 5);
    assert_eq!(snapshot.items()[0].title, "Title 6");
    assert!(snapshot.get(ids[0]).is_none(), "oldest item should be dropped");
    assert_eq!(snapshot.unread(), 5);
    assert_unread_invariant(&snapshot);

    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), ids.len(), "ids must not collide");
}

#[test]
fn cap_follows_options() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions { max_items: 2 });
    sign_in(&store, "evantimm", Role::Student);
    for title in ["a", "b", "c"] {
        store.add_notification(title, "", NotificationKind::Info, None);
    }
    let titles: Vec<_> = store.snapshot().items().iter().map(|n| n.title.clone()).collect();
    assert_eq!(titles, vec!["c", "b"]);
}

#[test]
fn switching_user_never_shows_previous_items() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());

    sign_in(&store, "evantimm", Role::Student);
    store.add_notification("Only for evan", "", NotificationKind::Info, None);

    sign_in(&store, "aidencox", Role::Admin);
    assert!(store.snapshot().is_empty());

    store.add_notification("Only for aiden", "", NotificationKind::Info, None);
    sign_in(&store, "evantimm", Role::Student);
    let titles: Vec<_> = store.snapshot().items().iter().map(|n| n.title.clone()).collect();
    assert_eq!(titles, vec!["Only for evan"]);
}

#[test]
fn identity_change_in_another_tab_refreshes() {
    let (session, local) = areas();
    let tab_a = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    let tab_b = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    let calls_a = change_counter(&tab_a);
    let calls_b = change_counter(&tab_b);

    let settings = NotificationsConfig::default();
    login(
        &tab_b,
        &PrefixAuthenticator,
        &Credentials::new("evantimm", "fR7!k9PzL2q#"),
        None,
        &settings,
    )
    .expect("login");

    // Tab A heard the identity write; tab B refreshed itself during login
    assert_eq!(calls_a.load(Ordering::SeqCst), 1);
    assert_eq!(calls_b.load(Ordering::SeqCst), 1);
    assert_eq!(tab_a.snapshot().items().len(), 2);
    assert_eq!(*tab_a.snapshot(), *tab_b.snapshot());

    logout(&tab_b).expect("logout");
    assert!(tab_a.snapshot().is_empty());
    assert!(tab_a.current_user().is_none());
}

#[test]
fn unrelated_keys_do_not_refresh() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    let calls = change_counter(&store);

    let other_tab = session.open_tab();
    other_tab.set_item("degreeadmin:theme", "dark").expect("write");
    local
        .open_tab()
        .set_item(&notification_key("evantimm"), "[]")
        .expect("write");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    other_tab
        .set_item(USER_KEY, r#"{"username":"evantimm","role":"student"}"#)
        .expect("write");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn rewriting_same_identity_is_silent() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    let calls = change_counter(&store);
    let other_tab = session.open_tab();
    let record = r#"{"username":"evantimm","role":"student"}"#;

    other_tab.set_item(USER_KEY, record).expect("write");
    other_tab.set_item(USER_KEY, record).expect("write");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn dropped_store_stops_listening() {
    let (session, local) = areas();
    let tab_a = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    let calls = change_counter(&tab_a);
    drop(tab_a);

    let tab_b = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    sign_in(&tab_b, "evantimm", Role::Student);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn set_items_from_server_replaces_list() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    sign_in(&store, "lauraben", Role::Student);
    store.add_notification("local", "", NotificationKind::Info, None);

    store.set_items_from_server(vec![sample(7, false), sample(8, true)]);

    let snapshot = store.snapshot();
    assert_eq!(
        snapshot.items().iter().map(|n| n.id).collect::<Vec<_>>(),
        vec![7, 8]
    );
    assert_eq!(snapshot.unread(), 1);
    assert_eq!(store.repository().load("lauraben").len(), 2);
}

#[test]
fn server_items_keep_unknown_type_tags() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    sign_in(&store, "evantimm", Role::Student);

    let items: Vec<Notification> = serde_json::from_str(
        r#"[{"id":1,"type":"DEGREE_AUDIT","title":"Audit ready","unread":true}]"#,
    )
    .expect("server payload");
    store.set_items_from_server(items);

    let stored = local
        .open_tab()
        .get_item(&notification_key("evantimm"))
        .expect("list stored");
    assert!(stored.contains(r#""type":"DEGREE_AUDIT""#), "{stored}");
    assert_eq!(
        store.repository().load("evantimm")[0].kind,
        NotificationKind::Other("DEGREE_AUDIT".to_string())
    );
}

#[test]
fn unread_count_holds_across_random_operations() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    sign_in(&store, "evantimm", Role::Student);
    store.set_items_from_server(vec![sample(1, true), sample(2, false), sample(3, true)]);

    // Fixed-seed xorshift so failures replay
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    for step in 0..500 {
        let roll = next();
        match roll % 4 {
            0 => store.mark_all_read(),
            1 => {
                let snapshot = store.snapshot();
                let id = if snapshot.is_empty() || roll % 3 == 0 {
                    -1
                } else {
                    let pick = usize::try_from(roll >> 8).unwrap_or(0) % snapshot.items().len();
                    snapshot.items()[pick].id
                };
                store.mark_read(id);
            }
            _ => {
                store.add_notification(&format!("step {step}"), "", NotificationKind::Info, None);
            }
        }

        let snapshot = store.snapshot();
        assert_unread_invariant(&snapshot);
        assert!(snapshot.items().len() <= 5, "step {step}");
        let stored = store.repository().load("evantimm");
        assert_eq!(stored.as_slice(), snapshot.items(), "step {step}");
    }
}

#[test]
fn ensure_loaded_only_fills_empty_snapshot() {
    let (session, local) = areas();
    let store = NotificationStore::open_tab(&session, &local, StoreOptions::default());
    let calls = change_counter(&store);

    store.ensure_loaded();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    sign_in(&store, "evantimm", Role::Student);
    store.add_notification("one", "", NotificationKind::Info, None);
    let before = calls.load(Ordering::SeqCst);
    store.ensure_loaded();
    assert_eq!(calls.load(Ordering::SeqCst), before);
}

#[test]
fn file_backed_state_survives_restart() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let open = || {
        let session = StorageArea::new(FileStorage::new(dir.path().join("session.json")));
        let local = StorageArea::new(FileStorage::new(dir.path().join("local.json")));
        NotificationStore::open_tab(&session, &local, StoreOptions::default())
    };

    let first = open();
    sign_in(&first, "evantimm", Role::Student);
    first.add_notification("Persisted", "", NotificationKind::Success, None);
    drop(first);

    let second = open();
    assert_eq!(second.current_user().map(|u| u.username).as_deref(), Some("evantimm"));
    assert_eq!(second.snapshot().items()[0].title, "Persisted");
}
