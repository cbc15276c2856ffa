//! Notifications command handler

use super::{api_client, require_session};
use crate::args::NotificationsSubcommand;
use degree_admin::config::Config;
use degree_admin::core::api::sync_notifications;
use degree_admin::core::models::{Notification, Snapshot};
use degree_admin::core::notifications::NotificationStore;

/// Dispatch notifications subcommands
pub fn run(subcommand: Option<NotificationsSubcommand>, config: &Config) {
    let store = require_session(config);
    match subcommand.unwrap_or(NotificationsSubcommand::List {
        unread: false,
        json: false,
    }) {
        NotificationsSubcommand::List { unread, json } => list(&store, unread, json),
        NotificationsSubcommand::Read { id } => read(&store, config, id),
        NotificationsSubcommand::ReadAll => read_all(&store, config),
        NotificationsSubcommand::Add {
            title,
            message,
            kind,
            category,
        } => {
            let added = store.add_notification(&title, &message, kind.into(), category.as_deref());
            if let Some(n) = added {
                println!("✓ Added #{} {}", n.id, n.heading());
            }
        }
        NotificationsSubcommand::Sync => sync(&store, config),
    }
}

fn list(store: &NotificationStore, unread_only: bool, json: bool) {
    let snapshot = store.snapshot();
    let items: Vec<&Notification> = if unread_only {
        snapshot.unread_items().collect()
    } else {
        snapshot.items().iter().collect()
    };

    if json {
        match serde_json::to_string_pretty(&items) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("✗ Failed to encode notifications: {e}"),
        }
        return;
    }

    println!("{}", summary(&snapshot));
    for n in items {
        println!("{}", format_row(n));
    }
}

fn summary(snapshot: &Snapshot) -> String {
    format!(
        "Notifications: {} total, {} unread",
        snapshot.items().len(),
        snapshot.unread()
    )
}

fn format_row(n: &Notification) -> String {
    let marker = if n.unread { "●" } else { " " };
    let mut row = format!("{marker} #{:<14} {:<28} {}", n.id, n.heading(), n.when);
    if !n.detail.is_empty() {
        row.push_str(&format!("\n    {}", n.detail));
    }
    if let Some(href) = &n.href {
        row.push_str(&format!("\n    → {href}"));
    }
    row
}

fn read(store: &NotificationStore, config: &Config, id: i64) {
    if store.snapshot().get(id).is_none() {
        eprintln!("✗ No notification #{id}");
        std::process::exit(1);
    }
    if let Some(client) = api_client(config) {
        if let Err(e) = client.mark_read(id) {
            eprintln!("✗ Server update failed: {e}");
        }
    }
    store.mark_read(id);
    println!("✓ Marked #{id} as read ({} unread)", store.snapshot().unread());
}

fn read_all(store: &NotificationStore, config: &Config) {
    if let Some(client) = api_client(config) {
        if let Err(e) = client.mark_all_read() {
            eprintln!("✗ Server update failed: {e}");
        }
    }
    store.mark_all_read();
    println!("✓ All notifications marked as read");
}

fn sync(store: &NotificationStore, config: &Config) {
    let Some(client) = api_client(config) else {
        eprintln!("✗ No API endpoint configured (`degreeadmin config set endpoint <url>`)");
        std::process::exit(1);
    };
    match sync_notifications(store, &client) {
        Ok(count) => println!("✓ Synced {count} notification(s)"),
        Err(e) => {
            eprintln!("✗ Sync failed: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use degree_admin::core::models::NotificationKind;

    #[test]
    fn test_row_marks_unread_and_link() {
        let n = Notification::new(1, NotificationKind::PlanChanged, "Plan updated", "Moved", "2h ago")
            .with_href("/student/plan");
        let row = format_row(&n);
        assert!(row.starts_with('●'));
        assert!(row.contains("→ /student/plan"));

        let row = format_row(&n.read());
        assert!(row.starts_with(' '));
    }

    #[test]
    fn test_summary_counts() {
        let snapshot = Snapshot::from_items(vec![
            Notification::new(1, NotificationKind::Info, "a", "", ""),
            Notification::new(2, NotificationKind::Info, "b", "", "").read(),
        ]);
        assert_eq!(summary(&snapshot), "Notifications: 2 total, 1 unread");
    }
}
