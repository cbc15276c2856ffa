//! Demo notifications written on login, standing in for a backend feed

use super::repository::NotificationRepository;
use crate::core::models::{Notification, NotificationKind, Role, User};
use crate::core::storage::StorageError;
use chrono::{DateTime, Local};

/// Demo feed for a role
#[must_use]
pub fn seed_for(role: Role, now: DateTime<Local>) -> Vec<Notification> {
    match role {
        Role::Student => vec![
            Notification::new(
                1,
                NotificationKind::PlanChanged,
                "Plan updated",
                "CSE 3220 got moved to Spring to meet the prerequisites.",
                "2h ago",
            )
            .with_href("/student/plan"),
            Notification::new(
                2,
                NotificationKind::FacultyGuidance,
                "Advisor note",
                "Think about a lighter load with the upcoming co-op.",
                "Yesterday",
            )
            .with_href("/student/requests"),
        ],
        Role::Faculty => vec![Notification::new(
            101,
            NotificationKind::CreditLoadRequest,
            "Overload request",
            "Student asks to take 21 credits in Spring.",
            "3h ago",
        )
        .with_href("/faculty/approvals")],
        Role::Admin => vec![
            Notification::new(
                201,
                NotificationKind::CourseAdded,
                "Catalog change",
                "Added CEG 4xxx Experimental Networks.",
                now.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            )
            .with_href("/admin/catalog")
            .read(),
            Notification::new(
                202,
                NotificationKind::UserCreated,
                "New faculty",
                "Onboarded jsmith (faculty).",
                "Yesterday",
            )
            .with_href("/admin/users"),
        ],
        Role::Unknown => Vec::new(),
    }
}

/// Write the demo feed for `user`
///
/// With `overwrite` unset an existing list is kept. Returns whether anything was written.
///
/// # Errors
/// Returns an error if the feed cannot be written.
pub fn ensure_seed(
    repository: &NotificationRepository,
    user: &User,
    overwrite: bool,
) -> Result<bool, StorageError> {
    if !overwrite && repository.exists(&user.username) {
        return Ok(false);
    }
    let items = seed_for(user.role, Local::now());
    repository.save(&user.username, &items)?;
    crate::debug!("Seeded {} notification(s) for {}", items.len(), user.username);
    Ok(true)
}
