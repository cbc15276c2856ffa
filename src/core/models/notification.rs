//! Notification model and store snapshot

use serde::{Deserialize, Serialize};

/// Notification type tag
///
/// Domain events use upper snake case on the wire; the generic toast levels are lowercase.
/// Tags this client does not know are kept verbatim in [`NotificationKind::Other`] so a
/// stored list writes them back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A student submitted a co-op request
    #[serde(rename = "COOP_REQUEST")]
    CoopRequest,
    /// A student asked for an under- or overload
    #[serde(rename = "CREDIT_LOAD_REQUEST")]
    CreditLoadRequest,
    /// The degree plan was regenerated or edited
    #[serde(rename = "PLAN_CHANGED")]
    PlanChanged,
    /// An advisor left a note
    #[serde(rename = "FACULTY_GUIDANCE")]
    FacultyGuidance,
    /// An advisor approved a request
    #[serde(rename = "FACULTY_APPROVED")]
    FacultyApproved,
    /// An advisor rejected a request
    #[serde(rename = "FACULTY_REJECTED")]
    FacultyRejected,
    /// A course was added to the catalog
    #[serde(rename = "COURSE_ADDED")]
    CourseAdded,
    /// An account was created
    #[serde(rename = "USER_CREATED")]
    UserCreated,
    /// Generic information
    #[serde(rename = "info")]
    Info,
    /// Generic success
    #[serde(rename = "success")]
    Success,
    /// Generic warning
    #[serde(rename = "warning")]
    Warning,
    /// Generic error
    #[serde(rename = "error")]
    Error,
    /// Tag not known to this client, as received
    #[serde(untagged)]
    Other(String),
}

impl NotificationKind {
    /// Short label shown in front of the title
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CoopRequest => "Co-op",
            Self::CreditLoadRequest => "Credits",
            Self::PlanChanged => "Plan",
            Self::FacultyGuidance => "Guidance",
            Self::FacultyApproved => "Approved",
            Self::FacultyRejected => "Denied",
            Self::CourseAdded => "Catalog",
            Self::UserCreated => "Users",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Info | Self::Success | Self::Other(_) => "Info",
        }
    }
}

/// A single notification in a user's feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Identifier, unique within one user's list
    pub id: i64,

    /// Type tag
    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Headline
    pub title: String,

    /// Body text. Server payloads may call this `message`.
    #[serde(default, alias = "message")]
    pub detail: String,

    /// Display time ("2h ago") or an RFC 3339 timestamp
    #[serde(default)]
    pub when: String,

    /// Whether the user has not seen it yet
    #[serde(default)]
    pub unread: bool,

    /// Navigation target opened when the notification is clicked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// Free-form grouping supplied by the creating flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Notification {
    /// Create an unread notification without a link or category
    #[must_use]
    pub fn new(
        id: i64,
        kind: NotificationKind,
        title: impl Into<String>,
        detail: impl Into<String>,
        when: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            detail: detail.into(),
            when: when.into(),
            unread: true,
            href: None,
            category: None,
        }
    }

    /// Attach a navigation target
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Mark as already read
    #[must_use]
    pub const fn read(mut self) -> Self {
        self.unread = false;
        self
    }

    /// `"Label: Title"` as shown in the bell and the notification page
    #[must_use]
    pub fn heading(&self) -> String {
        format!("{}: {}", self.kind.label(), self.title)
    }
}

/// Store state at one point in time
///
/// `unread` is derived from `items` on construction and cannot be set on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    items: Vec<Notification>,
    unread: usize,
}

impl Snapshot {
    /// Build a snapshot, counting unread items
    #[must_use]
    pub fn from_items(items: Vec<Notification>) -> Self {
        let unread = count_unread(&items);
        Self { items, unread }
    }

    /// Notifications, newest first when created through the store
    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Number of unread notifications
    #[must_use]
    pub const fn unread(&self) -> usize {
        self.unread
    }

    /// Whether the snapshot holds no notifications
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a notification by id
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Unread notifications only, in list order
    pub fn unread_items(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().filter(|n| n.unread)
    }
}

/// Count unread notifications
#[must_use]
pub fn count_unread(items: &[Notification]) -> usize {
    items.iter().filter(|n| n.unread).count()
}
