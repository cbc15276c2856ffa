//! User model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Student dashboards, plans and requests
    Student,
    /// Advisors approving requests
    Faculty,
    /// Catalog and user administration
    Admin,
    /// Role string not recognised by this client (e.g. from an older record)
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Derive a role from the username prefix convention used by the mock login
    ///
    /// Usernames starting with `a` are admins, `f` faculty, anything else a student.
    #[must_use]
    pub fn from_username_prefix(username: &str) -> Self {
        match username.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('a') => Self::Admin,
            Some('f') => Self::Faculty,
            _ => Self::Student,
        }
    }

    /// Lowercase name as stored in the identity record
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("Unknown role: '{s}'")),
        }
    }
}

/// Identity record for the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name; also keys the user's notification list
    pub username: String,

    /// Role deciding which dashboards the user may open
    pub role: Role,
}

impl User {
    /// Create a new user
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}
