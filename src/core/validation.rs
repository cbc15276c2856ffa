//! Credential format checks applied before a login attempt

use regex::Regex;
use std::sync::LazyLock;

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{8}$").expect("username pattern is valid"));
static UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("uppercase pattern is valid"));
static LOWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]").expect("lowercase pattern is valid"));
static DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("digit pattern is valid"));
static SPECIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("special character pattern is valid")
});

/// Shortest accepted password
pub const PASSWORD_MIN_LEN: usize = 8;
/// Longest accepted password
pub const PASSWORD_MAX_LEN: usize = 40;

/// Message shown when the username check fails
pub const USERNAME_RULE: &str = "Username has to be exactly 8 lowercase letters.";
/// Message shown when the password check fails
pub const PASSWORD_RULE: &str =
    "Password must be 8-40 characters with 1 uppercase, 1 lowercase, 1 number, and 1 symbol.";

/// Username: exactly eight lowercase ASCII letters
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    USERNAME.is_match(username)
}

/// Password: 8-40 characters with at least one uppercase letter, lowercase letter,
/// digit and symbol
#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return false;
    }
    UPPER.is_match(password)
        && LOWER.is_match(password)
        && DIGIT.is_match(password)
        && SPECIAL.is_match(password)
}
