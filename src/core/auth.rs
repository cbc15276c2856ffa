//! Login and logout flows
//!
//! A login validates the credentials locally, asks an [`Authenticator`] who the user is,
//! records the identity, seeds the demo feed and reloads the notification store.

use crate::config::NotificationsConfig;
use crate::core::api::ApiError;
use crate::core::gate::role_home;
use crate::core::models::{Role, User};
use crate::core::notifications::{ensure_seed, NotificationStore};
use crate::core::storage::StorageError;
use crate::core::validation::{is_valid_password, is_valid_username, PASSWORD_RULE, USERNAME_RULE};
use thiserror::Error;

/// Username and password as typed by the user
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Plain password
    pub password: String,
}

impl Credentials {
    /// Bundle a username and password
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Errors raised while signing in
#[derive(Debug, Error)]
pub enum LoginError {
    /// Username failed local validation
    #[error("{}", USERNAME_RULE)]
    InvalidUsername,
    /// Password failed local validation
    #[error("{}", PASSWORD_RULE)]
    InvalidPassword,
    /// The authenticator does not know the user
    #[error("You aren't in our system. Please contact CATS for help.")]
    Rejected,
    /// The identity record could not be written
    #[error("failed to store session: {0}")]
    Storage(#[from] StorageError),
    /// The backend could not be reached or answered with an error
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Resolves credentials to a user
pub trait Authenticator {
    /// Look up the user behind `credentials`
    ///
    /// # Errors
    /// Returns [`LoginError::Rejected`] for unknown users, or a transport error.
    fn authenticate(&self, credentials: &Credentials) -> Result<User, LoginError>;
}

/// Offline authenticator deriving the role from the first letter of the username
///
/// `a…` is an admin, `f…` is faculty and everyone else is a student.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixAuthenticator;

impl Authenticator for PrefixAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<User, LoginError> {
        let username = credentials.username.to_lowercase();
        let role = Role::from_username_prefix(&username);
        Ok(User::new(username, role))
    }
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The signed-in user
    pub user: User,
    /// Path to navigate to next
    pub destination: String,
}

/// Check both fields against the login rules
///
/// # Errors
/// Returns the first rule that fails.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), LoginError> {
    if !is_valid_username(&credentials.username) {
        return Err(LoginError::InvalidUsername);
    }
    if !is_valid_password(&credentials.password) {
        return Err(LoginError::InvalidPassword);
    }
    Ok(())
}

/// Sign in through `authenticator` and load the user's notifications into `store`
///
/// The destination is `remembered_from` when the gate recorded one, otherwise the
/// role's home.
///
/// # Errors
/// Returns an error if validation or authentication fails, or the session cannot be
/// stored. A failed seed is logged and does not fail the login.
pub fn login(
    store: &NotificationStore,
    authenticator: &dyn Authenticator,
    credentials: &Credentials,
    remembered_from: Option<&str>,
    settings: &NotificationsConfig,
) -> Result<LoginOutcome, LoginError> {
    validate_credentials(credentials)?;

    let user = authenticator.authenticate(credentials).inspect_err(|e| {
        crate::warn!("Login failed for {}: {e}", credentials.username);
    })?;

    // Seed first: other tabs reload as soon as the identity record changes
    if settings.seed_on_login {
        if let Err(e) = ensure_seed(store.repository(), &user, settings.reseed) {
            crate::error!("Failed to seed notifications for {}: {e}", user.username);
        }
    }
    store.identity().sign_in(&user)?;
    store.refresh();

    let destination = remembered_from.map_or_else(|| role_home(user.role).to_string(), str::to_string);
    crate::debug!("Login complete for {}, continuing to {destination}", user.username);
    Ok(LoginOutcome { user, destination })
}

/// Clear the session and empty the store; stored notification lists stay in place
///
/// # Errors
/// Returns an error if the identity record cannot be removed.
pub fn logout(store: &NotificationStore) -> Result<(), StorageError> {
    store.identity().sign_out()?;
    store.refresh();
    Ok(())
}
