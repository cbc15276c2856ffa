//! CLI command handlers for `DegreeAdmin`.
//!
//! Each command is implemented in its own submodule. Handlers that need the session
//! open the file-backed storage areas through [`open_store`].

pub mod config;
pub mod notifications;
pub mod requests;
pub mod route;
pub mod session;

use degree_admin::config::Config;
use degree_admin::core::api::ApiClient;
use degree_admin::core::notifications::{NotificationStore, StoreOptions};
use degree_admin::core::storage::{FileStorage, StorageArea};

/// Session storage file under the data directory
pub const SESSION_FILE: &str = "session.json";
/// Local storage file under the data directory
pub const LOCAL_FILE: &str = "local.json";

/// Open a notification store on the configured data directory
pub fn open_store(config: &Config) -> NotificationStore {
    let data_dir = config.data_dir();
    degree_admin::debug!("Opening storage in {}", data_dir.display());
    let session = StorageArea::new(FileStorage::new(data_dir.join(SESSION_FILE)));
    let local = StorageArea::new(FileStorage::new(data_dir.join(LOCAL_FILE)));
    NotificationStore::open_tab(&session, &local, StoreOptions::from(&config.notifications))
}

/// Backend client when an endpoint is configured
pub fn api_client(config: &Config) -> Option<ApiClient> {
    if config.api.endpoint.trim().is_empty() {
        return None;
    }
    match ApiClient::from_config(&config.api) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("✗ {e}");
            None
        }
    }
}

/// Store with a signed-in user, or exit with a hint to log in
pub fn require_session(config: &Config) -> NotificationStore {
    let store = open_store(config);
    if store.current_user().is_none() {
        eprintln!("✗ Not signed in. Run `degreeadmin login <USERNAME>` first.");
        std::process::exit(1);
    }
    store
}
