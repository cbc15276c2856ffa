//! Configuration module for `DegreeAdmin`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to the `DegreeAdmin` config directory.
const DIR_VARIABLE: &str = "$DEGREE_ADMIN";

/// Notification cap used when the config leaves `max_items` unset.
pub const DEFAULT_MAX_NOTIFICATIONS: usize = 5;

const fn default_max_items() -> usize {
    DEFAULT_MAX_NOTIFICATIONS
}

const fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Backend API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer token sent with every request (empty for none)
    #[serde(default)]
    pub token: String,
    /// Base URL of the REST API (empty disables backend calls)
    #[serde(default)]
    pub endpoint: String,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the session and local storage files
    #[serde(default)]
    pub data_dir: String,
}

/// Notification store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum number of notifications kept after an add
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Write the role's demo notifications on login
    #[serde(default = "default_true")]
    pub seed_on_login: bool,
    /// Overwrite an existing list when seeding
    #[serde(default)]
    pub reseed: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_NOTIFICATIONS,
            seed_on_login: true,
            reseed: false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Notification settings
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override API token
    pub api_token: Option<String>,
    /// Override API endpoint
    pub api_endpoint: Option<String>,
    /// Override storage directory
    pub data_dir: Option<String>,
    /// Override notification cap
    pub max_items: Option<usize>,
}

impl Config {
    /// Get the `$DEGREE_ADMIN` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/degreeadmin`
    /// - macOS: `~/Library/Application Support/degreeadmin`
    /// - Windows: `%APPDATA%\degreeadmin`
    #[must_use]
    pub fn get_degreeadmin_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("degreeadmin")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty in the current config and non-empty in
    /// defaults are updated, so upgrades pick up new settings without
    /// clobbering user values.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.api.token.is_empty() && !defaults.api.token.is_empty() {
            self.api.token.clone_from(&defaults.api.token);
            changed = true;
        }
        if self.api.endpoint.is_empty() && !defaults.api.endpoint.is_empty() {
            self.api.endpoint.clone_from(&defaults.api.endpoint);
            changed = true;
        }

        if self.storage.data_dir.is_empty() && !defaults.storage.data_dir.is_empty() {
            self.storage.data_dir.clone_from(&defaults.storage.data_dir);
            changed = true;
        }

        // A zero cap would drop every added notification
        if self.notifications.max_items == 0 {
            self.notifications.max_items = defaults.notifications.max_items;
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Only non-`None` values replace config values; the config file is not touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(token) = &overrides.api_token {
            self.api.token.clone_from(token);
        }
        if let Some(endpoint) = &overrides.api_endpoint {
            self.api.endpoint.clone_from(endpoint);
        }

        if let Some(data_dir) = &overrides.data_dir {
            self.storage.data_dir.clone_from(data_dir);
        }
        if let Some(max_items) = overrides.max_items {
            self.notifications.max_items = max_items;
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// [`get_degreeadmin_dir`].
    ///
    /// [`get_degreeadmin_dir`]: Self::get_degreeadmin_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_degreeadmin_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$DEGREE_ADMIN` variable in a string
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_degreeadmin_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses the TOML and expands any `$DEGREE_ADMIN` variables in path-like
    /// values. Missing fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.api.endpoint = Self::expand_variables(&config.api.endpoint);
        config.storage.data_dir = Self::expand_variables(&config.storage.data_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The defaults are
    /// compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: loads it, merges missing fields from defaults and
    ///   saves the merged result.
    /// - On first run: creates the config directory and writes the defaults.
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the platform config file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created, the config cannot be
    /// serialized, or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Directory holding the storage files, falling back to `$DEGREE_ADMIN/data`
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::get_degreeadmin_dir().join("data")
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `token`, `endpoint`, `data_dir`,
    /// `max_items`, `seed_on_login`, `reseed`. Dashed spellings are accepted for the
    /// multi-word keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "token" => Some(self.api.token.clone()),
            "endpoint" => Some(self.api.endpoint.clone()),
            "data_dir" | "data-dir" => Some(self.storage.data_dir.clone()),
            "max_items" | "max-items" => Some(self.notifications.max_items.to_string()),
            "seed_on_login" | "seed-on-login" => {
                Some(self.notifications.seed_on_login.to_string())
            }
            "reseed" => Some(self.notifications.reseed.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config only. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value cannot be parsed
    /// (e.g. "maybe" for a boolean, or a zero cap).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool(key, value)?,
            "token" => self.api.token = value.to_string(),
            "endpoint" => self.api.endpoint = value.to_string(),
            "data_dir" | "data-dir" => self.storage.data_dir = value.to_string(),
            "max_items" | "max-items" => {
                let cap = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid number for 'max_items': '{value}'"))?;
                if cap == 0 {
                    return Err("'max_items' must be at least 1".to_string());
                }
                self.notifications.max_items = cap;
            }
            "seed_on_login" | "seed-on-login" => {
                self.notifications.seed_on_login = parse_bool(key, value)?;
            }
            "reseed" => self.notifications.reseed = parse_bool(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "token" => self.api.token.clone_from(&defaults.api.token),
            "endpoint" => self.api.endpoint.clone_from(&defaults.api.endpoint),
            "data_dir" | "data-dir" => self
                .storage
                .data_dir
                .clone_from(&defaults.storage.data_dir),
            "max_items" | "max-items" => {
                self.notifications.max_items = defaults.notifications.max_items;
            }
            "seed_on_login" | "seed-on-login" => {
                self.notifications.seed_on_login = defaults.notifications.seed_on_login;
            }
            "reseed" => self.notifications.reseed = defaults.notifications.reseed,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load) recreates it.
    /// Succeeds without doing anything when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Invalid boolean value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[api]")?;
        writeln!(f, "  token = \"{}\"", self.api.token)?;
        writeln!(f, "  endpoint = \"{}\"", self.api.endpoint)?;

        writeln!(f, "\n[storage]")?;
        writeln!(f, "  data_dir = \"{}\"", self.storage.data_dir)?;

        writeln!(f, "\n[notifications]")?;
        writeln!(f, "  max_items = {}", self.notifications.max_items)?;
        writeln!(f, "  seed_on_login = {}", self.notifications.seed_on_login)?;
        writeln!(f, "  reseed = {}", self.notifications.reseed)?;

        Ok(())
    }
}
