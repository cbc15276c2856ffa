//! CLI argument definitions for `DegreeAdmin`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use chrono::NaiveDate;
use degree_admin::config::ConfigOverrides;
use degree_admin::core::models::NotificationKind;
use degree_admin::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// Notification type accepted by `notifications add`
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    /// Generic information
    Info,
    /// Generic success
    Success,
    /// Generic warning
    Warning,
    /// Generic error
    Error,
    /// Co-op request event
    CoopRequest,
    /// Credit-load request event
    CreditLoadRequest,
    /// Plan change event
    PlanChanged,
    /// Advisor note
    FacultyGuidance,
    /// Approval
    FacultyApproved,
    /// Rejection
    FacultyRejected,
    /// Catalog change
    CourseAdded,
    /// New account
    UserCreated,
}

impl From<KindArg> for NotificationKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Info => Self::Info,
            KindArg::Success => Self::Success,
            KindArg::Warning => Self::Warning,
            KindArg::Error => Self::Error,
            KindArg::CoopRequest => Self::CoopRequest,
            KindArg::CreditLoadRequest => Self::CreditLoadRequest,
            KindArg::PlanChanged => Self::PlanChanged,
            KindArg::FacultyGuidance => Self::FacultyGuidance,
            KindArg::FacultyApproved => Self::FacultyApproved,
            KindArg::FacultyRejected => Self::FacultyRejected,
            KindArg::CourseAdded => Self::CourseAdded,
            KindArg::UserCreated => Self::UserCreated,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `endpoint`, `max_items`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum NotificationsSubcommand {
    /// List the signed-in user's notifications.
    List {
        /// Only show unread notifications
        #[arg(long)]
        unread: bool,
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark one notification as read.
    Read {
        /// Notification id
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Mark every notification as read.
    ReadAll,
    /// Add a notification for the signed-in user.
    Add {
        /// Title line
        #[arg(value_name = "TITLE")]
        title: String,
        /// Body text
        #[arg(value_name = "MESSAGE")]
        message: String,
        /// Notification type
        #[arg(short, long, value_enum, default_value = "info")]
        kind: KindArg,
        /// Optional category tag
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Replace the local list with the server's (requires an API endpoint).
    Sync,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Sign in and load your notifications.
    Login {
        /// Eight lowercase letters
        #[arg(value_name = "USERNAME")]
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Page to continue to after signing in
        #[arg(long, value_name = "PATH")]
        from: Option<String>,
        /// Authenticate against the configured API instead of offline
        #[arg(long)]
        remote: bool,
    },
    /// Sign out. Notifications stay stored for the next login.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Work with notifications.
    ///
    /// If no subcommand is provided, lists all notifications.
    Notifications {
        #[command(subcommand)]
        subcommand: Option<NotificationsSubcommand>,
    },
    /// Check whether a page may open for the signed-in user.
    ///
    /// Without a PATH, lists the pages available to the signed-in user.
    Route {
        /// Page path, e.g. `/student/plan`
        #[arg(value_name = "PATH")]
        path: Option<String>,
    },
    /// Submit a co-op request.
    Coop {
        /// Employer
        #[arg(long)]
        company: String,
        /// Job title
        #[arg(long)]
        position: String,
        /// First day (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        start: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        end: NaiveDate,
        /// Hourly pay
        #[arg(long, value_name = "RATE")]
        rate: f64,
        /// Hours per week
        #[arg(long, default_value_t = 40)]
        hours: u32,
        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Ask for an under- or overload in one term.
    Credits {
        /// Term name, e.g. "Spring 2026"
        #[arg(value_name = "TERM")]
        term: String,
        /// Requested credits
        #[arg(value_name = "CREDITS")]
        credits: u32,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "degreeadmin",
    about = "DegreeAdmin command-line client",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config API token
    #[arg(long = "config-api-token", value_name = "TOKEN")]
    pub config_api_token: Option<String>,

    /// Override config API token (short form)
    #[arg(long = "api-token", value_name = "TOKEN")]
    pub api_token: Option<String>,

    /// Override config API endpoint
    #[arg(long = "config-api-endpoint", value_name = "URL")]
    pub config_api_endpoint: Option<String>,

    /// Override config API endpoint (short form)
    #[arg(long = "api-endpoint", value_name = "URL")]
    pub api_endpoint: Option<String>,

    /// Override config storage directory
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override config notification cap
    #[arg(long = "max-items", value_name = "N", value_parser = clap::value_parser!(usize))]
    pub max_items: Option<usize>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--api-token`) take precedence over long-form flags
    /// (e.g., `--config-api-token`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            api_token: self
                .api_token
                .clone()
                .or_else(|| self.config_api_token.clone()),
            api_endpoint: self
                .api_endpoint
                .clone()
                .or_else(|| self.config_api_endpoint.clone()),
            data_dir: self
                .data_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            max_items: self.max_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("degreeadmin").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = parse(&["whoami"]).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.api_token.is_none());
        assert!(overrides.api_endpoint.is_none());
        assert!(overrides.data_dir.is_none());
        assert!(overrides.max_items.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let overrides = parse(&[
            "--config-level",
            "debug",
            "--config-verbose",
            "yes",
            "--api-endpoint",
            "https://short.example",
            "--config-api-endpoint",
            "https://long.example",
            "--config-api-token",
            "long-token",
            "--data-dir",
            "/tmp/degreeadmin",
            "--max-items",
            "3",
            "whoami",
        ])
        .to_config_overrides();

        assert_eq!(overrides.level.as_deref(), Some("debug"));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.api_endpoint.as_deref(), Some("https://short.example"));
        assert_eq!(overrides.api_token.as_deref(), Some("long-token"));
        assert_eq!(overrides.data_dir.as_deref(), Some("/tmp/degreeadmin"));
        assert_eq!(overrides.max_items, Some(3));
    }

    #[test]
    fn test_notifications_add_defaults_to_info() {
        let cli = parse(&["notifications", "add", "Hello", "World"]);
        match cli.command {
            Command::Notifications {
                subcommand: Some(NotificationsSubcommand::Add { kind, category, .. }),
            } => {
                assert_eq!(NotificationKind::from(kind), NotificationKind::Info);
                assert!(category.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_coop_dates_parse() {
        let cli = parse(&[
            "coop",
            "--company",
            "Acme",
            "--position",
            "Intern",
            "--start",
            "2026-01-05",
            "--end",
            "2026-04-24",
            "--rate",
            "20",
        ]);
        match cli.command {
            Command::Coop { start, hours, .. } => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
                assert_eq!(hours, 40);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let result = Cli::try_parse_from([
            "degreeadmin", "coop", "--company", "A", "--position", "B", "--start", "January",
            "--end", "2026-04-24", "--rate", "20",
        ]);
        assert!(result.is_err());
    }
}
