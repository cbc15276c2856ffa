//! Command-line interface entry point for `DegreeAdmin`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use degree_admin::config::Config;
use degree_admin::core::requests::{CoopRequest, CreditLoadRequest};
use degree_admin::info;
use degree_admin::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| Level::parse(&config.logging.level))
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // File logging: CLI flag wins, otherwise config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| std::path::PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Login {
            username,
            password,
            from,
            remote,
        } => commands::session::login(&config, &username, password, from.as_deref(), remote),
        Command::Logout => commands::session::logout(&config),
        Command::Whoami => commands::session::whoami(&config),
        Command::Notifications { subcommand } => commands::notifications::run(subcommand, &config),
        Command::Route { path } => commands::route::run(&config, path.as_deref()),
        Command::Coop {
            company,
            position,
            start,
            end,
            rate,
            hours,
            description,
        } => {
            let request = CoopRequest {
                company,
                position,
                start_date: start,
                end_date: end,
                hourly_rate: rate,
                hours_per_week: hours,
                description,
            };
            commands::requests::coop(&config, &request);
        }
        Command::Credits { term, credits } => {
            commands::requests::credits(&config, &CreditLoadRequest { term, credits });
        }
    }
}
