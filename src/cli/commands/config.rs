//! Config command handler

use crate::args::ConfigSubcommand;
use degree_admin::config::Config;
use std::io::{self, BufRead, Write};

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    match subcommand {
        None | Some(ConfigSubcommand::Get { key: None }) => show_all(config),
        Some(ConfigSubcommand::Get { key: Some(key) }) => show_key(config, &key),
        Some(ConfigSubcommand::Set { key, value }) => {
            if let Err(e) = config.set(&key, &value) {
                fail(&e);
            }
            save(config);
            println!("✓ Set {key} = {value}");
        }
        Some(ConfigSubcommand::Unset { key }) => {
            if let Err(e) = config.unset(&key, defaults) {
                fail(&e);
            }
            save(config);
            let restored = config.get(&key).unwrap_or_default();
            println!("✓ Reset {key} to default ({restored})");
        }
        Some(ConfigSubcommand::Reset) => reset(&mut io::stdin().lock()),
    }
}

fn show_all(config: &Config) {
    println!("\n=== Configuration ===");
    println!("(file: {})\n", Config::get_config_file_path().display());
    print!("{config}");
    println!("data directory: {}", config.data_dir().display());
}

fn show_key(config: &Config, key: &str) {
    match config.get(key) {
        Some(value) => println!("{value}"),
        None => fail(&format!("Unknown config key: '{key}'")),
    }
}

fn save(config: &Config) {
    if let Err(e) = config.save() {
        fail(&format!("Failed to save config: {e}"));
    }
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {message}");
    std::process::exit(1);
}

/// Remove the config file after a y/yes confirmation read from `input`
fn reset(input: &mut impl BufRead) {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return;
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    if !confirmed(input) {
        println!("✗ Reset cancelled");
        return;
    }
    if let Err(e) = Config::reset() {
        fail(&format!("Failed to remove config file: {e}"));
    }
    println!("✓ Config reset to defaults");
}

fn confirmed(input: &mut impl BufRead) -> bool {
    let mut response = String::new();
    if input.read_line(&mut response).is_err() {
        return false;
    }
    matches!(response.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
