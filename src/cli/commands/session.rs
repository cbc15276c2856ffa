//! Login, logout and whoami handlers

use super::{api_client, open_store};
use degree_admin::config::Config;
use degree_admin::core::auth::{self, Authenticator, Credentials, PrefixAuthenticator};
use degree_admin::core::gate::{nav_links, role_home};
use std::io::{self, Write};

/// Sign in, seeding notifications per config
pub fn login(config: &Config, username: &str, password: Option<String>, from: Option<&str>, remote: bool) {
    let password = password.unwrap_or_else(prompt_password);
    let credentials = Credentials::new(username, password);

    let client = if remote {
        let Some(client) = api_client(config) else {
            eprintln!("✗ --remote needs an API endpoint (`degreeadmin config set endpoint <url>`)");
            std::process::exit(1);
        };
        Some(client)
    } else {
        None
    };
    let authenticator: &dyn Authenticator = match &client {
        Some(client) => client,
        None => &PrefixAuthenticator,
    };

    let store = open_store(config);
    match auth::login(&store, authenticator, &credentials, from, &config.notifications) {
        Ok(outcome) => {
            let unread = store.snapshot().unread();
            println!("✓ Signed in as {} ({})", outcome.user.username, outcome.user.role);
            println!("  {unread} unread notification(s)");
            println!("  Continue to {}", outcome.destination);
        }
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}

/// Sign out; stored notifications are kept for the next login
pub fn logout(config: &Config) {
    let store = open_store(config);
    let Some(user) = store.current_user() else {
        println!("✓ Already signed out");
        return;
    };
    if let Err(e) = auth::logout(&store) {
        eprintln!("✗ Failed to sign out: {e}");
        std::process::exit(1);
    }
    println!("✓ Signed out {}", user.username);
}

/// Show the signed-in user and their pages
pub fn whoami(config: &Config) {
    let store = open_store(config);
    let Some(user) = store.current_user() else {
        println!("Not signed in");
        return;
    };
    println!("{} ({})", user.username, user.role);
    println!("home: {}", role_home(user.role));
    degree_admin::verbose!(
        "pages: {}",
        nav_links(user.role)
            .iter()
            .map(|r| r.path)
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn prompt_password() -> String {
    print!("Password: ");
    io::stdout().flush().ok();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim_end_matches(['\r', '\n']).to_string()
}
