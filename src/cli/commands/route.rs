//! Route command handler

use super::open_store;
use degree_admin::config::Config;
use degree_admin::core::gate::{find_route, nav_links, resolve, RouteDecision};
use degree_admin::core::models::User;

/// Print the gate's decision for `path`, or the signed-in user's pages
pub fn run(config: &Config, path: Option<&str>) {
    let user = open_store(config).current_user();
    match path {
        Some(path) => println!("{}", describe(path, user.as_ref())),
        None => list_pages(user.as_ref()),
    }
}

fn describe(path: &str, user: Option<&User>) -> String {
    match resolve(path, user) {
        RouteDecision::Render => {
            let title = find_route(path).map_or(path, |r| r.title);
            format!("✓ {path} opens: {title}")
        }
        RouteDecision::Redirect { to, from: Some(from) } => {
            format!("→ {path} redirects to {to} (returns to {from} after login)")
        }
        RouteDecision::Redirect { to, from: None } => format!("→ {path} redirects to {to}"),
    }
}

fn list_pages(user: Option<&User>) {
    let Some(user) = user else {
        println!("Not signed in; only /login is available");
        return;
    };
    println!("Pages for {} ({}):", user.username, user.role);
    for route in nav_links(user.role) {
        println!("  {:<26} {}", route.path, route.title);
    }
}
