//! Co-op and credit-load request handlers

use super::{api_client, require_session};
use degree_admin::config::Config;
use degree_admin::core::requests::{
    submit_coop_request, submit_credit_load_request, CoopRequest, CreditLoadRequest,
};

/// Submit a co-op request, forwarding it to the API when one is configured
pub fn coop(config: &Config, request: &CoopRequest) {
    let store = require_session(config);
    let client = api_client(config);

    match submit_coop_request(&store, request, client.as_ref()) {
        Ok(notification) => {
            let earnings = request.earnings();
            println!("✓ {}", notification.title);
            println!("  {}", notification.detail);
            println!(
                "  Estimated earnings: ${:.2}/week over {} week(s), ${:.2} total",
                earnings.weekly, earnings.weeks, earnings.total
            );
        }
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}

/// Submit an under- or overload request
pub fn credits(config: &Config, request: &CreditLoadRequest) {
    let store = require_session(config);
    match submit_credit_load_request(&store, request) {
        Ok(notification) => println!("✓ {}\n  {}", notification.title, notification.detail),
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}
