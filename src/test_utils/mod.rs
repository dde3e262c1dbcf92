#![allow(missing_docs)]

pub(crate) mod http;

pub(crate) use http::{create_transaction_for, get_test_server, register_and_log_in};

use std::str::FromStr;

use email_address::EmailAddress;
use rusqlite::Connection;
use time::Duration;

use crate::AppState;

pub(crate) const TEST_SECRET: &str = "nafstenoas";
pub(crate) const TEST_PASSWORD: &str = "correcthorsebatterystaple";

/// Build `{name}@example.com`.
#[track_caller]
pub(crate) fn test_email(name: &str) -> EmailAddress {
    EmailAddress::from_str(&format!("{name}@example.com")).expect("invalid test email")
}

/// An app state with an in-memory database and a cheap password hash cost.
pub(crate) fn get_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");

    AppState::new(connection, TEST_SECRET, Duration::hours(1))
        .expect("Could not create app state")
        .with_password_hash_cost(4)
}
