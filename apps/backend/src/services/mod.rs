//! Outbound clients and the per-owner workspace registry.

pub mod auth;
pub mod checkout;
pub mod dictionary;
pub mod workspaces;

use std::time::Duration;

use reqwest::Client;

/// Shared HTTP client for outbound calls.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("vocablog-backend/", env!("CARGO_PKG_VERSION")))
        .build()
}
