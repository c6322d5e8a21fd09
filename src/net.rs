// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared HTTP client for provider calls.
//!
//! ```text
//! global_client()  OnceLock, connection pool, keep-alive
//!      |
//!      +--> CredentialBroker (token exchange, profile, repo listing)
//! ```
//!
//! No request timeout is set; callers bound latency themselves.

use reqwest::Client;
use std::sync::OnceLock;

/// User agent sent with every request. GitHub rejects API calls without one.
#[must_use]
pub fn user_agent() -> String {
    format!("amandus/{}", env!("CARGO_PKG_VERSION"))
}

/// Global HTTP client - initialized once, reused across all provider calls.
/// Falls back to a basic client if custom configuration fails.
pub fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(user_agent())
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}
