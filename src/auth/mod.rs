// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider authorization and session credentials.
//!
//! ```text
//! provider.rs  Provider table, raw response shapes -> ServiceUser / RepoSummary
//! broker.rs    CredentialBroker: code exchange, profile, repo listing (reqwest)
//! session.rs   SessionSigner: issue / merge / decode (HMAC-SHA256)
//! ```

pub mod broker;
pub mod provider;
pub mod session;


pub use broker::CredentialBroker;
pub use provider::{Provider, RepoSummary, ServiceUser};
pub use session::{LocalUser, SessionCredential, SessionSigner};
