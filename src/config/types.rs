// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: GlobalConfig, WorkspaceConfig, SessionConfig, ProvidersConfig
//! ProvidersConfig: github / gitlab / bitbucket -> ProviderConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::auth::provider::Provider;
use crate::logging::LogLevel;

/// Logging options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stderr output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Where repository workspaces live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Root directory; each repository gets a subdirectory named after its URL path.
    pub root: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("repositories"),
        }
    }
}

/// Session credential signing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// HMAC key for session credentials.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret: String,
}

/// OAuth application settings for one provider.
///
/// `auth_base` and `api_base` fall back to the public service endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub client_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub client_secret: String,
    pub callback_url: String,
    /// Base URL of the OAuth authorize/token endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_base: Option<String>,
    /// Base URL of the REST API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Whether the authorize URL can be built.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.callback_url.is_empty()
    }
}

/// Per-provider OAuth settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvidersConfig {
    pub github: ProviderConfig,
    pub gitlab: ProviderConfig,
    pub bitbucket: ProviderConfig,
}

impl ProvidersConfig {
    #[must_use]
    pub const fn get(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::GitHub => &self.github,
            Provider::GitLab => &self.gitlab,
            Provider::Bitbucket => &self.bitbucket,
        }
    }
}
