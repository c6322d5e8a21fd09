// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults
//! 2. amandus.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. AMANDUS_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! Nested keys are separated by a double underscore:
//!
//! ```text
//! AMANDUS_WORKSPACE__ROOT=/srv/repos          -> workspace.root
//! AMANDUS_SESSION__SECRET=...                 -> session.secret
//! AMANDUS_PROVIDERS__GITHUB__CLIENT_ID=abc    -> providers.github.client_id
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::auth::provider::Provider;
use crate::error::Result;

use loader::ConfigLoader;
use types::{GlobalConfig, ProvidersConfig, SessionConfig, WorkspaceConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging options.
    pub global: GlobalConfig,
    /// Workspace root.
    pub workspace: WorkspaceConfig,
    /// Session signing.
    pub session: SessionConfig,
    /// OAuth providers.
    pub providers: ProvidersConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use amandus::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("amandus.toml")
    ///     .with_env_prefix("AMANDUS")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Format configuration options for display.
    ///
    /// Secrets are shown as `[hidden]`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert(
            "global.output_log_level".to_string(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".to_string(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file".to_string(), log_file.display().to_string());
        }
        options.insert(
            "workspace.root".to_string(),
            self.workspace.root.display().to_string(),
        );
        if !self.session.secret.is_empty() {
            options.insert("session.secret".to_string(), "[hidden]".to_string());
        }

        for provider in Provider::ALL {
            let name = provider.as_str();
            let settings = self.providers.get(provider);
            options.insert(
                format!("providers.{name}.client_id"),
                settings.client_id.clone(),
            );
            if !settings.client_secret.is_empty() {
                options.insert(
                    format!("providers.{name}.client_secret"),
                    "[hidden]".to_string(),
                );
            }
            options.insert(
                format!("providers.{name}.callback_url"),
                settings.callback_url.clone(),
            );
            options.insert(
                format!("providers.{name}.auth_base"),
                provider.auth_base(settings).to_string(),
            );
            options.insert(
                format!("providers.{name}.api_base"),
                provider.api_base(settings).to_string(),
            );
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
