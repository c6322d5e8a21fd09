// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE           <- Additional config files (can repeat)
//! --log-level N           <- Console verbosity (0-6)
//! --file-log-level N      <- File verbosity (falls back to --log-level)
//! --log-file FILE         <- global.log_file override
//! --workspace-root DIR    <- workspace.root override
//!
//! Precedence: CLI flags > AMANDUS_* env > --config > amandus.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Config file picked up from the current directory unless `--no-default-config`.
pub const DEFAULT_CONFIG_FILE: &str = "amandus.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "AMANDUS";

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times; later files override earlier ones.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, defaults to --log-level.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Directory holding the repository workspaces.
    #[arg(short = 'w', long = "workspace-root", value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Does not load `amandus.toml` from the current directory, only --config.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,
}

impl GlobalOptions {
    /// Configuration loader for these options: default file, `--config` files,
    /// environment, then command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be turned into a configuration value.
    pub fn config_loader(&self) -> Result<ConfigLoader> {
        let mut loader = ConfigLoader::new();
        if !self.no_default_config {
            loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
        }
        for path in &self.configs {
            loader = loader.add_toml_file(path);
        }
        self.apply_overrides(loader.with_env_prefix(ENV_PREFIX))
    }

    /// Applies command-line flags as highest-precedence overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be turned into a configuration value.
    pub fn apply_overrides(&self, mut loader: ConfigLoader) -> Result<ConfigLoader> {
        if let Some(level) = self.log_level {
            loader = loader.set("global.output_log_level", i64::from(level))?;
        }

        if let Some(level) = self.file_log_level.or(self.log_level) {
            loader = loader.set("global.file_log_level", i64::from(level))?;
        }

        if let Some(ref path) = self.log_file {
            loader = loader.set("global.log_file", path.display().to_string())?;
        }

        if let Some(ref root) = self.workspace_root {
            loader = loader.set("workspace.root", root.display().to_string())?;
        }

        Ok(loader)
    }
}
