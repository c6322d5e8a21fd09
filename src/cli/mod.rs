// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for amandus using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! amandus [global options] <command>
//! version | options | config-files
//! clone | pull | state | switch-branch | save
//! login-url | authorize | repos
//! session issue
//! ```

pub mod auth;
pub mod global;
pub mod repo;

#[cfg(test)]
mod tests;

use crate::cli::auth::{AuthorizeArgs, ProviderArgs, ReposArgs, SessionCommandArgs};
use crate::cli::global::GlobalOptions;
use crate::cli::repo::{RepoArgs, SaveArgs, SwitchBranchArgs};
use clap::{Args, Parser, Subcommand};

/// Server-side git workspaces for browser-based editing.
#[derive(Debug, Parser)]
#[command(
    name = "amandus",
    author,
    version,
    about = "Git workspace service",
    long_about = "amandus Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Keeps server-side clones of remote repositories, commits edits\n\
                  made in the browser and pushes them with the user's provider\n\
                  token. Every command prints JSON on stdout.",
    after_help = "CONFIGURATION:\n\n\
                  amandus reads `amandus.toml` from the current directory, then each\n\
                  --config file in order, then AMANDUS_* environment variables\n\
                  (e.g. AMANDUS_SESSION__SECRET, AMANDUS_PROVIDERS__GITHUB__CLIENT_ID).\n\
                  Command-line flags override all of them. Use --no-default-config\n\
                  to skip `amandus.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in load order.
    #[command(name = "config-files")]
    ConfigFiles,

    /// Clones a repository, or fast-forwards its default branch if already cloned.
    Clone(RepoArgs),

    /// Fast-forwards the default branch of a cloned repository.
    Pull(RepoArgs),

    /// Shows the current branch, local branches and files of a repository.
    State(RepoArgs),

    /// Checks out a branch, creating it if needed.
    #[command(name = "switch-branch")]
    SwitchBranch(SwitchBranchArgs),

    /// Writes, commits and pushes one file.
    Save(SaveArgs),

    /// Prints the browser login URL for a provider.
    #[command(name = "login-url")]
    LoginUrl(ProviderArgs),

    /// Exchanges an authorization code and connects the provider to the session.
    Authorize(AuthorizeArgs),

    /// Lists the repositories of the connected provider account.
    Repos(ReposArgs),

    /// Manages session tokens.
    Session(SessionCommandArgs),
}

/// The session token of the calling user.
#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Session token.
    #[arg(long = "session", env = "AMANDUS_SESSION_TOKEN", hide_env_values = true)]
    pub token: String,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
