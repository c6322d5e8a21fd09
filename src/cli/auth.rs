// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider and session command arguments.
//!
//! ```text
//! login-url PROVIDER        -> browser authorize URL
//! authorize PROVIDER CODE   -> service user + new session token
//! repos PROVIDER            -> repositories of the connected account
//! session issue --id --username [--email]
//! ```

use clap::{Args, Subcommand};

use super::SessionArgs;
use crate::auth::Provider;

/// A command naming one provider.
#[derive(Debug, Clone, Args)]
pub struct ProviderArgs {
    /// github, gitlab or bitbucket.
    #[arg(value_name = "PROVIDER")]
    pub provider: Provider,
}

/// Arguments for `authorize`.
#[derive(Debug, Clone, Args)]
pub struct AuthorizeArgs {
    /// github, gitlab or bitbucket.
    #[arg(value_name = "PROVIDER")]
    pub provider: Provider,

    /// Authorization code from the provider callback.
    #[arg(value_name = "CODE")]
    pub code: String,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for `repos`.
#[derive(Debug, Clone, Args)]
pub struct ReposArgs {
    /// github, gitlab or bitbucket.
    #[arg(value_name = "PROVIDER")]
    pub provider: Provider,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the `session` command.
#[derive(Debug, Clone, Args)]
pub struct SessionCommandArgs {
    #[command(subcommand)]
    pub subcommand: SessionSubcommand,
}

/// Session subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum SessionSubcommand {
    /// Issues a session token for a local user.
    Issue(IssueArgs),
}

/// Arguments for `session issue`.
#[derive(Debug, Clone, Args)]
pub struct IssueArgs {
    /// Local user id.
    #[arg(long)]
    pub id: String,

    /// Local user name, used as commit author.
    #[arg(short = 'u', long)]
    pub username: String,

    /// Commit author email.
    #[arg(short = 'e', long)]
    pub email: Option<String>,
}
