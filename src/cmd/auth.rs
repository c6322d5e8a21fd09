// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider and session commands.

use serde_json::json;

use super::print_json;
use crate::auth::LocalUser;
use crate::cli::auth::{
    AuthorizeArgs, ProviderArgs, ReposArgs, SessionCommandArgs, SessionSubcommand,
};
use crate::error::Result;
use crate::service::Amandus;

/// Runs `login-url`.
///
/// # Errors
///
/// Returns an error if the provider is not configured.
pub fn run_login_url_command(args: &ProviderArgs, amandus: &Amandus) -> Result<()> {
    let url = amandus.login_url(args.provider)?;
    print_json(&json!({ "provider": args.provider, "url": url }))
}

/// Runs `authorize`.
///
/// # Errors
///
/// Returns an error if the session is invalid, the code is refused, or the
/// provider cannot be reached.
pub async fn run_authorize_command(args: &AuthorizeArgs, amandus: &Amandus) -> Result<()> {
    let authorization = amandus
        .authorize(args.provider, &args.code, &args.session.token)
        .await?;
    print_json(&authorization)
}

/// Runs `repos`.
///
/// # Errors
///
/// Returns an error if the session holds no token for the provider or the
/// provider cannot be reached.
pub async fn run_repos_command(args: &ReposArgs, amandus: &Amandus) -> Result<()> {
    let repos = amandus
        .repositories(args.provider, &args.session.token)
        .await?;
    print_json(&repos)
}

/// Runs `session`.
///
/// # Errors
///
/// Returns an error if the token cannot be issued.
pub fn run_session_command(args: &SessionCommandArgs, amandus: &Amandus) -> Result<()> {
    match &args.subcommand {
        SessionSubcommand::Issue(issue) => {
            let token = amandus.issue_session(LocalUser {
                id: issue.id.clone(),
                username: issue.username.clone(),
                email: issue.email.clone(),
            })?;
            print_json(&json!({ "session_token": token }))
        }
    }
}
