// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace commands.

use anyhow::Context;
use serde_json::json;

use super::print_json;
use crate::cli::repo::{RepoArgs, SaveArgs, SwitchBranchArgs};
use crate::error::Result;
use crate::service::Amandus;
use crate::sync::SyncEngine;
use crate::workspace::WorkspaceFile;

/// Runs `clone`.
///
/// # Errors
///
/// Returns an error if the clone or the fast-forward fails.
pub fn run_clone_command(args: &RepoArgs, engine: &SyncEngine) -> Result<()> {
    print_json(&engine.clone_or_sync(&args.url)?)
}

/// Runs `pull`.
///
/// # Errors
///
/// Returns an error if the workspace is missing or cannot be fast-forwarded.
pub fn run_pull_command(args: &RepoArgs, engine: &SyncEngine) -> Result<()> {
    print_json(&engine.pull_repository(&args.url)?)
}

/// Runs `state`.
///
/// # Errors
///
/// Returns an error if the workspace is missing or cannot be read.
pub fn run_state_command(args: &RepoArgs, engine: &SyncEngine) -> Result<()> {
    print_json(&engine.get_state(&args.url)?)
}

/// Runs `switch-branch`.
///
/// # Errors
///
/// Returns an error if the branch name is unusable or git refuses the checkout.
pub fn run_switch_branch_command(args: &SwitchBranchArgs, engine: &SyncEngine) -> Result<()> {
    let branch = engine.switch_branch(&args.url, &args.branch)?;
    print_json(&json!({ "branch": branch }))
}

/// Runs `save`.
///
/// # Errors
///
/// Returns an error if the content file cannot be read or the save fails.
pub fn run_save_command(args: &SaveArgs, amandus: &Amandus) -> Result<()> {
    let content = std::fs::read_to_string(&args.content_file)
        .with_context(|| format!("failed to read {}", args.content_file.display()))?;
    let file = WorkspaceFile {
        name: args.file.clone(),
        content,
    };

    let report = amandus.save(
        &file,
        &args.branch,
        args.message.as_deref(),
        &args.session.token,
    )?;
    print_json(&report)
}
