// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit pipeline: branch, write, stage one path, commit.
//!
//! ```text
//! checkout_or_create(branch)
//!        |
//!        v
//! write <workspace>/<real name>   -- io error --> WorkspaceWriteError
//!        |
//!        v
//! git add -- <real name>
//!        |
//!        +-- nothing staged --> Unchanged
//!        v
//! git commit -- <real name>       -- failure --> git reset -- <real name>
//! ```

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use super::branch;
use crate::error::{AmandusResult, SyncError};
use crate::git::cmd::{self, CommitAuthor};

/// Characters removed from commit messages besides control characters.
const SHELL_CHARACTERS: &[char] = &['`', '$', '\\', ';', '|', '&', '<', '>', '"', '\''];

/// Whether a save produced a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    Committed,
    /// The file already had the submitted content; nothing to commit.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub branch: String,
    pub message: String,
    pub outcome: CommitOutcome,
}

/// Strip control characters (newlines kept) and shell-meaningful characters, then trim.
#[must_use]
pub fn sanitize_commit_message(raw: &str) -> String {
    raw.chars()
        .filter(|&c| (c == '\n' || !c.is_control()) && !SHELL_CHARACTERS.contains(&c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// The supplied message if anything survives sanitization, otherwise a generated one.
#[must_use]
pub fn compose_message(supplied: Option<&str>, username: &str, real_name: &str) -> String {
    supplied
        .map(sanitize_commit_message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("User {username} modified file {real_name}"))
}

fn write_file(workspace: &Path, real_name: &str, content: &str) -> Result<(), SyncError> {
    let path = workspace.join(real_name);
    let write_error = |source| SyncError::WorkspaceWriteError {
        path: real_name.to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(&path, content).map_err(write_error)
}

/// Write `content` to `real_name` on `branch` and commit that one file as `author`.
///
/// `username` is used in the generated message when `message` is empty.
///
/// # Errors
///
/// - `SyncError::InvalidFile` if `real_name` is empty.
/// - `SyncError::InvalidBranchName` if the branch sanitizes to nothing.
/// - `SyncError::WorkspaceWriteError` if the file cannot be written.
/// - `GitError` if staging or committing fails; the path is unstaged again.
pub fn save_and_commit(
    workspace: &Path,
    real_name: &str,
    content: &str,
    branch: &str,
    message: Option<&str>,
    author: &CommitAuthor,
) -> AmandusResult<CommitReport> {
    if real_name.trim().is_empty() {
        return Err(SyncError::InvalidFile(real_name.to_string()).into());
    }
    let branch_name = branch::sanitize_branch_name(branch)?;

    branch::checkout_or_create(workspace, &branch_name)?;
    write_file(workspace, real_name, content)?;
    cmd::add_path(workspace, real_name)?;

    let message = compose_message(message, &author.name, real_name);

    if cmd::staged_paths(workspace, real_name)?.is_empty() {
        info!(file = %real_name, branch = %branch_name, "content unchanged, nothing to commit");
        return Ok(CommitReport {
            branch: branch_name,
            message,
            outcome: CommitOutcome::Unchanged,
        });
    }

    if let Err(err) = cmd::commit_path(workspace, real_name, &message, author) {
        if let Err(reset_err) = cmd::unstage_path(workspace, real_name) {
            warn!(file = %real_name, error = %reset_err, "failed to unstage after commit failure");
        }
        return Err(err);
    }

    info!(file = %real_name, branch = %branch_name, "committed");
    Ok(CommitReport {
        branch: branch_name,
        message,
        outcome: CommitOutcome::Committed,
    })
}
