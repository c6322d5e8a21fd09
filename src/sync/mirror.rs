// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository mirror manager: clone on first use, fast-forward afterwards.

use std::path::Path;
use tracing::info;

use crate::error::{AmandusError, AmandusResult, GitError, SyncError};
use crate::git::{cmd, query};

/// Used when `origin/HEAD` is not recorded in the clone.
pub const FALLBACK_DEFAULT_BRANCH: &str = "master";

const MISSING_REPOSITORY_MARKERS: &[&str] = &[
    "does not appear to be a git repository",
    "not a git repository",
    "repository not found",
    "does not exist",
    "not found",
];

const NON_FAST_FORWARD_MARKERS: &[&str] = &[
    "not possible to fast-forward",
    "non-fast-forward",
    "[rejected]",
    "would be overwritten",
    "diverging branches",
];

fn failure_message(err: &AmandusError) -> String {
    match err.as_git() {
        Some(GitError::CommandFailed { message, .. }) => message.clone(),
        _ => err.to_string(),
    }
}

/// `InvalidRepository` when git says there is no repository, `RemoteUnavailable` otherwise.
#[must_use]
pub fn classify_clone_failure(url: &str, message: &str) -> SyncError {
    let lowered = message.to_ascii_lowercase();
    if MISSING_REPOSITORY_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        SyncError::InvalidRepository {
            url: url.to_string(),
            message: message.to_string(),
        }
    } else {
        SyncError::RemoteUnavailable {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}

/// `SyncConflict` when git refused to fast-forward, `RemoteUnavailable` otherwise.
#[must_use]
pub fn classify_pull_failure(url: &str, branch: &str, message: &str) -> SyncError {
    let lowered = message.to_ascii_lowercase();
    if NON_FAST_FORWARD_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        SyncError::SyncConflict {
            branch: branch.to_string(),
            message: message.to_string(),
        }
    } else {
        SyncError::RemoteUnavailable {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}

/// Clone `url` into `workspace` unless it is already there.
///
/// Returns `true` if a clone happened.
///
/// # Errors
///
/// - `SyncError::InvalidRepository` if the URL is not a git remote, or the
///   workspace path is occupied by something that is not a repository.
/// - `SyncError::RemoteUnavailable` for network or authentication failures.
/// - `SyncError::WorkspaceWriteError` if the parent directory cannot be created.
pub fn ensure_cloned(url: &str, workspace: &Path) -> AmandusResult<bool> {
    if workspace.exists() {
        if query::is_git_repo(workspace) {
            return Ok(false);
        }
        return Err(SyncError::InvalidRepository {
            url: url.to_string(),
            message: format!("{} exists and is not a repository", workspace.display()),
        }
        .into());
    }

    if let Some(parent) = workspace.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SyncError::WorkspaceWriteError {
            path: parent.display().to_string(),
            source,
        })?;
    }

    cmd::clone(url, workspace)
        .map_err(|e| classify_clone_failure(url, &failure_message(&e)))?;
    info!(url = %url, workspace = %workspace.display(), "cloned repository");
    Ok(true)
}

/// Default branch of the clone, from `origin/HEAD`.
#[must_use]
pub fn default_branch(workspace: &Path) -> String {
    cmd::remote_head_branch(workspace, "origin")
        .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string())
}

/// Fetch `origin` and fast-forward the local default branch.
///
/// When the default branch is checked out it is pulled; otherwise the local
/// branch ref is fast-forwarded in place so feature-branch work is not disturbed.
/// Returns the default branch name.
///
/// # Errors
///
/// - `SyncError::SyncConflict` if the default branch cannot be fast-forwarded.
/// - `SyncError::RemoteUnavailable` if `origin` cannot be reached.
pub fn sync_default_branch(url: &str, workspace: &Path) -> AmandusResult<String> {
    let branch = default_branch(workspace);

    cmd::fetch(workspace, "origin").map_err(|e| SyncError::RemoteUnavailable {
        url: url.to_string(),
        message: failure_message(&e),
    })?;

    let current = query::current_branch(workspace)?;
    if current.as_deref() == Some(branch.as_str()) {
        cmd::pull_ff_only(workspace, "origin", &branch)
            .map_err(|e| classify_pull_failure(url, &branch, &failure_message(&e)))?;
    } else if query::local_branches(workspace)?.contains(&branch) {
        let refspec = format!("{branch}:{branch}");
        cmd::fetch_refspec(workspace, "origin", &refspec)
            .map_err(|e| classify_pull_failure(url, &branch, &failure_message(&e)))?;
    }

    info!(url = %url, branch = %branch, "default branch up to date");
    Ok(branch)
}
