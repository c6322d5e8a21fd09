// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command operations using shell backend.
//!
//! ```text
//! cmd.rs --> ShellBackend --> git (network, index, refs)
//! ```

use crate::error::AmandusResult;
use std::path::Path;

pub use super::backend::CommitAuthor;
use super::backend::{GitMutation, ShellBackend};

/// Clone a repository.
///
/// # Errors
///
/// Returns a `GitError` if the clone fails or the destination path is invalid.
pub fn clone(url: &str, dest: &Path) -> AmandusResult<()> {
    ShellBackend::clone(url, dest)
}

/// Fetch from remote.
///
/// # Errors
///
/// Returns a `GitError` if the fetch fails.
pub fn fetch(repo_path: &Path, remote: &str) -> AmandusResult<()> {
    ShellBackend::fetch(repo_path, remote)
}

/// Fetch one refspec from remote.
///
/// # Errors
///
/// Returns a `GitError` if the fetch fails.
pub fn fetch_refspec(repo_path: &Path, remote: &str, refspec: &str) -> AmandusResult<()> {
    ShellBackend::fetch_refspec(repo_path, remote, refspec)
}

/// Fast-forward-only pull.
///
/// # Errors
///
/// Returns a `GitError` if the pull fails.
pub fn pull_ff_only(repo_path: &Path, remote: &str, branch: &str) -> AmandusResult<()> {
    ShellBackend::pull_ff_only(repo_path, remote, branch)
}

/// Check out an existing branch.
///
/// # Errors
///
/// Returns a `GitError` if the checkout fails.
pub fn checkout(repo_path: &Path, branch: &str) -> AmandusResult<()> {
    ShellBackend::checkout(repo_path, branch)
}

/// Create a branch from HEAD and check it out.
///
/// # Errors
///
/// Returns a `GitError` if the branch cannot be created.
pub fn create_branch(repo_path: &Path, branch: &str) -> AmandusResult<()> {
    ShellBackend::create_branch(repo_path, branch)
}

/// Stage one path.
///
/// # Errors
///
/// Returns a `GitError` if `git add` fails.
pub fn add_path(repo_path: &Path, file: &str) -> AmandusResult<()> {
    ShellBackend::add_path(repo_path, file)
}

/// Unstage one path.
///
/// # Errors
///
/// Returns a `GitError` if `git reset` fails.
pub fn unstage_path(repo_path: &Path, file: &str) -> AmandusResult<()> {
    ShellBackend::unstage_path(repo_path, file)
}

/// Commit one path.
///
/// # Errors
///
/// Returns a `GitError` if the commit fails.
pub fn commit_path(
    repo_path: &Path,
    file: &str,
    message: &str,
    author: &CommitAuthor,
) -> AmandusResult<()> {
    ShellBackend::commit_path(repo_path, file, message, author)
}

/// Paths staged for commit among `file`.
///
/// # Errors
///
/// Returns a `GitError` if `git diff` fails.
pub fn staged_paths(repo_path: &Path, file: &str) -> AmandusResult<Vec<String>> {
    ShellBackend::staged_paths(repo_path, file)
}

/// Commits on `branch` that `remote` is not known to have.
///
/// # Errors
///
/// Returns a `GitError` if the branch does not exist.
pub fn unpushed_count(repo_path: &Path, branch: &str, remote: &str) -> AmandusResult<usize> {
    ShellBackend::unpushed_count(repo_path, branch, remote)
}

/// Record that `branch` now exists on `remote` at the local tip.
///
/// # Errors
///
/// Returns a `GitError` if the tracking ref cannot be written.
pub fn record_pushed(repo_path: &Path, remote: &str, branch: &str) -> AmandusResult<()> {
    ShellBackend::record_pushed(repo_path, remote, branch)
}

/// Add a remote.
///
/// # Errors
///
/// Returns a `GitError` if the remote cannot be added.
pub fn add_remote(repo_path: &Path, name: &str, url: &str) -> AmandusResult<()> {
    ShellBackend::add_remote(repo_path, name, url)
}

/// Remove a remote.
///
/// # Errors
///
/// Returns a `GitError` if the remote cannot be removed.
pub fn remove_remote(repo_path: &Path, name: &str) -> AmandusResult<()> {
    ShellBackend::remove_remote(repo_path, name)
}

/// Configured remotes.
///
/// # Errors
///
/// Returns a `GitError` if `git remote` fails.
pub fn remotes(repo_path: &Path) -> AmandusResult<Vec<String>> {
    ShellBackend::remotes(repo_path)
}

/// URL of a remote.
///
/// # Errors
///
/// Returns a `GitError` if the remote does not exist.
pub fn remote_url(repo_path: &Path, remote: &str) -> AmandusResult<String> {
    ShellBackend::remote_url(repo_path, remote)
}

/// Branch recorded as `remote/HEAD`.
#[must_use]
pub fn remote_head_branch(repo_path: &Path, remote: &str) -> Option<String> {
    ShellBackend::remote_head_branch(repo_path, remote)
}

/// Push a branch.
///
/// # Errors
///
/// Returns a `GitError` with git's stderr if the push is refused.
pub fn push(repo_path: &Path, remote: &str, branch: &str) -> AmandusResult<()> {
    ShellBackend::push(repo_path, remote, branch)
}
