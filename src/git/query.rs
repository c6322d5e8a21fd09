// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations using gix backend.
//!
//! ```text
//! query.rs --> GixBackend --> .git/ (no subprocess)
//! ```
//!
//! Branch state is read fresh on every call; nothing is cached.

use crate::error::AmandusResult;
use std::path::Path;

use super::backend::{GitQuery, GixBackend};

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    GixBackend::is_git_repo(path)
}

/// Get current branch name (None if HEAD is detached).
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or HEAD cannot be read.
pub fn current_branch(path: &Path) -> AmandusResult<Option<String>> {
    GixBackend::current_branch(path)
}

/// Sorted local branch names.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or references cannot be read.
pub fn local_branches(path: &Path) -> AmandusResult<Vec<String>> {
    GixBackend::local_branches(path)
}
