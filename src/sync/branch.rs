// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch controller: listing, current branch, checkout-or-create.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::error::{AmandusResult, SyncError};
use crate::git::{cmd, query};

/// A local branch and whether it is checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRef {
    pub name: String,
    pub is_current: bool,
}

/// Normalize a requested branch name into one git accepts.
///
/// 1. Drop characters outside `[A-Za-z0-9._/-]`.
/// 2. Collapse runs of the same punctuation character (`//`, `..`, `--`).
/// 3. Per `/` component, trim leading `.`/`-` and trailing `.`; drop empty components.
///
/// Applying it to its own output returns the output unchanged.
///
/// # Errors
///
/// Returns `SyncError::InvalidBranchName` if nothing usable remains, or the name
/// is `HEAD` or has a component ending in `.lock`.
pub fn sanitize_branch_name(raw: &str) -> Result<String, SyncError> {
    let mut collapsed = String::with_capacity(raw.len());
    let mut previous = None;
    for c in raw.chars().filter(|&c| is_branch_char(c)) {
        if !c.is_ascii_alphanumeric() && previous == Some(c) {
            continue;
        }
        collapsed.push(c);
        previous = Some(c);
    }

    let name = collapsed
        .split('/')
        .map(|component| {
            component
                .trim_start_matches(['.', '-'])
                .trim_end_matches('.')
        })
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if name.is_empty()
        || name == "HEAD"
        || name.split('/').any(|component| component.ends_with(".lock"))
    {
        return Err(SyncError::InvalidBranchName(raw.to_string()));
    }
    Ok(name)
}

const fn is_branch_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-')
}

/// Currently checked-out branch, `None` when HEAD is detached.
///
/// # Errors
///
/// Returns a `GitError` if the workspace cannot be read.
pub fn current_branch(workspace: &Path) -> AmandusResult<Option<String>> {
    query::current_branch(workspace)
}

/// Local branches, remote-tracking ones excluded, read fresh from disk.
///
/// # Errors
///
/// Returns a `GitError` if the workspace cannot be read.
pub fn list_branches(workspace: &Path) -> AmandusResult<Vec<BranchRef>> {
    let current = query::current_branch(workspace)?;
    Ok(query::local_branches(workspace)?
        .into_iter()
        .map(|name| BranchRef {
            is_current: current.as_deref() == Some(name.as_str()),
            name,
        })
        .collect())
}

/// Check out `requested` (sanitized), creating it from HEAD if it does not exist.
///
/// Returns the sanitized name. Calling it again with the same name is a no-op
/// apart from re-checking the branch out.
///
/// # Errors
///
/// - `SyncError::InvalidBranchName` before anything is touched.
/// - `GitError` if git refuses the checkout.
pub fn checkout_or_create(workspace: &Path, requested: &str) -> AmandusResult<String> {
    let name = sanitize_branch_name(requested)?;

    if query::current_branch(workspace)?.as_deref() == Some(name.as_str()) {
        return Ok(name);
    }

    if query::local_branches(workspace)?.contains(&name) {
        cmd::checkout(workspace, &name)?;
        info!(branch = %name, "checked out branch");
    } else {
        cmd::create_branch(workspace, &name)?;
        info!(branch = %name, "created branch from HEAD");
    }
    Ok(name)
}
