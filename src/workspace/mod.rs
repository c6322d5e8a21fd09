// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace location and file-name resolution.
//!
//! ```text
//! https://github.com/alice/notes  --locate-->  <root>/alice/notes
//!
//! "alice/notes/docs/a.md"  --resolve_file-->  workspace  <root>/alice/notes
//!                                             repository "alice/notes"
//!                                             real name  "docs/a.md"
//! ```
//!
//! The root is injected at construction; nothing here reads global state.

pub mod files;
pub mod locks;


use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AmandusResult, SyncError};
use crate::git::query;

pub use files::list_files;
pub use locks::WorkspaceLocks;

/// A file as exchanged with clients: name with leading repository segments, full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceFile {
    pub name: String,
    pub content: String,
}

/// A file name split into its workspace and repository-relative parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Workspace directory holding the repository.
    pub workspace: PathBuf,
    /// Leading segments of the file name that name the repository.
    pub repository: String,
    /// Path inside the repository.
    pub real_name: String,
}

/// Maps repository URLs to workspace directories under a fixed root.
#[derive(Debug, Clone)]
pub struct WorkspaceLocator {
    root: PathBuf,
}

impl WorkspaceLocator {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Workspace path for `url`: the URL's path segments joined under the root.
    ///
    /// Pure: the same URL always yields the same path.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::InvalidRepository` if the URL does not parse or has no
    /// usable path.
    pub fn locate(&self, url: &str) -> AmandusResult<PathBuf> {
        let invalid = |message: &str| SyncError::InvalidRepository {
            url: url.to_string(),
            message: message.to_string(),
        };

        let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
        let segments: Vec<&str> = parsed
            .path_segments()
            .ok_or_else(|| invalid("url has no path"))?
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(invalid("url has no repository path").into());
        }
        if segments.iter().any(|segment| !is_plain_segment(segment)) {
            return Err(invalid("url path contains an unusable segment").into());
        }

        Ok(segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment)))
    }

    /// Split a client file name into workspace and repository-relative name.
    ///
    /// The repository prefix is the shortest run of leading segments that names a
    /// cloned workspace.
    ///
    /// # Errors
    ///
    /// - `SyncError::InvalidFile` if the name is empty, absolute, or contains `.`,
    ///   `..` or empty segments.
    /// - `SyncError::RepositoryNotCloned` if no leading segments name a workspace.
    pub fn resolve_file(&self, name: &str) -> AmandusResult<ResolvedFile> {
        let segments = split_file_name(name)?;

        for split in 1..segments.len() {
            let workspace = segments[..split]
                .iter()
                .fold(self.root.clone(), |path, segment| path.join(segment));
            if query::is_git_repo(&workspace) {
                return Ok(ResolvedFile {
                    workspace,
                    repository: segments[..split].join("/"),
                    real_name: segments[split..].join("/"),
                });
            }
        }

        Err(SyncError::RepositoryNotCloned(name.to_string()).into())
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
}

/// Validate a client file name and split it on `/`.
///
/// # Errors
///
/// Returns `SyncError::InvalidFile` for names that could escape the workspace root.
pub fn split_file_name(name: &str) -> Result<Vec<&str>, SyncError> {
    let invalid = || SyncError::InvalidFile(name.to_string());

    if name.trim().is_empty() || name.starts_with('/') {
        return Err(invalid());
    }
    let segments: Vec<&str> = name.split('/').collect();
    if segments.len() < 2 || segments.iter().any(|s| !is_plain_segment(s)) {
        return Err(invalid());
    }
    Ok(segments)
}
