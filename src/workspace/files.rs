// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use ignore::WalkBuilder;
use std::path::Path;
use tracing::{debug, warn};

use super::WorkspaceFile;
use crate::error::{AmandusResult, SyncError};

/// Builds a walker over a workspace: hidden files included, `.git` skipped,
/// `.gitignore` respected.
fn build_walker(workspace: &Path) -> WalkBuilder {
    let mut builder = WalkBuilder::new(workspace);
    builder.hidden(false);
    builder.git_ignore(true);
    builder.git_global(false);
    builder.git_exclude(true);
    builder.follow_links(false);
    builder.sort_by_file_path(|a, b| a.cmp(b));
    builder.filter_entry(|entry| {
        !(entry.file_type().is_some_and(|ft| ft.is_dir()) && entry.file_name() == ".git")
    });
    builder
}

/// Every UTF-8 text file in `workspace`, named `<repository>/<path>`, sorted by path.
///
/// Binary and unreadable files are skipped.
///
/// # Errors
///
/// Returns `SyncError::RepositoryNotCloned` if the workspace directory is missing.
pub fn list_files(workspace: &Path, repository: &str) -> AmandusResult<Vec<WorkspaceFile>> {
    if !workspace.is_dir() {
        return Err(SyncError::RepositoryNotCloned(repository.to_string()).into());
    }

    let mut files = Vec::new();
    for entry in build_walker(workspace).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "walk error");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(workspace) else {
            continue;
        };
        let Some(relative) = relative.to_str() else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        let relative = relative.replace('\\', "/");

        match std::fs::read(entry.path()).map(String::from_utf8) {
            Ok(Ok(content)) => files.push(WorkspaceFile {
                name: format!("{repository}/{relative}"),
                content,
            }),
            Ok(Err(_)) => debug!(file = %relative, "skipping binary file"),
            Err(e) => warn!(file = %relative, error = %e, "failed to read file"),
        }
    }
    Ok(files)
}
