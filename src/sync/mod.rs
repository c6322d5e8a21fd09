// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace synchronization engine.
//!
//! ```text
//!                      SyncEngine
//!       clone_or_sync  get_state  save  switch_branch
//!            |             |        |         |
//!            v             v        v         v
//!        mirror.rs    branch.rs  commit.rs  branch.rs
//!                                   |
//!                                   v
//!                               push.rs (EphemeralRemote)
//!
//! Every operation on a workspace runs under that workspace's lock.
//! ```

pub mod branch;
pub mod commit;
pub mod mirror;
pub mod push;


use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::auth::{Provider, SessionCredential};
use crate::error::{AmandusResult, AuthError, SyncError};
use crate::git::cmd::{self, CommitAuthor};
use crate::workspace::{WorkspaceFile, WorkspaceLocator, WorkspaceLocks, list_files};

pub use branch::BranchRef;
pub use commit::{CommitOutcome, CommitReport};
pub use push::PushCredentials;

/// Result of `clone_or_sync` / `pull_repository`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub workspace: PathBuf,
    /// Whether this call created the clone.
    pub cloned: bool,
    pub default_branch: String,
}

/// Snapshot of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryState {
    pub current_branch: Option<String>,
    pub branches: Vec<BranchRef>,
    pub files: Vec<WorkspaceFile>,
}

/// Result of `save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub file: String,
    pub branch: String,
    pub message: String,
    pub outcome: CommitOutcome,
    pub pushed: bool,
}

/// Clone, inspect, edit and push repositories under one workspace root.
#[derive(Debug)]
pub struct SyncEngine {
    locator: WorkspaceLocator,
    locks: WorkspaceLocks,
}

fn repository_prefix(locator: &WorkspaceLocator, workspace: &Path) -> String {
    workspace
        .strip_prefix(locator.root())
        .unwrap_or(workspace)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Author identity for commits by `credential`'s user.
#[must_use]
pub fn commit_author(credential: &SessionCredential) -> CommitAuthor {
    let user = &credential.user;
    let email = user
        .email
        .clone()
        .filter(|email| !email.is_empty())
        .unwrap_or_else(|| format!("{}@users.noreply.amandus", user.username));
    CommitAuthor {
        name: user.username.clone(),
        email,
    }
}

/// Credentials for pushing to `origin_url`, chosen by its host.
///
/// Remotes without a network host need none. A known host uses that provider's
/// token; an unknown host falls back to the first connected provider.
///
/// # Errors
///
/// Returns `AuthError::ProviderNotConnected` if a network remote needs a token
/// and the session holds none that fits.
pub fn push_credentials(
    origin_url: &str,
    credential: &SessionCredential,
) -> Result<Option<PushCredentials>, AuthError> {
    let Some(host) = push::remote_host(origin_url) else {
        return Ok(None);
    };

    let (provider, token) = match Provider::from_host(&host) {
        Some(provider) => credential
            .token_for(provider)
            .map(|token| (provider, token))
            .ok_or_else(|| AuthError::ProviderNotConnected(provider.as_str().to_string()))?,
        None => credential
            .first_token()
            .ok_or_else(|| AuthError::ProviderNotConnected(host.clone()))?,
    };

    Ok(Some(PushCredentials {
        username: provider.push_username(&credential.user.username),
        token: token.to_string(),
    }))
}

impl SyncEngine {
    #[must_use]
    pub fn new(locator: WorkspaceLocator) -> Self {
        Self {
            locator,
            locks: WorkspaceLocks::new(),
        }
    }

    #[must_use]
    pub const fn locator(&self) -> &WorkspaceLocator {
        &self.locator
    }

    fn existing_workspace(&self, url: &str) -> AmandusResult<PathBuf> {
        let workspace = self.locator.locate(url)?;
        if !workspace.is_dir() {
            return Err(SyncError::RepositoryNotCloned(url.to_string()).into());
        }
        Ok(workspace)
    }

    /// Clone `url` if its workspace is missing, otherwise fast-forward its default branch.
    ///
    /// # Errors
    ///
    /// `InvalidRepository`, `RemoteUnavailable`, `SyncConflict` or `WorkspaceWriteError`.
    #[instrument(skip(self))]
    pub fn clone_or_sync(&self, url: &str) -> AmandusResult<SyncReport> {
        let workspace = self.locator.locate(url)?;
        self.locks.with_lock(&workspace, || {
            let cloned = mirror::ensure_cloned(url, &workspace)?;
            let default_branch = if cloned {
                mirror::default_branch(&workspace)
            } else {
                mirror::sync_default_branch(url, &workspace)?
            };
            Ok(SyncReport {
                workspace: workspace.clone(),
                cloned,
                default_branch,
            })
        })
    }

    /// Fast-forward the default branch of an existing workspace.
    ///
    /// # Errors
    ///
    /// `RepositoryNotCloned` if there is no workspace yet, otherwise as
    /// [`mirror::sync_default_branch`].
    #[instrument(skip(self))]
    pub fn pull_repository(&self, url: &str) -> AmandusResult<SyncReport> {
        let workspace = self.existing_workspace(url)?;
        self.locks.with_lock(&workspace, || {
            let default_branch = mirror::sync_default_branch(url, &workspace)?;
            Ok(SyncReport {
                workspace: workspace.clone(),
                cloned: false,
                default_branch,
            })
        })
    }

    /// Current branch, local branches and text files of `url`'s workspace.
    ///
    /// # Errors
    ///
    /// `InvalidRepository` for a malformed URL, `RepositoryNotCloned` if there is
    /// no workspace yet.
    pub fn get_state(&self, url: &str) -> AmandusResult<RepositoryState> {
        let workspace = self.existing_workspace(url)?;
        let repository = repository_prefix(&self.locator, &workspace);
        self.locks.with_lock(&workspace, || {
            Ok(RepositoryState {
                current_branch: branch::current_branch(&workspace)?,
                branches: branch::list_branches(&workspace)?,
                files: list_files(&workspace, &repository)?,
            })
        })
    }

    /// Check out `branch` in `url`'s workspace, creating it from HEAD if needed.
    ///
    /// Returns the sanitized branch name.
    ///
    /// # Errors
    ///
    /// `InvalidBranchName` before anything is touched, `RepositoryNotCloned`, or a
    /// `GitError` if git refuses the checkout.
    #[instrument(skip(self))]
    pub fn switch_branch(&self, url: &str, branch: &str) -> AmandusResult<String> {
        let name = branch::sanitize_branch_name(branch)?;
        let workspace = self.existing_workspace(url)?;
        self.locks
            .with_lock(&workspace, || branch::checkout_or_create(&workspace, &name))
    }

    /// Write, commit and push one file on `branch` as the session's user.
    ///
    /// With unchanged content nothing is committed, but commits on `branch` that
    /// an earlier save failed to push are pushed now.
    ///
    /// # Errors
    ///
    /// - Validation (nothing touched): `InvalidFile`, `InvalidBranchName`,
    ///   `RepositoryNotCloned`, `ProviderNotConnected`.
    /// - `WorkspaceWriteError` if the file cannot be written.
    /// - `MergeConflict` if the remote branch has diverged, `PushFailed` otherwise.
    #[instrument(skip(self, file, credential), fields(file = %file.name))]
    pub fn save(
        &self,
        file: &WorkspaceFile,
        branch: &str,
        message: Option<&str>,
        credential: &SessionCredential,
    ) -> AmandusResult<SaveReport> {
        let resolved = self.locator.resolve_file(&file.name)?;
        let branch_name = branch::sanitize_branch_name(branch)?;
        let author = commit_author(credential);

        self.locks.with_lock(&resolved.workspace, || {
            let origin = cmd::remote_url(&resolved.workspace, "origin")?;
            let credentials = push_credentials(&origin, credential)?;

            let report = commit::save_and_commit(
                &resolved.workspace,
                &resolved.real_name,
                &file.content,
                &branch_name,
                message,
                &author,
            )?;

            let pushed = match report.outcome {
                CommitOutcome::Committed => true,
                CommitOutcome::Unchanged => {
                    let pending = cmd::unpushed_count(&resolved.workspace, &report.branch, "origin")?;
                    if pending > 0 {
                        info!(branch = %report.branch, pending, "content unchanged, pushing earlier commits");
                    }
                    pending > 0
                }
            };
            if pushed {
                push::push(&resolved.workspace, &report.branch, credentials.as_ref())?;
            }

            info!(branch = %report.branch, pushed, "save finished");
            Ok(SaveReport {
                file: file.name.clone(),
                branch: report.branch,
                message: report.message,
                outcome: report.outcome,
                pushed,
            })
        })
    }
}
