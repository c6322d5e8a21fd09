// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-workspace advisory locks.
//!
//! One mutex per workspace path, created on first use and kept for the life of
//! the registry. Operations on different workspaces never contend.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

#[derive(Debug, Default)]
pub struct WorkspaceLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl WorkspaceLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, workspace: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(workspace.to_path_buf()).or_default())
    }

    /// Run `f` while holding the lock for `workspace`.
    ///
    /// A panic in an earlier holder does not poison later callers: the guarded
    /// state lives on disk, not in the mutex.
    pub fn with_lock<T>(&self, workspace: &Path, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(workspace);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        trace!(workspace = %workspace.display(), "workspace lock held");
        f()
    }

    /// Number of workspaces that have been locked at least once.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
