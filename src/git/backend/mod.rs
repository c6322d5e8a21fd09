// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)  --> GixBackend (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//! ```

use crate::error::{AmandusResult, GitError, GixError};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use super::redact_args;

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path is the root of a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or HEAD cannot be read.
    fn current_branch(path: &Path) -> AmandusResult<Option<String>>;

    /// Local branch names, sorted. Remote-tracking branches are excluded.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or references cannot be read.
    fn local_branches(path: &Path) -> AmandusResult<Vec<String>>;
}

// --- Mutation Trait (Write operations) ---

/// Author identity recorded on commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// Git operations that modify repository state or talk to remotes.
pub trait GitMutation {
    /// Clone a repository into `dest`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the clone fails or the destination path is invalid.
    fn clone(url: &str, dest: &Path) -> AmandusResult<()>;

    /// Fetch from remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch fails.
    fn fetch(repo_path: &Path, remote: &str) -> AmandusResult<()>;

    /// Fetch a single refspec, e.g. `master:master`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch fails or is not a fast-forward.
    fn fetch_refspec(repo_path: &Path, remote: &str, refspec: &str) -> AmandusResult<()>;

    /// Pull `branch` from `remote`, refusing anything but a fast-forward.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the pull fails.
    fn pull_ff_only(repo_path: &Path, remote: &str, branch: &str) -> AmandusResult<()>;

    /// Check out an existing local branch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the checkout fails.
    fn checkout(repo_path: &Path, branch: &str) -> AmandusResult<()>;

    /// Create `branch` from HEAD and check it out.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the branch cannot be created.
    fn create_branch(repo_path: &Path, branch: &str) -> AmandusResult<()>;

    /// Stage exactly one path.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git add` fails.
    fn add_path(repo_path: &Path, file: &str) -> AmandusResult<()>;

    /// Remove one path from the index, keeping the working copy.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git reset` fails.
    fn unstage_path(repo_path: &Path, file: &str) -> AmandusResult<()>;

    /// Commit exactly one path under `author`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the commit fails.
    fn commit_path(
        repo_path: &Path,
        file: &str,
        message: &str,
        author: &CommitAuthor,
    ) -> AmandusResult<()>;

    /// Add a remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be added.
    fn add_remote(repo_path: &Path, name: &str, url: &str) -> AmandusResult<()>;

    /// Remove a remote and its configuration.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be removed.
    fn remove_remote(repo_path: &Path, name: &str) -> AmandusResult<()>;

    /// Push `branch` to the same-named branch on `remote`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` carrying git's stderr if the push is refused.
    fn push(repo_path: &Path, remote: &str, branch: &str) -> AmandusResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Opens the work tree at exactly the given path through its `.git` directory.
/// Parent directories are not searched, so a directory nested inside a workspace
/// is not a repository. Going through `.git` also keeps a work tree whose own
/// name ends in `.git` from being read as a bare repository.
pub struct GixBackend;

impl GixBackend {
    fn open(path: &Path) -> AmandusResult<gix::Repository> {
        let repo = gix::open(path.join(".git"))
            .map_err(|e| GitError::Gix(GixError::Open(Box::new(e))))?;
        if repo.workdir().is_none() {
            return Err(gix_failure("open", format!("{} has no work tree", path.display())).into());
        }
        Ok(repo)
    }
}

fn gix_failure(operation: &str, err: impl std::fmt::Display) -> GitError {
    GitError::CommandFailed {
        command: format!("gix {operation}"),
        message: err.to_string(),
    }
}

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        Self::open(path).is_ok()
    }

    fn current_branch(path: &Path) -> AmandusResult<Option<String>> {
        let repo = Self::open(path)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn local_branches(path: &Path) -> AmandusResult<Vec<String>> {
        let repo = Self::open(path)?;
        let platform = repo
            .references()
            .map_err(|e| gix_failure("references", e))?;
        let iter = platform
            .local_branches()
            .map_err(|e| gix_failure("local branches", e))?;

        let mut names = Vec::new();
        for reference in iter {
            let reference = reference.map_err(|e| gix_failure("local branches", e))?;
            names.push(reference.name().shorten().to_string());
        }
        names.sort();
        Ok(names)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
///
/// Used for every write and every network operation.
pub struct ShellBackend;

/// Locate the `git` executable once per process.
fn git_executable() -> Result<&'static Path, GitError> {
    static GIT: OnceLock<Option<PathBuf>> = OnceLock::new();
    GIT.get_or_init(|| which::which("git").ok())
        .as_deref()
        .ok_or(GitError::GitNotFound)
}

impl ShellBackend {
    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    ///
    /// Returns trimmed stdout. Credentials embedded in URL arguments are masked in
    /// logs and in the returned error.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> AmandusResult<String> {
        use std::process::Command;

        let git = git_executable()?;
        let shown = redact_args(args);
        debug!(cwd = %cwd.display(), "git {shown}");

        let output = Command::new(git)
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")))?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {shown}"),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Paths staged for commit, restricted to `file`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git diff` fails.
    pub fn staged_paths(repo_path: &Path, file: &str) -> AmandusResult<Vec<String>> {
        let output = Self::git_command(&["diff", "--cached", "--name-only", "--", file], repo_path)?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// Number of commits on `branch` not reachable from any `remote` tracking ref.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `branch` does not exist.
    pub fn unpushed_count(repo_path: &Path, branch: &str, remote: &str) -> AmandusResult<usize> {
        let local = format!("refs/heads/{branch}");
        let remotes = format!("--remotes={remote}");
        let output = Self::git_command(&["rev-list", "--count", &local, "--not", &remotes], repo_path)?;
        output.parse().map_err(|_| {
            GitError::CommandFailed {
                command: "git rev-list --count".to_string(),
                message: format!("unexpected output '{output}'"),
            }
            .into()
        })
    }

    /// Point `remote/branch` at the local `branch` after it was pushed by another remote name.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the ref cannot be updated.
    pub fn record_pushed(repo_path: &Path, remote: &str, branch: &str) -> AmandusResult<()> {
        let tracking = format!("refs/remotes/{remote}/{branch}");
        let local = format!("refs/heads/{branch}");
        Self::git_command(&["update-ref", &tracking, &local], repo_path)?;
        Ok(())
    }

    /// Configured URL of `remote`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote does not exist.
    pub fn remote_url(repo_path: &Path, remote: &str) -> AmandusResult<String> {
        Self::git_command(&["remote", "get-url", remote], repo_path)
    }

    /// Names of all configured remotes.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git remote` fails.
    pub fn remotes(repo_path: &Path) -> AmandusResult<Vec<String>> {
        let output = Self::git_command(&["remote"], repo_path)?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// Branch that `remote/HEAD` points at, without the remote prefix.
    ///
    /// Returns `None` when the remote HEAD is not recorded locally.
    #[must_use]
    pub fn remote_head_branch(repo_path: &Path, remote: &str) -> Option<String> {
        let reference = format!("refs/remotes/{remote}/HEAD");
        let prefix = format!("{remote}/");
        Self::git_command(&["symbolic-ref", "--short", &reference], repo_path)
            .ok()
            .and_then(|name| name.strip_prefix(&prefix).map(str::to_string))
            .filter(|name| !name.is_empty())
    }
}

impl GitMutation for ShellBackend {
    fn clone(url: &str, dest: &Path) -> AmandusResult<()> {
        let dest_str = dest.to_str().ok_or_else(|| GitError::CommandFailed {
            command: "git clone".to_string(),
            message: "invalid destination path".to_string(),
        })?;
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        Self::git_command(
            &[
                "-c",
                "advice.detachedHead=false",
                "clone",
                "--quiet",
                url,
                dest_str,
            ],
            parent,
        )?;
        Ok(())
    }

    fn fetch(repo_path: &Path, remote: &str) -> AmandusResult<()> {
        Self::git_command(&["fetch", "--quiet", remote], repo_path)?;
        Ok(())
    }

    fn fetch_refspec(repo_path: &Path, remote: &str, refspec: &str) -> AmandusResult<()> {
        Self::git_command(&["fetch", "--quiet", remote, refspec], repo_path)?;
        Ok(())
    }

    fn pull_ff_only(repo_path: &Path, remote: &str, branch: &str) -> AmandusResult<()> {
        Self::git_command(&["pull", "--ff-only", "--quiet", remote, branch], repo_path)?;
        Ok(())
    }

    fn checkout(repo_path: &Path, branch: &str) -> AmandusResult<()> {
        Self::git_command(&["checkout", "-q", branch, "--"], repo_path)?;
        Ok(())
    }

    fn create_branch(repo_path: &Path, branch: &str) -> AmandusResult<()> {
        Self::git_command(&["checkout", "-q", "-b", branch], repo_path)?;
        Ok(())
    }

    fn add_path(repo_path: &Path, file: &str) -> AmandusResult<()> {
        Self::git_command(&["add", "--", file], repo_path)?;
        Ok(())
    }

    fn unstage_path(repo_path: &Path, file: &str) -> AmandusResult<()> {
        Self::git_command(&["reset", "-q", "--", file], repo_path)?;
        Ok(())
    }

    fn commit_path(
        repo_path: &Path,
        file: &str,
        message: &str,
        author: &CommitAuthor,
    ) -> AmandusResult<()> {
        let name = format!("user.name={}", author.name);
        let email = format!("user.email={}", author.email);
        Self::git_command(
            &[
                "-c", &name, "-c", &email, "commit", "--quiet", "-m", message, "--", file,
            ],
            repo_path,
        )?;
        Ok(())
    }

    fn add_remote(repo_path: &Path, name: &str, url: &str) -> AmandusResult<()> {
        Self::git_command(&["remote", "add", name, url], repo_path)?;
        Ok(())
    }

    fn remove_remote(repo_path: &Path, name: &str) -> AmandusResult<()> {
        Self::git_command(&["remote", "remove", name], repo_path)?;
        Ok(())
    }

    fn push(repo_path: &Path, remote: &str, branch: &str) -> AmandusResult<()> {
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        Self::git_command(&["push", "--quiet", remote, &refspec], repo_path)?;
        Ok(())
    }
}
