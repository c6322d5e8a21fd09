// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for workspace synchronization.
//!
//! Every test drives real repositories: a bare `origin.git` reached through a
//! `file://` URL, cloned into a temporary workspace root.

use amandus::auth::{LocalUser, SessionCredential};
use amandus::error::SyncError;
use amandus::git::cmd;
use amandus::sync::{CommitOutcome, SyncEngine};
use amandus::workspace::{WorkspaceFile, WorkspaceLocator};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use url::Url;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Run git in `cwd` and return trimmed stdout, panicking on failure.
fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@test.com"])
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

/// A bare origin with one commit on `master`, plus a scratch clone for
/// simulating other users.
struct Remote {
    _dir: TempDir,
    bare: PathBuf,
    other: PathBuf,
    url: String,
}

impl Remote {
    fn new() -> Self {
        let dir = temp_dir();
        let bare = dir.path().join("origin.git");
        fs::create_dir_all(&bare).unwrap();
        git(&["init", "--quiet", "--bare", "-b", "master"], &bare);

        let seed = dir.path().join("seed");
        fs::create_dir_all(&seed).unwrap();
        git(&["init", "--quiet", "-b", "master"], &seed);
        fs::write(seed.join("README.md"), "# readme\n").unwrap();
        git(&["add", "README.md"], &seed);
        git(&["commit", "--quiet", "-m", "Initial commit"], &seed);
        git(&["remote", "add", "origin", path_str(&bare)], &seed);
        git(&["push", "--quiet", "origin", "master"], &seed);

        let other = dir.path().join("other");
        git(
            &["clone", "--quiet", path_str(&bare), path_str(&other)],
            dir.path(),
        );

        let url = Url::from_file_path(&bare).unwrap().to_string();
        Self {
            _dir: dir,
            bare,
            other,
            url,
        }
    }

    /// Repository prefix of workspace file names for this remote.
    fn repository(&self) -> String {
        Url::parse(&self.url)
            .unwrap()
            .path_segments()
            .unwrap()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Commit `content` to `file` on `branch` from the scratch clone and push it.
    fn push_from_other(&self, branch: &str, file: &str, content: &str) {
        git(&["fetch", "--quiet", "origin"], &self.other);
        let exists = !git(&["ls-remote", "--heads", "origin", branch], &self.other).is_empty();
        if exists {
            git(&["checkout", "--quiet", "-B", branch, &format!("origin/{branch}")], &self.other);
        } else {
            git(&["checkout", "--quiet", "-B", branch], &self.other);
        }
        fs::write(self.other.join(file), content).unwrap();
        git(&["add", file], &self.other);
        git(&["commit", "--quiet", "-m", "other change"], &self.other);
        git(&["push", "--quiet", "origin", branch], &self.other);
    }

    fn origin_git(&self, args: &[&str]) -> String {
        git(args, &self.bare)
    }

    /// Make the origin refuse every push until `accept_pushes` is called.
    #[cfg(unix)]
    fn refuse_pushes(&self) {
        use std::os::unix::fs::PermissionsExt;

        let hook = self.bare.join("hooks/pre-receive");
        fs::create_dir_all(hook.parent().unwrap()).unwrap();
        fs::write(&hook, "#!/bin/sh\necho 'pushes are closed' >&2\nexit 1\n").unwrap();
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    fn accept_pushes(&self) {
        fs::remove_file(self.bare.join("hooks/pre-receive")).unwrap();
    }
}

fn alice() -> SessionCredential {
    SessionCredential::new(LocalUser {
        id: "1".to_string(),
        username: "alice".to_string(),
        email: None,
    })
}

fn file(remote: &Remote, name: &str, content: &str) -> WorkspaceFile {
    WorkspaceFile {
        name: format!("{}/{name}", remote.repository()),
        content: content.to_string(),
    }
}

// =============================================================================
// Clone / Sync
// =============================================================================

#[test]
fn clone_then_sync() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));

    let first = engine.clone_or_sync(&remote.url).unwrap();
    assert!(first.cloned);
    assert_eq!(first.default_branch, "master");
    assert!(first.workspace.join("README.md").is_file());

    remote.push_from_other("master", "NEWS.md", "news\n");

    let second = engine.clone_or_sync(&remote.url).unwrap();
    assert!(!second.cloned);
    assert_eq!(second.workspace, first.workspace);
    assert_eq!(
        fs::read_to_string(second.workspace.join("NEWS.md")).unwrap(),
        "news\n"
    );
}

#[test]
fn workspace_for_dot_git_url_stays_usable() {
    let remote = Remote::new();
    assert!(remote.url.ends_with("/origin.git"));
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));

    let first = engine.clone_or_sync(&remote.url).unwrap();
    assert_eq!(first.workspace.file_name().unwrap(), "origin.git");

    let second = engine.clone_or_sync(&remote.url).unwrap();
    assert!(!second.cloned);

    let state = engine.get_state(&remote.url).unwrap();
    assert_eq!(state.current_branch.as_deref(), Some("master"));
    assert_eq!(
        engine.switch_branch(&remote.url, "notes").unwrap(),
        "notes"
    );

    let report = engine
        .save(&file(&remote, "a.txt", "hello"), "notes", None, &alice())
        .unwrap();
    assert!(report.pushed);
    assert_eq!(remote.origin_git(&["show", "notes:a.txt"]), "hello");
}

#[test]
fn pull_requires_clone() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));

    let err = engine.pull_repository(&remote.url).unwrap_err();
    assert!(matches!(
        err.as_sync(),
        Some(SyncError::RepositoryNotCloned(_))
    ));

    engine.clone_or_sync(&remote.url).unwrap();
    remote.push_from_other("master", "NEWS.md", "news\n");
    let report = engine.pull_repository(&remote.url).unwrap();
    assert!(report.workspace.join("NEWS.md").is_file());
}

#[test]
fn sync_conflict_on_diverged_default_branch() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    let workspace = engine.clone_or_sync(&remote.url).unwrap().workspace;

    fs::write(workspace.join("local.txt"), "local\n").unwrap();
    git(&["add", "local.txt"], &workspace);
    git(&["commit", "--quiet", "-m", "local change"], &workspace);
    remote.push_from_other("master", "remote.txt", "remote\n");

    let err = engine.clone_or_sync(&remote.url).unwrap_err();
    let sync = err.as_sync().expect("sync error");
    assert!(matches!(sync, SyncError::SyncConflict { branch, .. } if branch == "master"));
    assert!(sync.is_user_recoverable());
}

#[test]
fn clone_of_missing_repository_is_invalid() {
    let dir = temp_dir();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    let url = Url::from_file_path(dir.path().join("nothing-here.git"))
        .unwrap()
        .to_string();

    let err = engine.clone_or_sync(&url).unwrap_err();
    assert!(matches!(
        err.as_sync(),
        Some(SyncError::InvalidRepository { .. })
    ));
}

#[test]
fn malformed_url_is_invalid() {
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    let err = engine.clone_or_sync("not a url").unwrap_err();
    assert!(matches!(
        err.as_sync(),
        Some(SyncError::InvalidRepository { .. })
    ));
    assert!(fs::read_dir(root.path()).unwrap().next().is_none());
}

// =============================================================================
// State / Branches
// =============================================================================

#[test]
fn state_after_clone() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    engine.clone_or_sync(&remote.url).unwrap();

    let state = engine.get_state(&remote.url).unwrap();
    assert_eq!(state.current_branch.as_deref(), Some("master"));
    assert_eq!(state.branches.len(), 1);
    assert!(state.branches[0].is_current);
    assert_eq!(state.files.len(), 1);
    assert_eq!(
        state.files[0].name,
        format!("{}/README.md", remote.repository())
    );
    assert_eq!(state.files[0].content, "# readme\n");
}

#[test]
fn switch_branch_creates_then_reuses() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    engine.clone_or_sync(&remote.url).unwrap();

    assert_eq!(
        engine.switch_branch(&remote.url, "feature x!").unwrap(),
        "featurex"
    );
    assert_eq!(
        engine.switch_branch(&remote.url, "master").unwrap(),
        "master"
    );
    assert_eq!(
        engine.switch_branch(&remote.url, "featurex").unwrap(),
        "featurex"
    );

    let state = engine.get_state(&remote.url).unwrap();
    let names: Vec<_> = state.branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["featurex", "master"]);
    assert_eq!(state.current_branch.as_deref(), Some("featurex"));
}

// =============================================================================
// Save
// =============================================================================

#[test]
fn save_commits_and_pushes_one_file() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    let workspace = engine.clone_or_sync(&remote.url).unwrap().workspace;

    let report = engine
        .save(&file(&remote, "a.txt", "hello"), "feature-x", None, &alice())
        .unwrap();
    assert_eq!(report.branch, "feature-x");
    assert_eq!(report.outcome, CommitOutcome::Committed);
    assert!(report.pushed);

    let log = remote.origin_git(&["log", "--format=%an <%ae>|%s", "feature-x"]);
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(
        lines,
        [
            "alice <alice@users.noreply.amandus>|User alice modified file a.txt",
            "Test <test@test.com>|Initial commit",
        ]
    );
    assert_eq!(
        remote.origin_git(&["show", "feature-x:a.txt"]),
        "hello"
    );
    assert_eq!(
        remote.origin_git(&["diff-tree", "--no-commit-id", "--name-only", "-r", "feature-x"]),
        "a.txt"
    );
    assert_eq!(cmd::remotes(&workspace).unwrap(), ["origin"]);
}

#[test]
fn save_with_unchanged_content_does_not_push() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    engine.clone_or_sync(&remote.url).unwrap();

    let report = engine
        .save(&file(&remote, "README.md", "# readme\n"), "master", Some("noop"), &alice())
        .unwrap();
    assert_eq!(report.outcome, CommitOutcome::Unchanged);
    assert!(!report.pushed);
    assert_eq!(remote.origin_git(&["rev-list", "--count", "master"]), "1");
}

#[test]
fn save_rejected_push_is_merge_conflict() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    let workspace = engine.clone_or_sync(&remote.url).unwrap().workspace;

    engine
        .save(&file(&remote, "a.txt", "one"), "feature-x", None, &alice())
        .unwrap();
    remote.push_from_other("feature-x", "b.txt", "theirs");

    let err = engine
        .save(&file(&remote, "a.txt", "two"), "feature-x", Some("second"), &alice())
        .unwrap_err();
    let sync = err.as_sync().expect("sync error");
    assert!(matches!(sync, SyncError::MergeConflict { branch } if branch == "feature-x"));
    assert!(sync.is_user_recoverable());

    assert_eq!(cmd::remotes(&workspace).unwrap(), ["origin"]);
    assert_eq!(remote.origin_git(&["show", "feature-x:a.txt"]), "one");
}

#[cfg(unix)]
#[test]
fn resave_after_failed_push_pushes_pending_commit() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    let workspace = engine.clone_or_sync(&remote.url).unwrap().workspace;

    remote.refuse_pushes();
    let err = engine
        .save(&file(&remote, "a.txt", "draft"), "feature-x", None, &alice())
        .unwrap_err();
    assert!(matches!(
        err.as_sync(),
        Some(SyncError::PushFailed { branch, .. }) if branch == "feature-x"
    ));
    assert_eq!(cmd::remotes(&workspace).unwrap(), ["origin"]);
    assert!(remote.origin_git(&["branch", "--list", "feature-x"]).is_empty());

    remote.accept_pushes();
    let report = engine
        .save(&file(&remote, "a.txt", "draft"), "feature-x", None, &alice())
        .unwrap();
    assert_eq!(report.outcome, CommitOutcome::Unchanged);
    assert!(report.pushed);
    assert_eq!(remote.origin_git(&["show", "feature-x:a.txt"]), "draft");

    let again = engine
        .save(&file(&remote, "a.txt", "draft"), "feature-x", None, &alice())
        .unwrap();
    assert!(!again.pushed);
}

#[test]
fn save_to_uncloned_repository_fails_cleanly() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));

    let err = engine
        .save(&file(&remote, "a.txt", "x"), "main", None, &alice())
        .unwrap_err();
    assert!(matches!(
        err.as_sync(),
        Some(SyncError::RepositoryNotCloned(_))
    ));
}

#[test]
fn save_with_invalid_branch_touches_nothing() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    let workspace = engine.clone_or_sync(&remote.url).unwrap().workspace;

    let err = engine
        .save(&file(&remote, "a.txt", "x"), "@@@", None, &alice())
        .unwrap_err();
    assert!(matches!(
        err.as_sync(),
        Some(SyncError::InvalidBranchName(_))
    ));
    assert!(!workspace.join("a.txt").exists());
    assert_eq!(git(&["status", "--porcelain"], &workspace), "");
}

#[test]
fn concurrent_saves_on_different_branches_both_land() {
    let remote = Remote::new();
    let root = temp_dir();
    let engine = SyncEngine::new(WorkspaceLocator::new(root.path()));
    engine.clone_or_sync(&remote.url).unwrap();

    let a = file(&remote, "a.txt", "from a");
    let b = file(&remote, "b.txt", "from b");
    let credential = alice();

    std::thread::scope(|scope| {
        let first = scope.spawn(|| engine.save(&a, "branch-a", None, &credential));
        let second = scope.spawn(|| engine.save(&b, "branch-b", None, &credential));
        assert!(first.join().unwrap().unwrap().pushed);
        assert!(second.join().unwrap().unwrap().pushed);
    });

    assert_eq!(remote.origin_git(&["show", "branch-a:a.txt"]), "from a");
    assert_eq!(remote.origin_git(&["show", "branch-b:b.txt"]), "from b");
    assert_eq!(
        remote.origin_git(&["log", "-1", "--format=%s", "branch-a"]),
        "User alice modified file a.txt"
    );
    assert_eq!(
        remote.origin_git(&["log", "-1", "--format=%s", "branch-b"]),
        "User alice modified file b.txt"
    );
}
