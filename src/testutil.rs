// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared fixtures for unit tests: scratch repositories driven by the git CLI.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Run git in `cwd`, panicking with stderr on failure. Returns trimmed stdout.
pub fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
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

/// Initialize a repository on `master` with one committed README.
pub fn init_repo_with_commit(path: &Path) {
    std::fs::create_dir_all(path).expect("failed to create repo dir");
    git(&["init", "--quiet", "-b", "master"], path);
    std::fs::write(path.join("README.md"), "# readme\n").expect("failed to write README");
    git(&["add", "README.md"], path);
    git(&["commit", "--quiet", "-m", "Initial commit"], path);
}

/// Create `<dir>/origin.git`, a bare repository whose `master` holds one commit.
pub fn init_origin(dir: &Path) -> PathBuf {
    let bare = dir.join("origin.git");
    std::fs::create_dir_all(&bare).expect("failed to create bare dir");
    git(&["init", "--quiet", "--bare", "-b", "master"], &bare);

    let seed = dir.join("seed");
    init_repo_with_commit(&seed);
    git(&["remote", "add", "origin", path_str(&bare)], &seed);
    git(&["push", "--quiet", "origin", "master"], &seed);
    bare
}

/// Clone `origin` into `dest`.
pub fn clone_into(origin: &Path, dest: &Path) {
    let parent = dest.parent().expect("clone destination has a parent");
    std::fs::create_dir_all(parent).expect("failed to create clone parent");
    git(&["clone", "--quiet", path_str(origin), path_str(dest)], parent);
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}
