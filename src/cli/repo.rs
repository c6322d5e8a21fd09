// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace command arguments.
//!
//! ```text
//! clone URL                 -> clone or fast-forward the default branch
//! pull URL                  -> fast-forward an existing workspace
//! state URL                 -> current branch, branches, files
//! switch-branch URL BRANCH  -> check out or create BRANCH
//! save --file NAME --content-file PATH --branch B [--message M]
//! ```

use clap::Args;
use std::path::PathBuf;

use super::SessionArgs;

/// A command acting on one repository URL.
#[derive(Debug, Clone, Args)]
pub struct RepoArgs {
    /// Remote repository URL.
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Arguments for `switch-branch`.
#[derive(Debug, Clone, Args)]
pub struct SwitchBranchArgs {
    /// Remote repository URL.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Branch to check out; created from the current HEAD if missing.
    #[arg(value_name = "BRANCH")]
    pub branch: String,
}

/// Arguments for `save`.
#[derive(Debug, Clone, Args)]
pub struct SaveArgs {
    /// Workspace file name, e.g. `github.com/team/repo/docs/a.md`.
    #[arg(short = 'f', long = "file", value_name = "NAME")]
    pub file: String,

    /// Local file whose content is saved.
    #[arg(long = "content-file", value_name = "PATH")]
    pub content_file: PathBuf,

    /// Branch to commit on.
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub branch: String,

    /// Commit message; generated when omitted.
    #[arg(short = 'm', long = "message", value_name = "MESSAGE")]
    pub message: Option<String>,

    #[command(flatten)]
    pub session: SessionArgs,
}
