// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             AmandusError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+-----+
//!   |      |      |       |      |     |
//!   v      v      v       v      v     v
//! Sync   Auth    Git    Config   Io  Other
//!  Box    Box    Box     Box     Box Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Sync    InvalidRepository, RemoteUnavailable, SyncConflict,
//!           InvalidBranchName, InvalidFile, WorkspaceWriteError,
//!           MergeConflict, PushFailed, RepositoryNotCloned
//!   Auth    InvalidAuthorizationCode, ProviderUnavailable,
//!           InvalidSession, ProviderNotConnected, ProviderNotConfigured
//!   Git     Gix, CommandFailed, GitNotFound
//!   Config  ParseError, MissingKey, InvalidValue
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`AmandusError`].
pub type AmandusResult<T> = std::result::Result<T, AmandusError>;

/// Top-level error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum AmandusError {
    /// Workspace synchronization failed.
    #[error("sync error: {0}")]
    Sync(#[from] Box<SyncError>),

    /// Provider authorization or session handling failed.
    #[error("auth error: {0}")]
    Auth(#[from] Box<AuthError>),

    /// Raw git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl AmandusError {
    /// Returns the sync error if this is one.
    #[must_use]
    pub fn as_sync(&self) -> Option<&SyncError> {
        match self {
            Self::Sync(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the auth error if this is one.
    #[must_use]
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            Self::Auth(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the raw git error if this is one.
    #[must_use]
    pub fn as_git(&self) -> Option<&GitError> {
        match self {
            Self::Git(err) => Some(err),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for AmandusError {
                fn from(err: $error) -> Self {
                    AmandusError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    SyncError => Sync,
    AuthError => Auth,
    GitError => Git,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Raw git failures, before classification into [`SyncError`].
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` executable could not be located.
    #[error("git executable not found in PATH")]
    GitNotFound,

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),
}

// --- Sync Errors ---

/// Workspace synchronization errors.
///
/// Every failing sync operation surfaces exactly one of these.
#[derive(Debug, Error)]
pub enum SyncError {
    /// URL is malformed or does not name a git remote.
    #[error("invalid repository {url}: {message}")]
    InvalidRepository { url: String, message: String },

    /// Network or authentication failure talking to the remote.
    #[error("remote unavailable for {url}: {message}")]
    RemoteUnavailable { url: String, message: String },

    /// Default branch could not be fast-forwarded.
    #[error("cannot fast-forward {branch}: {message}")]
    SyncConflict { branch: String, message: String },

    /// Branch name is empty or unusable after sanitization.
    #[error("invalid branch name: '{0}'")]
    InvalidBranchName(String),

    /// File name does not resolve to a file inside a workspace.
    #[error("invalid file: '{0}'")]
    InvalidFile(String),

    /// Writing the working copy failed.
    #[error("failed to write {path}: {source}")]
    WorkspaceWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Remote branch has diverged from the local one.
    #[error("merge conflict: remote branch '{branch}' has diverged")]
    MergeConflict { branch: String },

    /// Push failed for a reason other than divergence.
    #[error("push of '{branch}' failed: {message}")]
    PushFailed { branch: String, message: String },

    /// Workspace for this URL has not been cloned yet.
    #[error("repository not cloned: {0}")]
    RepositoryNotCloned(String),
}

impl SyncError {
    /// Whether the user can resolve this by re-pulling or re-editing.
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::MergeConflict { .. } | Self::SyncConflict { .. })
    }
}

// --- Auth Errors ---

/// Provider authorization and session errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token endpoint returned no access token for the code.
    #[error("invalid or expired {provider} authorization code")]
    InvalidAuthorizationCode { provider: String },

    /// Provider could not be reached or answered with a server error.
    #[error("{provider} unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    /// Session credential is malformed or its signature does not match.
    #[error("invalid session credential: {0}")]
    InvalidSession(String),

    /// The session holds no token for the provider.
    #[error("no {0} account connected")]
    ProviderNotConnected(String),

    /// Client id or callback URL missing from configuration.
    #[error("{0} client id or callback url not set")]
    ProviderNotConfigured(String),

    /// Provider name not recognised.
    #[error("unsupported provider '{0}'")]
    UnsupportedProvider(String),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
