// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Inbound operation set.
//!
//! ```text
//! clone_or_sync / pull_repository / get_state / switch_branch --> SyncEngine
//! save(file, branch, message, session)  --decode--> SyncEngine::save
//! authorize(provider, code, session)    --> broker.exchange_code
//!                                       --> broker.fetch_profile
//!                                       --> signer.merge_provider
//! login_url / repositories / is_connected / issue_session
//! ```
//!
//! Session tokens are decoded before anything else runs, so a bad session never
//! reaches git or a provider.


use serde::Serialize;

use crate::auth::{
    CredentialBroker, LocalUser, Provider, RepoSummary, ServiceUser, SessionSigner,
};
use crate::config::Config;
use crate::error::{AmandusResult, AuthError};
use crate::sync::{RepositoryState, SaveReport, SyncEngine, SyncReport};
use crate::workspace::{WorkspaceFile, WorkspaceLocator};

/// Result of a successful provider authorization.
#[derive(Debug, Clone, Serialize)]
pub struct Authorization {
    pub service_user: ServiceUser,
    /// Replaces the caller's previous session token.
    pub session_token: String,
}

/// The service: sync engine, credential broker and session signer together.
#[derive(Debug)]
pub struct Amandus {
    engine: SyncEngine,
    broker: CredentialBroker,
    signer: SessionSigner,
}

impl Amandus {
    #[must_use]
    pub const fn new(engine: SyncEngine, broker: CredentialBroker, signer: SessionSigner) -> Self {
        Self {
            engine,
            broker,
            signer,
        }
    }

    /// Build from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if `session.secret` is empty.
    pub fn from_config(config: &Config) -> AmandusResult<Self> {
        let signer = SessionSigner::new(&config.session.secret)?;
        Ok(Self::new(
            SyncEngine::new(WorkspaceLocator::new(&config.workspace.root)),
            CredentialBroker::new(config.providers.clone()),
            signer,
        ))
    }

    #[must_use]
    pub const fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    #[must_use]
    pub const fn signer(&self) -> &SessionSigner {
        &self.signer
    }

    /// # Errors
    ///
    /// See [`SyncEngine::clone_or_sync`].
    pub fn clone_or_sync(&self, url: &str) -> AmandusResult<SyncReport> {
        self.engine.clone_or_sync(url)
    }

    /// # Errors
    ///
    /// See [`SyncEngine::pull_repository`].
    pub fn pull_repository(&self, url: &str) -> AmandusResult<SyncReport> {
        self.engine.pull_repository(url)
    }

    /// # Errors
    ///
    /// See [`SyncEngine::get_state`].
    pub fn get_state(&self, url: &str) -> AmandusResult<RepositoryState> {
        self.engine.get_state(url)
    }

    /// # Errors
    ///
    /// See [`SyncEngine::switch_branch`].
    pub fn switch_branch(&self, url: &str, branch: &str) -> AmandusResult<String> {
        self.engine.switch_branch(url, branch)
    }

    /// Commit and push one file as the session's user.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidSession` for a bad token, otherwise see [`SyncEngine::save`].
    pub fn save(
        &self,
        file: &WorkspaceFile,
        branch: &str,
        message: Option<&str>,
        session_token: &str,
    ) -> AmandusResult<SaveReport> {
        let credential = self.signer.decode(session_token)?;
        self.engine.save(file, branch, message, &credential)
    }

    /// Session token for a freshly logged-in local user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if the credential cannot be encoded.
    pub fn issue_session(&self, user: LocalUser) -> AmandusResult<String> {
        Ok(self.signer.issue(user)?)
    }

    /// Browser login URL for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderNotConfigured` if the client id or callback URL is missing.
    pub fn login_url(&self, provider: Provider) -> AmandusResult<String> {
        Ok(self.broker.authorize_url(provider)?)
    }

    /// Whether the session holds a token for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` for a bad token.
    pub fn is_connected(&self, provider: Provider, session_token: &str) -> AmandusResult<bool> {
        Ok(self.signer.decode(session_token)?.is_connected(provider))
    }

    /// Exchange `code`, fetch the account, and return it with a session token that
    /// now carries the provider token.
    ///
    /// Nothing is created when the exchange fails.
    ///
    /// # Errors
    ///
    /// `InvalidSession`, `InvalidAuthorizationCode` or `ProviderUnavailable`.
    pub async fn authorize(
        &self,
        provider: Provider,
        code: &str,
        session_token: &str,
    ) -> AmandusResult<Authorization> {
        self.signer.decode(session_token)?;

        let access_token = self.broker.exchange_code(provider, code).await?;
        let service_user = self.broker.fetch_profile(provider, &access_token).await?;
        let session_token = self
            .signer
            .merge_provider(session_token, provider, &access_token)?;

        Ok(Authorization {
            service_user,
            session_token,
        })
    }

    /// Repositories of the session's `provider` account.
    ///
    /// # Errors
    ///
    /// `InvalidSession`, `ProviderNotConnected` or `ProviderUnavailable`.
    pub async fn repositories(
        &self,
        provider: Provider,
        session_token: &str,
    ) -> AmandusResult<Vec<RepoSummary>> {
        let credential = self.signer.decode(session_token)?;
        let token = credential
            .token_for(provider)
            .ok_or_else(|| AuthError::ProviderNotConnected(provider.as_str().to_string()))?;

        let user = self.broker.fetch_profile(provider, token).await?;
        Ok(self.broker.list_repositories(&user, token).await?)
    }
}
