// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session token composer.
//!
//! ```text
//! token = base64url(json(SessionCredential)) "." base64url(HMAC-SHA256(secret, payload))
//! ```
//!
//! A credential is never modified: merging a provider token yields a new
//! credential and a new token. Earlier tokens stay valid; nothing is revoked.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use super::provider::Provider;
use crate::error::{AuthError, ConfigError};

type HmacSha256 = Hmac<Sha256>;

/// The local account a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Decoded session: the local user plus any provider tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub user: LocalUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitbucket_token: Option<String>,
    /// Seconds since the Unix epoch.
    pub issued_at: u64,
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connected: Vec<_> = Provider::ALL
            .into_iter()
            .filter(|p| self.is_connected(*p))
            .collect();
        f.debug_struct("SessionCredential")
            .field("user", &self.user)
            .field("connected", &connected)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl SessionCredential {
    #[must_use]
    pub fn new(user: LocalUser) -> Self {
        Self {
            user,
            github_token: None,
            gitlab_token: None,
            bitbucket_token: None,
            issued_at: now_unix(),
        }
    }

    #[must_use]
    pub fn token_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::GitHub => self.github_token.as_deref(),
            Provider::GitLab => self.gitlab_token.as_deref(),
            Provider::Bitbucket => self.bitbucket_token.as_deref(),
        }
    }

    #[must_use]
    pub fn is_connected(&self, provider: Provider) -> bool {
        self.token_for(provider).is_some()
    }

    /// First connected provider in GitHub, GitLab, Bitbucket order.
    #[must_use]
    pub fn first_token(&self) -> Option<(Provider, &str)> {
        Provider::ALL
            .into_iter()
            .find_map(|p| self.token_for(p).map(|token| (p, token)))
    }

    /// A copy with `token` stored for `provider`, re-stamped with the current time.
    #[must_use]
    pub fn with_token(&self, provider: Provider, token: &str) -> Self {
        let mut next = self.clone();
        let slot = match provider {
            Provider::GitHub => &mut next.github_token,
            Provider::GitLab => &mut next.gitlab_token,
            Provider::Bitbucket => &mut next.bitbucket_token,
        };
        *slot = Some(token.to_string());
        next.issued_at = now_unix();
        next
    }
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if `secret` is empty.
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "session".to_string(),
                key: "secret".to_string(),
            });
        }
        let mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).map_err(|e| {
            ConfigError::InvalidValue {
                section: "session".to_string(),
                key: "secret".to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { mac })
    }

    fn mac(&self) -> HmacSha256 {
        self.mac.clone()
    }

    /// Encode and sign `credential`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if the credential cannot be serialized.
    pub fn encode(&self, credential: &SessionCredential) -> Result<String, AuthError> {
        let json = serde_json::to_vec(credential)
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Issue a token for a freshly logged-in user with no providers connected.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if the credential cannot be serialized.
    pub fn issue(&self, user: LocalUser) -> Result<String, AuthError> {
        self.encode(&SessionCredential::new(user))
    }

    /// Verify and decode a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if the token is malformed or its
    /// signature does not match.
    pub fn decode(&self, token: &str) -> Result<SessionCredential, AuthError> {
        let invalid = |reason: &str| AuthError::InvalidSession(reason.to_string());

        let (payload, signature) = token
            .trim()
            .split_once('.')
            .ok_or_else(|| invalid("malformed token"))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| invalid("malformed signature"))?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| invalid("signature mismatch"))?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| invalid("malformed payload"))?;
        serde_json::from_slice(&json).map_err(|_| invalid("malformed payload"))
    }

    /// New token carrying the given GitHub and/or GitLab tokens; `None` keeps the
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if `token` does not decode.
    pub fn merge(
        &self,
        token: &str,
        github_token: Option<&str>,
        gitlab_token: Option<&str>,
    ) -> Result<String, AuthError> {
        let mut credential = self.decode(token)?;
        if let Some(github) = github_token {
            credential = credential.with_token(Provider::GitHub, github);
        }
        if let Some(gitlab) = gitlab_token {
            credential = credential.with_token(Provider::GitLab, gitlab);
        }
        self.encode(&credential)
    }

    /// New token with `access_token` stored for `provider`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` if `token` does not decode.
    pub fn merge_provider(
        &self,
        token: &str,
        provider: Provider,
        access_token: &str,
    ) -> Result<String, AuthError> {
        let credential = self.decode(token)?;
        self.encode(&credential.with_token(provider, access_token))
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}
