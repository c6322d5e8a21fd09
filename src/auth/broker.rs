// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider credential broker.
//!
//! ```text
//! exchange_code(provider, code)
//!   POST token endpoint -- transport / 5xx --> ProviderUnavailable
//!                       -- 4xx / no token --> InvalidAuthorizationCode
//!        |
//!        v
//! fetch_profile(provider, token)
//!   GET profile endpoint --> RawProfile --> ServiceUser
//! ```
//!
//! Control flow is provider-agnostic; everything provider-specific lives in
//! [`Provider`] and the raw profile mappings.

use reqwest::{Client, Response, header};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use super::provider::{
    Provider, RawProfile, RepoSummary, ServiceUser, TokenRequestStyle, TokenResponse,
    parse_repo_list,
};
use crate::config::types::{ProviderConfig, ProvidersConfig};
use crate::error::AuthError;
use crate::net;

/// Talks to provider OAuth and REST endpoints.
#[derive(Debug, Clone)]
pub struct CredentialBroker {
    client: Client,
    providers: ProvidersConfig,
}

fn unavailable(provider: Provider, message: impl std::fmt::Display) -> AuthError {
    AuthError::ProviderUnavailable {
        provider: provider.as_str().to_string(),
        message: message.to_string(),
    }
}

fn invalid_code(provider: Provider) -> AuthError {
    AuthError::InvalidAuthorizationCode {
        provider: provider.as_str().to_string(),
    }
}

impl CredentialBroker {
    /// Broker using the shared HTTP client.
    #[must_use]
    pub fn new(providers: ProvidersConfig) -> Self {
        Self::with_client(net::global_client().clone(), providers)
    }

    #[must_use]
    pub const fn with_client(client: Client, providers: ProvidersConfig) -> Self {
        Self { client, providers }
    }

    #[must_use]
    pub const fn config(&self, provider: Provider) -> &ProviderConfig {
        self.providers.get(provider)
    }

    /// Login URL with a fresh random `state`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderNotConfigured` if the client id or callback URL is missing.
    pub fn authorize_url(&self, provider: Provider) -> Result<String, AuthError> {
        let state = Uuid::new_v4().simple().to_string();
        provider.authorize_url(self.config(provider), &state)
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidAuthorizationCode` if the code is empty, the provider
    ///   refuses it, or the response carries no token.
    /// - `AuthError::ProviderUnavailable` on transport failure, a server error, or
    ///   a body that is not JSON.
    pub async fn exchange_code(&self, provider: Provider, code: &str) -> Result<String, AuthError> {
        if code.trim().is_empty() {
            return Err(invalid_code(provider));
        }

        let config = self.config(provider);
        let endpoint = provider.token_endpoint(config);
        debug!(provider = %provider, endpoint = %endpoint, "exchanging authorization code");

        let request = self
            .client
            .post(&endpoint)
            .header(header::ACCEPT, "application/json");
        let request = match provider.token_request_style() {
            TokenRequestStyle::Json => request.json(&json!({
                "client_id": config.client_id,
                "client_secret": config.client_secret,
                "code": code,
            })),
            TokenRequestStyle::Form => request.form(&[
                ("client_id", config.client_id.as_str()),
                ("client_secret", config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", config.callback_url.as_str()),
            ]),
            TokenRequestStyle::FormBasicAuth => request
                .basic_auth(&config.client_id, Some(&config.client_secret))
                .form(&[("grant_type", "authorization_code"), ("code", code)]),
        };

        let response = request
            .send()
            .await
            .map_err(|e| unavailable(provider, e))?;
        let status = response.status();
        if status.is_server_error() {
            return Err(unavailable(provider, format!("token endpoint returned {status}")));
        }
        if status.is_client_error() {
            return Err(invalid_code(provider));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| unavailable(provider, e))?;
        let token = body.into_token().ok_or_else(|| invalid_code(provider))?;

        info!(provider = %provider, "authorization code exchanged");
        Ok(token)
    }

    async fn get(&self, provider: Provider, url: &str, token: &str) -> Result<Response, AuthError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, provider.authorization_header(token))
            .send()
            .await
            .map_err(|e| unavailable(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(provider, format!("{url} returned {status}")));
        }
        Ok(response)
    }

    /// Fetch the account behind `token` and normalize it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderUnavailable` if the request fails or the body
    /// does not have the provider's profile shape.
    pub async fn fetch_profile(
        &self,
        provider: Provider,
        token: &str,
    ) -> Result<ServiceUser, AuthError> {
        let config = self.config(provider);
        let response = self
            .get(provider, &provider.profile_endpoint(config), token)
            .await?;
        let body = response.bytes().await.map_err(|e| unavailable(provider, e))?;
        let profile = RawProfile::parse(provider, &body).map_err(|e| unavailable(provider, e))?;

        let user = profile.into_service_user(provider.api_base(config));
        info!(provider = %provider, username = %user.username, "fetched provider profile");
        Ok(user)
    }

    /// Repositories listed at `user.repos_url`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderUnavailable` if the request fails or the body
    /// does not have the provider's listing shape.
    pub async fn list_repositories(
        &self,
        user: &ServiceUser,
        token: &str,
    ) -> Result<Vec<RepoSummary>, AuthError> {
        let provider = user.service_name;
        let response = self.get(provider, &user.repos_url, token).await?;
        let body = response.bytes().await.map_err(|e| unavailable(provider, e))?;
        parse_repo_list(provider, &body).map_err(|e| unavailable(provider, e))
    }
}
