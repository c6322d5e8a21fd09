// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider table and per-provider response shapes.
//!
//! ```text
//!              token endpoint            profile          repo list
//! GitHub    JSON body               GET {api}/user        repos_url
//! GitLab    form body               GET {api}/user        {api}/users/{id}/projects
//! Bitbucket form + basic auth       GET {api}/2.0/user    {api}/2.0/repositories/{username}
//! ```
//!
//! Each raw profile is its own type with one mapping into [`ServiceUser`];
//! a new provider adds a variant and a mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::config::types::ProviderConfig;
use crate::error::AuthError;

/// A supported git hosting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    GitHub,
    GitLab,
    Bitbucket,
}

/// How the authorization code is sent to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRequestStyle {
    /// JSON body with client id and secret.
    Json,
    /// Form body with client id and secret.
    Form,
    /// Form body, client credentials as HTTP basic auth.
    FormBasicAuth,
}

impl Provider {
    pub const ALL: [Self; 3] = [Self::GitHub, Self::GitLab, Self::Bitbucket];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }

    #[must_use]
    pub const fn default_auth_base(self) -> &'static str {
        match self {
            Self::GitHub => "https://github.com",
            Self::GitLab => "https://gitlab.com",
            Self::Bitbucket => "https://bitbucket.org",
        }
    }

    #[must_use]
    pub const fn default_api_base(self) -> &'static str {
        match self {
            Self::GitHub => "https://api.github.com",
            Self::GitLab => "https://gitlab.com/api/v4",
            Self::Bitbucket => "https://api.bitbucket.org",
        }
    }

    /// Configured OAuth base, or the public one. No trailing slash.
    #[must_use]
    pub fn auth_base(self, config: &ProviderConfig) -> &str {
        config
            .auth_base
            .as_deref()
            .unwrap_or_else(|| self.default_auth_base())
            .trim_end_matches('/')
    }

    /// Configured API base, or the public one. No trailing slash.
    #[must_use]
    pub fn api_base(self, config: &ProviderConfig) -> &str {
        config
            .api_base
            .as_deref()
            .unwrap_or_else(|| self.default_api_base())
            .trim_end_matches('/')
    }

    /// Provider hosting `host`, if it is one of the public services.
    #[must_use]
    pub fn from_host(host: &str) -> Option<Self> {
        match host.trim_start_matches("www.") {
            "github.com" => Some(Self::GitHub),
            "gitlab.com" => Some(Self::GitLab),
            "bitbucket.org" => Some(Self::Bitbucket),
            _ => None,
        }
    }

    /// User name to pair with an OAuth token in an HTTPS remote URL.
    ///
    /// GitHub accepts any user name with a token; GitLab and Bitbucket require
    /// fixed ones.
    #[must_use]
    pub fn push_username(self, local_username: &str) -> String {
        match self {
            Self::GitHub => local_username.to_string(),
            Self::GitLab => "oauth2".to_string(),
            Self::Bitbucket => "x-token-auth".to_string(),
        }
    }

    #[must_use]
    pub const fn token_request_style(self) -> TokenRequestStyle {
        match self {
            Self::GitHub => TokenRequestStyle::Json,
            Self::GitLab => TokenRequestStyle::Form,
            Self::Bitbucket => TokenRequestStyle::FormBasicAuth,
        }
    }

    #[must_use]
    pub fn token_endpoint(self, config: &ProviderConfig) -> String {
        let base = self.auth_base(config);
        match self {
            Self::GitHub => format!("{base}/login/oauth/access_token"),
            Self::GitLab => format!("{base}/oauth/token"),
            Self::Bitbucket => format!("{base}/site/oauth2/access_token"),
        }
    }

    #[must_use]
    pub fn profile_endpoint(self, config: &ProviderConfig) -> String {
        let base = self.api_base(config);
        match self {
            Self::GitHub | Self::GitLab => format!("{base}/user"),
            Self::Bitbucket => format!("{base}/2.0/user"),
        }
    }

    /// `Authorization` header value for API calls.
    #[must_use]
    pub fn authorization_header(self, token: &str) -> String {
        match self {
            Self::GitHub => format!("token {token}"),
            Self::GitLab | Self::Bitbucket => format!("Bearer {token}"),
        }
    }

    /// Browser login URL for the OAuth authorization-code flow.
    ///
    /// `state` is only sent to GitLab.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ProviderNotConfigured` if the client id or callback URL
    /// is missing, or the auth base is not a URL.
    pub fn authorize_url(self, config: &ProviderConfig, state: &str) -> Result<String, AuthError> {
        if !config.is_configured() {
            return Err(AuthError::ProviderNotConfigured(self.as_str().to_string()));
        }

        let base = self.auth_base(config);
        let path = match self {
            Self::GitHub => "/login/oauth/authorize",
            Self::GitLab => "/oauth/authorize",
            Self::Bitbucket => "/site/oauth2/authorize",
        };
        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|_| AuthError::ProviderNotConfigured(self.as_str().to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            match self {
                Self::GitHub => {
                    query
                        .append_pair("response_type", "code")
                        .append_pair("redirect_uri", &config.callback_url)
                        .append_pair("client_id", &config.client_id)
                        .append_pair("scope", "repo");
                }
                Self::GitLab => {
                    query
                        .append_pair("client_id", &config.client_id)
                        .append_pair("redirect_uri", &config.callback_url)
                        .append_pair("response_type", "code")
                        .append_pair("state", state)
                        .append_pair("scope", "read_user read_repository write_repository");
                }
                Self::Bitbucket => {
                    query
                        .append_pair("client_id", &config.client_id)
                        .append_pair("response_type", "code");
                }
            }
        }
        Ok(url.to_string())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Self::GitHub),
            "gitlab" => Ok(Self::GitLab),
            "bitbucket" => Ok(Self::Bitbucket),
            _ => Err(AuthError::UnsupportedProvider(s.to_string())),
        }
    }
}

// --- Normalized records ---

/// A provider account, normalized across providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUser {
    pub service_name: Provider,
    pub username: String,
    pub email: Option<String>,
    /// Endpoint listing the account's repositories.
    pub repos_url: String,
}

/// One repository from a provider's listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
}

// --- Token response ---

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl TokenResponse {
    /// The token, if present and non-empty.
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        self.access_token.filter(|token| !token.trim().is_empty())
    }
}

// --- Raw profiles ---

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubProfile {
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    pub repos_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BitbucketProfile {
    pub username: String,
}

/// A profile response as the provider shaped it.
#[derive(Debug, Clone)]
pub enum RawProfile {
    GitHub(GitHubProfile),
    GitLab(GitLabProfile),
    Bitbucket(BitbucketProfile),
}

impl RawProfile {
    /// Parse a profile body for `provider`.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body does not have the provider's shape.
    pub fn parse(provider: Provider, body: &[u8]) -> serde_json::Result<Self> {
        Ok(match provider {
            Provider::GitHub => Self::GitHub(serde_json::from_slice(body)?),
            Provider::GitLab => Self::GitLab(serde_json::from_slice(body)?),
            Provider::Bitbucket => Self::Bitbucket(serde_json::from_slice(body)?),
        })
    }

    /// Map into a [`ServiceUser`]; `api_base` builds derived repository URLs.
    #[must_use]
    pub fn into_service_user(self, api_base: &str) -> ServiceUser {
        match self {
            Self::GitHub(profile) => ServiceUser {
                service_name: Provider::GitHub,
                username: profile.login,
                email: non_empty(profile.email),
                repos_url: profile.repos_url,
            },
            Self::GitLab(profile) => ServiceUser {
                service_name: Provider::GitLab,
                repos_url: format!("{api_base}/users/{}/projects", profile.id),
                username: profile.username,
                email: non_empty(profile.email),
            },
            Self::Bitbucket(profile) => ServiceUser {
                service_name: Provider::Bitbucket,
                repos_url: format!("{api_base}/2.0/repositories/{}", profile.username),
                username: profile.username,
                email: None,
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// --- Raw repository listings ---

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    name: String,
    full_name: String,
    clone_url: String,
}

#[derive(Debug, Deserialize)]
struct GitLabProject {
    name: String,
    path_with_namespace: String,
    http_url_to_repo: String,
}

#[derive(Debug, Deserialize)]
struct BitbucketPage {
    #[serde(default)]
    values: Vec<BitbucketRepo>,
}

#[derive(Debug, Deserialize)]
struct BitbucketRepo {
    name: String,
    full_name: String,
    #[serde(default)]
    links: BitbucketLinks,
}

#[derive(Debug, Default, Deserialize)]
struct BitbucketLinks {
    #[serde(default)]
    clone: Vec<BitbucketCloneLink>,
}

#[derive(Debug, Deserialize)]
struct BitbucketCloneLink {
    name: String,
    href: String,
}

/// Parse a repository listing body for `provider`.
///
/// # Errors
///
/// Returns the JSON error if the body does not have the provider's shape.
pub fn parse_repo_list(provider: Provider, body: &[u8]) -> serde_json::Result<Vec<RepoSummary>> {
    Ok(match provider {
        Provider::GitHub => serde_json::from_slice::<Vec<GitHubRepo>>(body)?
            .into_iter()
            .map(|repo| RepoSummary {
                name: repo.name,
                full_name: repo.full_name,
                clone_url: repo.clone_url,
            })
            .collect(),
        Provider::GitLab => serde_json::from_slice::<Vec<GitLabProject>>(body)?
            .into_iter()
            .map(|project| RepoSummary {
                name: project.name,
                full_name: project.path_with_namespace,
                clone_url: project.http_url_to_repo,
            })
            .collect(),
        Provider::Bitbucket => serde_json::from_slice::<BitbucketPage>(body)?
            .values
            .into_iter()
            .map(|repo| {
                let clone_url = repo
                    .links
                    .clone
                    .into_iter()
                    .find(|link| link.name == "https")
                    .map(|link| link.href)
                    .unwrap_or_default();
                RepoSummary {
                    name: repo.name,
                    full_name: repo.full_name,
                    clone_url,
                }
            })
            .collect(),
    })
}
