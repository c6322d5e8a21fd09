// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the provider credential broker.
//!
//! Provider endpoints are served by wiremock; each provider's `auth_base` and
//! `api_base` point at the mock server.

use amandus::auth::{CredentialBroker, Provider, RepoSummary, ServiceUser};
use amandus::config::types::{ProviderConfig, ProvidersConfig};
use amandus::error::AuthError;
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        client_id: "cid".to_string(),
        client_secret: "csecret".to_string(),
        callback_url: "http://localhost:3000/auth/callback".to_string(),
        auth_base: Some(server.uri()),
        api_base: Some(server.uri()),
    }
}

fn broker(server: &MockServer) -> CredentialBroker {
    let config = provider_config(server);
    CredentialBroker::with_client(
        Client::new(),
        ProvidersConfig {
            github: config.clone(),
            gitlab: config.clone(),
            bitbucket: config,
        },
    )
}

// =============================================================================
// Code Exchange
// =============================================================================

#[tokio::test]
async fn github_exchange_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({
            "client_id": "cid",
            "client_secret": "csecret",
            "code": "good-code",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gh-token",
            "scope": "repo",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = broker(&server)
        .exchange_code(Provider::GitHub, "good-code")
        .await
        .unwrap();
    assert_eq!(token, "gh-token");
}

#[tokio::test]
async fn github_response_without_token_is_invalid_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired.",
        })))
        .mount(&server)
        .await;

    let err = broker(&server)
        .exchange_code(Provider::GitHub, "expired")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::InvalidAuthorizationCode { ref provider } if provider == "github"
    ));
}

#[tokio::test]
async fn empty_code_never_reaches_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = broker(&server)
        .exchange_code(Provider::GitLab, "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidAuthorizationCode { .. }));
}

#[tokio::test]
async fn server_error_is_provider_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = broker(&server)
        .exchange_code(Provider::GitHub, "good-code")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::ProviderUnavailable { .. }));
}

#[tokio::test]
async fn client_error_is_invalid_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
        })))
        .mount(&server)
        .await;

    let err = broker(&server)
        .exchange_code(Provider::GitLab, "used-code")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidAuthorizationCode { .. }));
}

#[tokio::test]
async fn gitlab_exchange_sends_form_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=gl-code"))
        .and(body_string_contains("client_secret=csecret"))
        .and(body_string_contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "gl-token",
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = broker(&server)
        .exchange_code(Provider::GitLab, "gl-code")
        .await
        .unwrap();
    assert_eq!(token, "gl-token");
}

#[tokio::test]
async fn bitbucket_exchange_uses_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/site/oauth2/access_token"))
        .and(basic_auth("cid", "csecret"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=bb-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "bb-token",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = broker(&server)
        .exchange_code(Provider::Bitbucket, "bb-code")
        .await
        .unwrap();
    assert_eq!(token, "bb-token");
}

// =============================================================================
// Profiles
// =============================================================================

#[tokio::test]
async fn gitlab_profile_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer gl-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "username": "alice",
            "email": "alice@example.com",
            "name": "Alice",
        })))
        .mount(&server)
        .await;

    let user = broker(&server)
        .fetch_profile(Provider::GitLab, "gl-token")
        .await
        .unwrap();
    assert_eq!(
        user,
        ServiceUser {
            service_name: Provider::GitLab,
            username: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
            repos_url: format!("{}/users/42/projects", server.uri()),
        }
    );
}

#[tokio::test]
async fn rejected_profile_request_is_provider_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = broker(&server)
        .fetch_profile(Provider::GitHub, "revoked")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::ProviderUnavailable { .. }));
}

// =============================================================================
// Repository Listing
// =============================================================================

#[tokio::test]
async fn bitbucket_repositories_use_https_clone_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2.0/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "alice",
            "display_name": "Alice",
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2.0/repositories/alice"))
        .and(header("authorization", "Bearer bb-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{
                "name": "notes",
                "full_name": "alice/notes",
                "links": {
                    "clone": [
                        { "name": "ssh", "href": "git@bitbucket.org:alice/notes.git" },
                        { "name": "https", "href": "https://bitbucket.org/alice/notes.git" },
                    ],
                },
            }],
        })))
        .mount(&server)
        .await;

    let broker = broker(&server);
    let user = broker
        .fetch_profile(Provider::Bitbucket, "bb-token")
        .await
        .unwrap();
    let repos = broker.list_repositories(&user, "bb-token").await.unwrap();

    assert_eq!(
        repos,
        [RepoSummary {
            name: "notes".to_string(),
            full_name: "alice/notes".to_string(),
            clone_url: "https://bitbucket.org/alice/notes.git".to_string(),
        }]
    );
}
