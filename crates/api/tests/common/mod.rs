#![allow(dead_code)]

// Shared helpers for API end-to-end tests.

use api::{build_router, AppState};
use axum_test::TestServer;
use config::{ApiConfig, AuthConfig, GithubOAuthConfig, LoggingConfig, ModelConfig, ServerConfig};
use httpmock::MockServer;
use inference_providers::MockProvider;
use services::{
    auth::{GithubAuth, GithubOAuthClient},
    chat::{ChatService, ChatServiceImpl},
};
use std::sync::Arc;

pub fn test_config(github: Option<GithubOAuthConfig>) -> ApiConfig {
    ApiConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        logging: LoggingConfig::default(),
        auth: AuthConfig {
            production: false,
            github,
        },
        model: ModelConfig {
            base_url: "http://127.0.0.1:0".to_string(),
            api_key: "test-key".to_string(),
            model: "helix-chat-1".to_string(),
            timeout_seconds: 5,
        },
    }
}

pub fn github_config() -> GithubOAuthConfig {
    GithubOAuthConfig {
        client_id: "cid".to_string(),
        client_secret: "sec".to_string(),
        redirect_url: "http://localhost:3000/auth/github/callback".to_string(),
    }
}

/// Server wired to a real GitHub OAuth client pointed at a mock GitHub.
pub fn server_with_github(mock_github: &MockServer) -> TestServer {
    let config = test_config(Some(github_config()));
    let auth = GithubOAuthClient::new(config.auth.github.clone())
        .expect("oauth client")
        .with_endpoints(
            format!("{}/login/oauth/access_token", mock_github.base_url()),
            mock_github.base_url(),
        );
    let chat = ChatServiceImpl::new(
        Arc::new(MockProvider::with_chunks(vec!["ok"])),
        "helix-chat-1",
    );
    build(config, Arc::new(auth), Arc::new(chat))
}

/// Server whose chat service is backed by the given mock provider.
pub fn server_with_chat(provider: Arc<MockProvider>) -> TestServer {
    let config = test_config(None);
    let auth = GithubOAuthClient::new(None).expect("oauth client");
    let chat = ChatServiceImpl::new(provider, "helix-chat-1");
    build(config, Arc::new(auth), Arc::new(chat))
}

fn build(config: ApiConfig, auth: Arc<dyn GithubAuth>, chat: Arc<dyn ChatService>) -> TestServer {
    let state = AppState {
        auth,
        chat,
        config: Arc::new(config),
    };
    TestServer::new(build_router(state)).expect("test server")
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(response: &axum_test::TestResponse) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("cookie header").to_string())
        .collect()
}

pub fn cookie_named(cookies: &[String], name: &str) -> Option<String> {
    cookies
        .iter()
        .find(|c| c.starts_with(&format!("{name}=")))
        .cloned()
}
