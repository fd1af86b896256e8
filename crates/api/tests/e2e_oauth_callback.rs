// E2E tests for the GitHub OAuth callback flow

mod common;

use axum::http::{
    header::{COOKIE, LOCATION},
    HeaderValue,
};
use common::*;
use httpmock::prelude::*;

const LOGIN_ERROR: &str = "/login?error=github_auth_failed";

fn mock_token_success(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/login/oauth/access_token");
        then.status(200)
            .json_body(serde_json::json!({"access_token": "tok", "token_type": "bearer"}));
    })
}

fn mock_profile(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/user");
        then.status(200).json_body(serde_json::json!({
            "id": 7,
            "login": "ada",
            "name": "Ada Lovelace",
            "email": "a@x.com",
            "avatar_url": "https://avatars.example/ada"
        }));
    })
}

#[tokio::test]
async fn test_state_mismatch_rejects_without_session() {
    let github = MockServer::start();
    let token = mock_token_success(&github);
    let server = server_with_github(&github);

    let response = server
        .get("/auth/github/callback")
        .add_query_param("code", "xyz")
        .add_query_param("state", "abc")
        .add_header(COOKIE, HeaderValue::from_static("oauth_state=def"))
        .await;

    assert!(response.status_code().is_redirection());
    assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_ERROR);

    let cookies = set_cookies(&response);
    assert!(cookie_named(&cookies, "session_token").is_none());
    assert!(cookie_named(&cookies, "user_info").is_none());
    let state_cookie = cookie_named(&cookies, "oauth_state").expect("state cookie cleared");
    assert!(state_cookie.contains("Max-Age=0"));

    token.assert_hits(0);
}

#[tokio::test]
async fn test_missing_state_cookie_rejects() {
    let github = MockServer::start();
    let token = mock_token_success(&github);
    let server = server_with_github(&github);

    let response = server
        .get("/auth/github/callback")
        .add_query_param("code", "xyz")
        .add_query_param("state", "abc")
        .await;

    assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_ERROR);
    token.assert_hits(0);
}

#[tokio::test]
async fn test_missing_code_fails_before_any_outbound_call() {
    let github = MockServer::start();
    let token = mock_token_success(&github);
    let server = server_with_github(&github);

    let response = server
        .get("/auth/github/callback")
        .add_query_param("state", "abc")
        .add_header(COOKIE, HeaderValue::from_static("oauth_state=abc"))
        .await;

    assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_ERROR);
    let cookies = set_cookies(&response);
    assert!(cookie_named(&cookies, "session_token").is_none());
    token.assert_hits(0);
}

#[tokio::test]
async fn test_token_exchange_error_field_stops_the_flow() {
    let github = MockServer::start();
    github.mock(|when, then| {
        when.method(POST).path("/login/oauth/access_token");
        then.status(200).json_body(serde_json::json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        }));
    });
    let profile = mock_profile(&github);
    let server = server_with_github(&github);

    let response = server
        .get("/auth/github/callback")
        .add_query_param("code", "xyz")
        .add_query_param("state", "abc")
        .add_header(COOKIE, HeaderValue::from_static("oauth_state=abc"))
        .await;

    assert_eq!(response.headers().get(LOCATION).unwrap(), LOGIN_ERROR);
    let cookies = set_cookies(&response);
    assert!(cookie_named(&cookies, "session_token").is_none());
    assert!(cookie_named(&cookies, "oauth_state")
        .expect("state cookie cleared")
        .contains("Max-Age=0"));
    profile.assert_hits(0);
}

#[tokio::test]
async fn test_successful_callback_issues_session_cookies() {
    let github = MockServer::start();
    mock_token_success(&github);
    mock_profile(&github);
    github.mock(|when, then| {
        when.method(GET).path("/user/emails");
        then.status(200).json_body(serde_json::json!([
            {"email": "a@x.com", "primary": false},
            {"email": "b@x.com", "primary": true}
        ]));
    });
    let server = server_with_github(&github);

    let response = server
        .get("/auth/github/callback")
        .add_query_param("code", "xyz")
        .add_query_param("state", "abc")
        .add_header(COOKIE, HeaderValue::from_static("oauth_state=abc"))
        .await;

    assert!(response.status_code().is_redirection());
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/dashboard");

    let cookies = set_cookies(&response);

    let session = cookie_named(&cookies, "session_token").expect("session cookie");
    assert!(session.contains("HttpOnly"));
    assert!(session.contains("SameSite=Lax"));
    assert!(session.contains("Max-Age=604800"));
    // Not production, so no Secure attribute
    assert!(!session.contains("Secure"));

    let user_info = cookie_named(&cookies, "user_info").expect("user_info cookie");
    assert!(!user_info.contains("HttpOnly"));
    // Primary-flagged email wins over the profile email (URL-encoded JSON)
    assert!(user_info.contains("b%40x.com"));
    assert!(user_info.contains("ada"));

    assert!(cookie_named(&cookies, "oauth_state")
        .expect("state cookie cleared")
        .contains("Max-Age=0"));
}

#[tokio::test]
async fn test_email_list_failure_falls_back_to_profile_email() {
    let github = MockServer::start();
    mock_token_success(&github);
    mock_profile(&github);
    github.mock(|when, then| {
        when.method(GET).path("/user/emails");
        then.status(500);
    });
    let server = server_with_github(&github);

    let response = server
        .get("/auth/github/callback")
        .add_query_param("code", "xyz")
        .add_query_param("state", "abc")
        .add_header(COOKIE, HeaderValue::from_static("oauth_state=abc"))
        .await;

    assert_eq!(response.headers().get(LOCATION).unwrap(), "/dashboard");
    let cookies = set_cookies(&response);
    let user_info = cookie_named(&cookies, "user_info").expect("user_info cookie");
    assert!(user_info.contains("a%40x.com"));
}

#[tokio::test]
async fn test_logout_clears_session_cookies() {
    let github = MockServer::start();
    let server = server_with_github(&github);

    let response = server.post("/auth/logout").await;

    response.assert_status_ok();
    let cookies = set_cookies(&response);
    assert!(cookie_named(&cookies, "session_token")
        .expect("session cookie cleared")
        .contains("Max-Age=0"));
    assert!(cookie_named(&cookies, "user_info")
        .expect("user_info cookie cleared")
        .contains("Max-Age=0"));
}
