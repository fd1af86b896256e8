use super::ports::{AuthError, GithubAuth, UserIdentity};
use async_trait::async_trait;
use config::GithubOAuthConfig;
use oauth2::{
    basic::BasicClient, AuthUrl, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope, TokenUrl,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_API_BASE: &str = "https://api.github.com";

// GitHub's API rejects requests without a User-Agent
const USER_AGENT: &str = "helix-insight-gateway";

// Type alias for a fully configured OAuth client
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    oauth2::EndpointSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointSet,
>;

/// GitHub OAuth client: authorization URL generation plus the callback chain
/// (token exchange, profile fetch, primary-email lookup).
pub struct GithubOAuthClient {
    oauth: Option<ConfiguredClient>,
    config: Option<GithubOAuthConfig>,
    token_url: String,
    api_base: String,
    http: Client,
}

impl GithubOAuthClient {
    pub fn new(config: Option<GithubOAuthConfig>) -> Result<Self, AuthError> {
        let oauth = config.clone().map(Self::create_oauth_client).transpose()?;

        Ok(Self {
            oauth,
            config,
            token_url: GITHUB_TOKEN_URL.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            http: Client::new(),
        })
    }

    /// Point the client at non-default endpoints (GitHub Enterprise, tests).
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.api_base = api_base.into();
        self
    }

    fn create_oauth_client(config: GithubOAuthConfig) -> Result<ConfiguredClient, AuthError> {
        let auth_url = AuthUrl::new(GITHUB_AUTH_URL.to_string())
            .map_err(|e| AuthError::InvalidResponse(format!("invalid GitHub auth URL: {e}")))?;

        let token_url = TokenUrl::new(GITHUB_TOKEN_URL.to_string())
            .map_err(|e| AuthError::InvalidResponse(format!("invalid GitHub token URL: {e}")))?;

        let client = BasicClient::new(ClientId::new(config.client_id))
            .set_client_secret(ClientSecret::new(config.client_secret))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(RedirectUrl::new(config.redirect_url).map_err(|e| {
                AuthError::InvalidResponse(format!("invalid redirect URL: {e}"))
            })?);

        Ok(client)
    }

    /// Exchange the authorization code for a bearer token.
    ///
    /// GitHub signals failures two ways: a non-success status, or a 200 whose
    /// body carries an `error` field instead of a token. Both are terminal.
    async fn exchange_code(
        &self,
        config: &GithubOAuthConfig,
        code: &str,
    ) -> Result<String, AuthError> {
        debug!("exchanging GitHub code for token");

        let response = self
            .http
            .post(&self.token_url)
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "client_id": config.client_id,
                "client_secret": config.client_secret,
                "code": code,
                "redirect_uri": config.redirect_url,
            }))
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("token exchange request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "token endpoint returned non-success status");
            return Err(AuthError::ProviderStatus {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(format!("bad token response: {e}")))?;

        if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
            let description = body
                .get("error_description")
                .and_then(|d| d.as_str())
                .unwrap_or(error);
            warn!(error, description, "token endpoint rejected the code");
            return Err(AuthError::ExchangeFailed(description.to_string()));
        }

        body.get("access_token")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| AuthError::InvalidResponse("token response missing access_token".into()))
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, AuthError> {
        let response = self
            .http
            .get(format!("{}/user", self.api_base))
            .header("Authorization", format!("Bearer {access_token}"))
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("profile fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::ProviderStatus {
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(format!("bad profile response: {e}")))
    }

    /// The primary-flagged email from the account's email list, if any.
    async fn fetch_primary_email(&self, access_token: &str) -> Result<Option<String>, AuthError> {
        let response = self
            .http
            .get(format!("{}/user/emails", self.api_base))
            .header("Authorization", format!("Bearer {access_token}"))
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("email list fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::ProviderStatus {
                status: response.status().as_u16(),
            });
        }

        let emails: Vec<GithubEmail> = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(format!("bad email list response: {e}")))?;

        Ok(emails.into_iter().find(|e| e.primary).map(|e| e.email))
    }
}

#[async_trait]
impl GithubAuth for GithubOAuthClient {
    fn authorize_url(&self) -> Result<(String, String), AuthError> {
        let client = self.oauth.as_ref().ok_or(AuthError::NotConfigured)?;

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("user:email".to_string()))
            .url();

        Ok((auth_url.to_string(), csrf_state.secret().to_string()))
    }

    async fn authenticate(&self, code: &str) -> Result<UserIdentity, AuthError> {
        let config = self.config.as_ref().ok_or(AuthError::NotConfigured)?;

        let access_token = self.exchange_code(config, code).await?;
        let profile = self.fetch_profile(&access_token).await?;

        // The email list is the only soft-fail in the chain: fall back to the
        // profile's public email when it errors or has no primary entry.
        let email = match self.fetch_primary_email(&access_token).await {
            Ok(Some(primary)) => Some(primary),
            Ok(None) => profile.email.clone(),
            Err(e) => {
                warn!(error = %e, "email list lookup failed, using profile email");
                profile.email.clone()
            }
        };

        let identity = UserIdentity {
            id: profile.id.to_string(),
            username: profile.login,
            display_name: profile.name,
            email,
            avatar_url: profile.avatar_url,
        };

        info!(user = %identity.username, "GitHub user authenticated");
        Ok(identity)
    }
}

#[derive(Deserialize)]
struct GithubProfile {
    id: u64,
    #[serde(default)]
    login: String,
    #[serde(default)]
    name: Option<String>,
    email: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
}
