use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity resolved from the provider profile plus the primary-email lookup.
///
/// Serialized into the `user_info` cookie for client-side display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

/// Opaque session identifier issued after a successful sign-in.
///
/// There is no server-side session store; persistence is the session-store
/// collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(pub String);

impl SessionToken {
    /// Mint a fresh token with UUID-class uniqueness.
    pub fn generate() -> Self {
        SessionToken(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The anti-forgery state was absent or did not round-trip intact.
    #[error("missing or mismatched state parameter")]
    InvalidState,

    #[error("missing authorization code")]
    MissingCode,

    #[error("GitHub OAuth is not configured")]
    NotConfigured,

    /// The token endpoint answered but carried an error payload.
    #[error("token exchange rejected: {0}")]
    ExchangeFailed(String),

    #[error("provider returned status {status}")]
    ProviderStatus { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait GithubAuth: Send + Sync {
    /// The provider authorization URL plus the anti-forgery state that must
    /// round-trip through the provider and back via cookie.
    fn authorize_url(&self) -> Result<(String, String), AuthError>;

    /// Exchange a callback `code` for the authenticated identity.
    ///
    /// Runs the full chain: code-for-token exchange, profile fetch, and the
    /// primary-email lookup with its profile-email fallback.
    async fn authenticate(&self, code: &str) -> Result<UserIdentity, AuthError>;
}
