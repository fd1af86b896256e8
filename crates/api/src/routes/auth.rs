//! GitHub sign-in routes: login initiation, OAuth callback, logout.

use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use services::auth::{AuthError, SessionToken, UserIdentity};
use time::Duration;
use tracing::{debug, error, info};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session_token";

/// Client-readable identity cookie name.
pub const USER_INFO_COOKIE: &str = "user_info";

/// Anti-forgery state cookie name (CSRF protection during the OAuth flow).
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const SESSION_TTL: Duration = Duration::days(7);
const STATE_TTL: Duration = Duration::minutes(10);

const DASHBOARD_PATH: &str = "/dashboard";
const LOGIN_ERROR_PATH: &str = "/login?error=github_auth_failed";

/// Query parameters for the OAuth callback.
///
/// Both are optional so absent parameters reach the validation logic instead
/// of being rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

/// Initiate the GitHub OAuth flow: store the anti-forgery state in a cookie
/// and redirect to GitHub.
pub async fn github_login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), StatusCode> {
    debug!("initiating GitHub OAuth flow");

    let (auth_url, csrf_state) = state.auth.authorize_url().map_err(|e| {
        error!(error = %e, "failed to generate GitHub authorization URL");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, csrf_state))
        .path("/")
        .http_only(true)
        .secure(state.config.auth.production)
        .same_site(SameSite::Lax)
        .max_age(STATE_TTL)
        .build();

    Ok((jar.add(cookie), Redirect::to(&auth_url)))
}

/// Handle the GitHub OAuth callback.
///
/// On success: session + identity cookies and a redirect to the dashboard.
/// On any failure: a redirect to the login error page with only the state
/// cookie cleared. The consumed state cookie is cleared on both paths so it
/// cannot be replayed.
pub async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Response {
    let stored_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build((OAUTH_STATE_COOKIE, "")).path("/").build());

    match resolve_identity(&state, &query, stored_state.as_deref()).await {
        Ok(identity) => {
            let session = SessionToken::generate();
            info!(user = %identity.username, "sign-in complete, issuing session");

            let jar = jar
                .add(session_cookie(&session, state.config.auth.production))
                .add(user_info_cookie(&identity, state.config.auth.production));
            (jar, Redirect::to(DASHBOARD_PATH)).into_response()
        }
        Err(e) => {
            error!(error = %e, "GitHub sign-in failed");
            (jar, Redirect::to(LOGIN_ERROR_PATH)).into_response()
        }
    }
}

/// Steps 1-6 of the callback flow. Every error funnels back to the caller so
/// cookie cleanup happens uniformly.
async fn resolve_identity(
    state: &AppState,
    query: &CallbackQuery,
    stored_state: Option<&str>,
) -> Result<UserIdentity, AuthError> {
    let returned_state = query.state.as_deref().ok_or(AuthError::InvalidState)?;
    let stored_state = stored_state.ok_or(AuthError::InvalidState)?;
    if returned_state != stored_state {
        return Err(AuthError::InvalidState);
    }

    let code = query.code.as_deref().ok_or(AuthError::MissingCode)?;
    state.auth.authenticate(code).await
}

fn session_cookie(session: &SessionToken, production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.to_string()))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(SameSite::Lax)
        .max_age(SESSION_TTL)
        .build()
}

/// Readable by frontend scripts; carries the display identity, no credentials.
fn user_info_cookie(identity: &UserIdentity, production: bool) -> Cookie<'static> {
    let serialized = serde_json::to_string(identity).unwrap_or_default();
    let value = urlencoding::encode(&serialized).into_owned();

    Cookie::build((USER_INFO_COOKIE, value))
        .path("/")
        .secure(production)
        .same_site(SameSite::Lax)
        .max_age(SESSION_TTL)
        .build()
}

/// Logout: clear the session cookies. There is no server-side session store
/// to invalidate.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    debug!("logging out");

    let jar = jar
        .remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
        .remove(Cookie::build((USER_INFO_COOKIE, "")).path("/").build());

    (jar, Json(serde_json::json!({"message": "Logged out"})))
}
