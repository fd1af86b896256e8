pub mod models;
pub mod routes;

use crate::routes::{
    auth::{github_callback, github_login, logout},
    chat::chat,
    health::health_check,
};
use axum::{
    routing::{get, post},
    Router,
};
use config::ApiConfig;
use services::{auth::GithubAuth, chat::ChatService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state.
///
/// Services are trait objects so tests can substitute stubs for the GitHub
/// client and the completion backend.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn GithubAuth>,
    pub chat: Arc<dyn ChatService>,
    pub config: Arc<ApiConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/github", get(github_login))
        .route("/github/callback", get(github_callback))
        .route("/logout", post(logout));

    Router::new()
        .nest("/auth", auth_routes)
        .route("/api/chat", post(chat))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
