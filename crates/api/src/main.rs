use api::{build_router, AppState};
use config::{ApiConfig, LoggingConfig};
use inference_providers::{HostedProvider, HostedProviderConfig};
use services::{auth::GithubOAuthClient, chat::ChatServiceImpl};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Load configuration first to get logging settings
    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });

    init_tracing(&config.logging);

    if config.auth.github.is_some() {
        tracing::info!("GitHub OAuth configured");
    } else {
        tracing::warn!("GitHub OAuth not configured, sign-in is disabled");
    }

    let auth = GithubOAuthClient::new(config.auth.github.clone()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to create GitHub OAuth client");
        std::process::exit(1);
    });

    let provider = HostedProvider::new(HostedProviderConfig {
        base_url: config.model.base_url.clone(),
        api_key: config.model.api_key.clone(),
        timeout_seconds: config.model.timeout_seconds,
    })
    .unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to create completion provider");
        std::process::exit(1);
    });

    let chat = ChatServiceImpl::new(Arc::new(provider), config.model.model.clone());

    let bind_address = config.server.bind_address();
    let state = AppState {
        auth: Arc::new(auth),
        chat: Arc::new(chat),
        config: Arc::new(config),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, address = %bind_address, "Failed to bind listener");
            std::process::exit(1);
        });

    tracing::info!(address = %bind_address, "Server started successfully");
    tracing::info!("Endpoints:");
    tracing::info!("  - GET  /auth/github (Redirect to GitHub OAuth)");
    tracing::info!("  - GET  /auth/github/callback (OAuth callback)");
    tracing::info!("  - POST /auth/logout (Clear session cookies)");
    tracing::info!("  - POST /api/chat (Streaming chat proxy)");
    tracing::info!("  - GET  /health (Liveness)");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}

fn init_tracing(logging_config: &LoggingConfig) {
    let filter = logging_config.filter_directives();

    // Initialize tracing based on the configured format
    match logging_config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .init();
        }
    }
}
