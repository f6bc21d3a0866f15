use lms_portal::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    identity::{IdentityProviderState, InMemoryIdentityProvider},
    registry::RouteRegistry,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point of the portal shell: configuration, logging, identity provider,
/// route registry, then the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging
    // RUST_LOG wins; otherwise debug for this crate and request summaries from tower_http.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lms_portal=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Portal starting in {:?} mode", config.env);

    // 3. Identity Provider
    let provider = match &config.accounts_file {
        Some(path) => InMemoryIdentityProvider::from_json_file(path)
            .unwrap_or_else(|e| panic!("FATAL: cannot load accounts from {path}: {e}")),
        None => {
            tracing::warn!("LMS_ACCOUNTS_FILE not set, using demo accounts");
            InMemoryIdentityProvider::demo()
        }
    };
    tracing::info!(accounts = provider.len(), "identity provider ready");
    let identity = Arc::new(provider) as IdentityProviderState;

    // 4. Route Registry
    // The standard table covers every role; there is no fallback for a missing one.
    let registry = RouteRegistry::new(RouteRegistry::standard().rules().to_vec())
        .unwrap_or_else(|e| panic!("FATAL: invalid route table: {e}"));

    // 5. Router and Server Startup
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(identity, registry, config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("FATAL: cannot bind {bind_addr}: {e}"));

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}
