//! userhub server entry point.
//!
//! Loads configuration, wires every collaborator, and serves the Axum
//! router with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use userhub::app::{HttpSettings, build_app};
use userhub::app_state::AppState;
use userhub::auth::{JwtService, PasswordHasher};
use userhub::config::{AppConfig, LogFormat};
use userhub::persistence::postgres::run_migrations;
use userhub::persistence::{
    InMemoryPostRepository, InMemoryUserRepository, PgPostRepository, PgUserRepository,
    PostRepository, UserRepository,
};
use userhub::service::{AuthService, HealthService, PostService, UserService};
use userhub::storage::{ObjectStorage, S3Storage};
use userhub::ws::ConnectionRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config);
    tracing::info!(addr = %config.listen_addr, "starting userhub");

    // Persistence
    let (users, posts, db) = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .context("failed to connect to PostgreSQL")?;
        run_migrations(&pool)
            .await
            .context("failed to apply migrations")?;
        tracing::info!("connected to PostgreSQL");
        let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
        let posts: Arc<dyn PostRepository> = Arc::new(PgPostRepository::new(pool.clone()));
        (users, posts, Some(pool))
    } else {
        tracing::warn!("persistence disabled, using in-memory repositories");
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
        (users, posts, None)
    };

    // Auth, broadcaster, storage
    let hasher = PasswordHasher::new();
    let jwt = JwtService::new(&config.jwt);
    let connections = ConnectionRegistry::new();
    let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::connect(&config.storage).await);

    // Services
    let user_service = Arc::new(UserService::new(
        Arc::clone(&users),
        hasher,
        connections.clone(),
        storage,
    ));
    if config.signup_role_selection {
        tracing::warn!("signup role selection enabled, anyone can register as ADMIN");
    }
    let auth_service = Arc::new(
        AuthService::new(Arc::clone(&user_service), hasher, jwt.clone())
            .with_signup_roles(config.signup_role_selection),
    );
    let post_service = Arc::new(PostService::new(posts, users));
    let health = Arc::new(HealthService::new(db));

    let state = AppState {
        user_service,
        auth_service,
        post_service,
        health,
        jwt,
        connections,
        ws_outbound_buffer: config.ws_outbound_buffer,
    };
    let app = build_app(state, &HttpSettings::from(&config));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
