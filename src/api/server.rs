//! HTTP API server

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AuthStrategy, SessionStore, User, UserSession};
use crate::config::Config;
use crate::error::Result;
use crate::storage::{Collection, JsonStore};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub auth: Arc<dyn AuthStrategy>,
    pub users: Arc<dyn Collection<User>>,
    pub sessions: Arc<dyn Collection<UserSession>>,
}

pub type SharedState = Arc<AppState>;

/// Open the stores named in `config` and build the configured strategy
pub async fn build_state(config: Config) -> Result<SharedState> {
    let users: Arc<dyn Collection<User>> =
        Arc::new(JsonStore::<User>::open(config.storage.users_path()).await?);
    let sessions: Arc<dyn Collection<UserSession>> =
        Arc::new(JsonStore::<UserSession>::open(config.storage.sessions_path()).await?);
    let auth = auth::build_strategy(&config.auth, SessionStore::new(), sessions.clone());

    tracing::info!(
        "Using {:?} sessions (cookie '{}', expiry {})",
        config.auth.strategy,
        config.auth.session_name,
        config.auth.duration()
    );

    Ok(Arc::new(AppState {
        config,
        auth,
        users,
        sessions,
    }))
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = build_state(config).await?;

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state).await
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    let app = create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/status", get(routes::status))
        .route("/api/v1/stats", get(routes::stats))
        .route("/api/v1/unauthorized", get(routes::unauthorized))
        .route("/api/v1/forbidden", get(routes::forbidden))
        .route("/api/v1/auth_session/login", post(routes::login))
        .route("/api/v1/auth_session/logout", delete(routes::logout))
        .route("/api/v1/users/me", get(routes::me))
        .fallback(routes::not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
