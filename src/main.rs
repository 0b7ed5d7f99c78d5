//! INHELP Directory Backend
//!
//! REST backend for a community directory of accessible events and help services,
//! with moderation, smart search and a spreadsheet-backed remote store.

mod api;
mod auth;
mod config;
mod db;
mod directory;
mod errors;
mod filter;
mod models;
mod moderation;
mod reconcile;
mod search;
mod session;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::AdminCredentials;
use config::Config;
use db::LocalSlots;
use directory::Directory;
use search::{LlmMatcher, Matcher, SearchDelegate};
use store::{DocumentStore, RemoteEndpoint};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<Directory>,
    pub search: SearchDelegate,
    pub credentials: AdminCredentials,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting INHELP Directory Backend");
    tracing::info!("Local fallback path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Remote store is optional
    let remote = match &config.remote_url {
        Some(url) => Some(RemoteEndpoint::new(url.clone(), config.http_timeout)?),
        None => {
            tracing::warn!(
                "No remote endpoint configured (INHELP_REMOTE_URL). Using local storage only"
            );
            None
        }
    };

    // Initialize local fallback storage
    let pool = db::init_database(&config.db_path).await?;
    let store = DocumentStore::new(remote, LocalSlots::new(pool));

    // Load the dataset
    let directory = Arc::new(Directory::open(store).await);

    // Smart search
    let matcher = LlmMatcher::from_config(&config)?.map(|m| Arc::new(m) as Arc<dyn Matcher>);
    let search = SearchDelegate::new(matcher);
    if !search.is_available() {
        tracing::warn!(
            "No matcher API key configured (INHELP_MATCHER_API_KEY). Smart search is disabled"
        );
    }

    if config.admin_password == "admin" {
        tracing::warn!("Admin password is the default one. Set INHELP_ADMIN_PASSWORD");
    }

    // Create application state
    let state = AppState {
        directory,
        search,
        credentials: AdminCredentials::new(&config.admin_username, &config.admin_password),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone credentials for the auth layer
    let credentials = state.credentials.clone();

    // Admin routes
    let admin_routes = Router::new()
        .route("/requests", get(api::list_requests))
        .route("/records", post(api::save_record))
        .route("/sync", post(api::sync_remote))
        .route("/{kind}/{id}/draft", get(api::edit_draft))
        .route("/{kind}/{id}/approve", post(api::approve_record))
        .route("/{kind}/{id}", delete(api::delete_record))
        // Apply admin auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(credentials.clone(), req, next)
        }));

    // Public API routes
    let api_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        // Listings
        .route("/events", get(api::list_events))
        .route("/help", get(api::list_help))
        // Search
        .route("/search", post(api::search))
        // Suggestions
        .route("/submissions", post(api::submit))
        .route("/submissions/draft/{kind}", get(api::submission_draft))
        .route("/submissions/{kind}/{id}", delete(api::withdraw_submission))
        // Login (no auth required)
        .route("/admin/login", post(api::login))
        .nest("/admin", admin_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
