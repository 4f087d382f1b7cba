//! Headless Content Gateway
//!
//! A read-mostly JSON API in front of a CMS content store, with Tantivy full-text search and
//! stateless bearer-token authentication.

mod api;
mod auth;
mod config;
mod cors;
mod db;
mod errors;
mod models;
mod notify;
mod search;
mod shape;

use std::sync::Arc;

use axum::{
    http::Uri,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::TokenSigner;
use config::Config;
use db::Repository;
use errors::AppError;
use notify::Notifier;
use search::SearchIndex;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub signer: Arc<TokenSigner>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Headless Content Gateway");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Allowed origins: {:?}", config.allowed_origins);

    let signer = Arc::new(TokenSigner::new(
        config.jwt_secret.as_deref(),
        config.site_url.clone(),
    ));
    if !signer.is_configured() {
        tracing::warn!("No token secret configured (CMS_JWT_SECRET). Login will fail until it is set!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize search index
    let search = Arc::new(SearchIndex::open(&config.index_path)?);

    // Build initial search index from database
    tracing::info!("Building search index...");
    let indexed = search::reindex(&repo, &search).await?;
    tracing::info!("Search index built with {} items", indexed);

    if let Some(every) = config.reindex_interval {
        tokio::spawn(search::reindex_periodically(
            repo.clone(),
            search.clone(),
            every,
        ));
    }

    let notifier = notify::from_config(&config);

    // Create application state
    let state = AppState {
        repo,
        search,
        signer,
        notifier,
        config: Arc::new(config.clone()),
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
    let cors = cors::cors_layer(&state.config.allowed_origins);

    // Clone the signer for the identity layer
    let signer = state.signer.clone();

    let api_routes = Router::new()
        // Content
        .route("/content/{type}", get(api::list_content))
        .route("/content/{type}/{id}", get(api::get_content))
        .route("/search", get(api::search_content))
        .route("/menus/{location}", get(api::get_menu))
        .route("/taxonomies/{taxonomy}", get(api::list_terms))
        // Site
        .route("/settings", get(api::get_settings))
        .route("/featured-projects", get(api::featured_projects))
        .route("/homepage", get(api::get_homepage))
        .route("/contact", post(api::submit_contact))
        // Auth
        .route("/auth/login", post(api::login))
        .route("/auth/validate", post(api::validate_token))
        .route("/auth/refresh", post(api::refresh_token))
        .route("/auth/me", get(api::current_user))
        // Resolve the caller's identity for every request
        .layer(middleware::from_fn(move |req, next| {
            auth::identity_layer(signer.clone(), req, next)
        }));

    // Health check (no identity needed)
    let health_routes = Router::new().route("/health", get(health_check));

    // Layers run outermost first: CORS, then the preflight short-circuit, then routing.
    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(cors::preflight_layer))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any path no route matches.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
