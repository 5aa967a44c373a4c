pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_core::{
    CheckoutGateway, DictionaryLookup, EntitlementSource, RecordStore, SessionEvents,
    SessionProvider,
};

use crate::config::Config;
use crate::db::Database;
use crate::services::auth::AuthClient;
use crate::services::checkout::CheckoutClient;
use crate::services::dictionary::DictionaryClient;
use crate::services::workspaces::WorkspaceRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub records: Arc<dyn RecordStore>,
    pub billing: Arc<dyn EntitlementSource>,
    pub dictionary: Arc<dyn DictionaryLookup>,
    pub checkout: Arc<dyn CheckoutGateway>,
    pub auth: Arc<dyn SessionProvider>,
    pub sessions: SessionEvents,
    pub workspaces: Arc<WorkspaceRegistry>,
}

impl AppState {
    pub fn new(
        config: Config,
        records: Arc<dyn RecordStore>,
        billing: Arc<dyn EntitlementSource>,
        dictionary: Arc<dyn DictionaryLookup>,
        checkout: Arc<dyn CheckoutGateway>,
        auth: Arc<dyn SessionProvider>,
    ) -> Self {
        let sessions = SessionEvents::new();
        let workspaces = Arc::new(WorkspaceRegistry::new(&sessions));

        Self {
            config: Arc::new(config),
            records,
            billing,
            dictionary,
            checkout,
            auth,
            sessions,
            workspaces,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let http = services::http_client(config.http_timeout).context("failed to build HTTP client")?;
    let db = Arc::new(db);

    let state = AppState::new(
        config.clone(),
        db.clone(),
        db,
        Arc::new(DictionaryClient::new(http.clone(), &config.dictionary_api_url)),
        Arc::new(CheckoutClient::new(http.clone(), &config.checkout_url)),
        Arc::new(AuthClient::new(http, &config.auth_url, &config.auth_anon_key)),
    );

    WorkspaceRegistry::spawn_idle_sweep(&state.workspaces, config.workspace_idle);

    let app = build_router(state)
        .layer(cors_layer(&config.app_origin))
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// All routes; protected ones go through the auth middleware.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Session routes
        .route("/api/session", get(routes::session::current))
        .route("/api/session/sign-out", post(routes::session::sign_out))
        // Word routes
        .route("/api/words", get(routes::words::list))
        .route("/api/words/{id}", delete(routes::words::delete))
        // Lookup routes
        .route("/api/lookup", post(routes::lookup::save))
        .route("/api/lookup/{word}", get(routes::lookup::lookup))
        // Flashcard routes
        .route("/api/flashcards", get(routes::flashcards::current))
        .route("/api/flashcards/start", post(routes::flashcards::start))
        .route("/api/flashcards/{action}", post(routes::flashcards::action))
        // Billing routes
        .route("/api/entitlement", get(routes::billing::entitlement))
        .route("/api/checkout", post(routes::billing::checkout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/products", get(routes::products::list))
        .merge(protected_routes)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!(%origin, "APP_ORIGIN is not a valid header value; CORS disabled");
            cors
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
