//! Era Genética Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eragenetica_engine::api::{self, ApiState};
use eragenetica_engine::config::{EngineConfig, StoreBackend};
use eragenetica_engine::infrastructure::{
    claims::ConfiguredClaims,
    clock::SystemClock,
    memory_store::InMemoryDocumentStore,
    ports::{AdminSettingsRepo, CharacterRepo, ClockPort},
    sqlite_store::SqliteDocumentStore,
};
use eragenetica_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eragenetica_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Era Genética Engine");

    let config = EngineConfig::from_env()?;
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    let (characters, admin_settings): (Arc<dyn CharacterRepo>, Arc<dyn AdminSettingsRepo>) =
        match config.store_backend {
            StoreBackend::Sqlite => {
                tracing::info!("Opening document store at {}", config.store_db);
                let store = Arc::new(SqliteDocumentStore::new(&config.store_db, clock.clone()).await?);
                (store.clone(), store)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store; data is lost on shutdown");
                let store = Arc::new(InMemoryDocumentStore::new());
                (store.clone(), store)
            }
        };

    if config.admin_user_ids.is_empty() {
        tracing::warn!("ADMIN_USER_IDS is empty, nobody can open the roster");
    }
    let claims = Arc::new(ConfiguredClaims::new(config.admin_user_ids.clone()));

    let app = Arc::new(App::new(characters, admin_settings, claims, clock));
    let state = Arc::new(ApiState::new(app));

    let mut router = api::router(state).layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // Clients send X-User-Id and JSON bodies, which trigger preflights.
        .allow_headers([
            HeaderName::from_static("x-user-id"),
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
