//! foldercaps REST API Server
//!
//! Run with: cargo run --features server --bin foldercaps-server
//!
//! Endpoints:
//!   GET    /health              - Liveness
//!   PUT    /folders             - Insert or replace a folder
//!   DELETE /folders/:id         - Remove a folder
//!   PUT    /users/:id/groups    - Set a user's group memberships
//!   POST   /properties          - Resolve a selection for a user

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use foldercaps::config::ServerConfig;
use foldercaps::{Collection, Folder, FolderCache, FolderId, LmdbFolderStore, Properties, UserId};

// ============================================================================
// State
// ============================================================================

struct AppState {
    store: Arc<LmdbFolderStore>,
    cache: Arc<FolderCache<LmdbFolderStore>>,
}

type Shared = Arc<AppState>;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct PropertiesReq {
    user: UserId,
    items: Value,
}

#[derive(Serialize)]
struct HealthRes {
    status: &'static str,
    version: &'static str,
    folders: u64,
}

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn reply<T>(r: foldercaps::Result<T>) -> Reply<T> {
    match r {
        Ok(v) => (StatusCode::OK, Json(ApiResponse::ok(v))),
        Err(e) => (StatusCode::BAD_REQUEST, Json(ApiResponse::err(e.to_string()))),
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health(State(s): State<Shared>) -> Json<HealthRes> {
    Json(HealthRes {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        folders: s.store.count().unwrap_or(0),
    })
}

async fn put_folder(State(s): State<Shared>, Json(folder): Json<Folder>) -> Reply<FolderId> {
    reply(s.store.put(&folder).map(|_| folder.id))
}

async fn delete_folder(State(s): State<Shared>, Path(id): Path<String>) -> Reply<bool> {
    reply(s.store.remove(&FolderId::new(id)))
}

async fn put_groups(State(s): State<Shared>, Path(user): Path<UserId>, Json(groups): Json<Vec<UserId>>) -> Reply<usize> {
    reply(s.store.set_groups(user, &groups).map(|_| groups.len()))
}

async fn post_properties(State(s): State<Shared>, Json(req): Json<PropertiesReq>) -> Reply<Properties> {
    let session = match s.store.session_for(req.user) {
        Ok(session) => Arc::new(session),
        Err(e) => return reply(Err(e)),
    };
    match Collection::from_json(s.cache.clone(), session, &req.items) {
        Ok(c) => (StatusCode::OK, Json(ApiResponse::ok(c.properties().await))),
        Err(e) => reply(Err(e)),
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let store = Arc::new(LmdbFolderStore::open(&config.db_path, config.map_size)?);
    let cache = Arc::new(FolderCache::with_events(store.clone(), store.subscribe()));
    let state = Arc::new(AppState { store, cache });

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/folders", put(put_folder))
        .route("/folders/:id", delete(delete_folder))
        .route("/users/:id/groups", put(put_groups))
        .route("/properties", post(post_properties))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = config.addr();
    info!(%addr, db = %config.db_path, "foldercaps server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
