use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, routing::get, Router};
use fileindex_core::{CountCache, Database};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use super::error::ApiError;
use super::{api, pages};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared by every request. The count cache lives as long as the service
/// process; each request opens its own read-only connection.
#[derive(Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
    counts: Arc<CountCache>,
}

impl AppState {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path: Arc::new(db_path),
            counts: Arc::new(CountCache::new()),
        }
    }

    /// Run `f` against a fresh connection on the blocking pool.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database, &CountCache) -> fileindex_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        let counts = Arc::clone(&self.counts);
        tokio::task::spawn_blocking(move || {
            let db = Database::open_existing(db_path.as_path())?;
            f(&db, &counts)
        })
        .await
        .map_err(|err| {
            tracing::error!("Query task failed: {}", err);
            ApiError::internal("Internal server error")
        })?
        .map_err(ApiError::from)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/api", get(api::index))
        .route("/api/", get(api::index))
        .route("/api/count", get(api::count))
        .route("/api/everything", get(api::everything))
        .route("/api/duplicates/sha256", get(api::duplicates_sha256))
        .route("/api/unique/sha256", get(api::unique_sha256))
        .route("/api/path/", get(api::lookup_root_path))
        .route("/api/{column}/{value}", get(api::lookup))
        .route("/web/all", get(pages::all))
        .route("/web/duplicates/sha256", get(pages::duplicates_sha256))
        .route("/web/unique/sha256", get(pages::unique_sha256))
        .route("/web/path/", get(pages::lookup_root_path))
        .route("/web/{column}/{value}", get(pages::lookup))
        .route("/css/{file}", get(pages::css))
        .route("/js/{file}", get(pages::js))
        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer(REQUEST_TIMEOUT))
        .with_state(state)
}

fn timeout_layer(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

pub async fn serve(host: &str, port: u16, db_path: PathBuf) -> anyhow::Result<()> {
    info!("Serving {} on {}:{}", db_path.display(), host, port);
    let app = router(AppState::new(db_path));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("Shutting down");
}
