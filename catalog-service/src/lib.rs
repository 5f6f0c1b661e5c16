//! Book catalog HTTP service: filtering, registration, existence checks and
//! a liveness endpoint over a pluggable storage backend.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use config::{BackendKind, Config};
use models::storage::{Backend, MemoryBackend, PostgresBackend, RedisBackend, StorageError};
use routes::{
    catalog::{book_exists, filter_book, register_book},
    health::health_check,
};

pub fn build_router(backend: Backend) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/catalog/filter_book", post(filter_book))
        .route("/catalog/register_book", post(register_book))
        .route("/catalog/book-exists/:book_id", get(book_exists))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(backend)
}

pub async fn connect_backend(config: &Config) -> Result<Backend, StorageError> {
    let backend: Backend = match config.backend {
        BackendKind::Postgres => {
            info!("Using PostgreSQL backend");
            Arc::new(PostgresBackend::new(&config.database_url).await?)
        }
        BackendKind::Redis => {
            info!("Using Redis backend");
            Arc::new(RedisBackend::new(&config.redis_url)?)
        }
        BackendKind::Memory => {
            info!("Using in-memory backend");
            Arc::new(MemoryBackend::new())
        }
    };

    backend.test_connection().await?;
    info!("Storage backend connection successful");

    Ok(backend)
}

pub async fn serve(config: &Config, backend: Backend) -> std::io::Result<()> {
    let app = build_router(backend);
    let addr = config.bind_address();

    info!("Catalog service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
