//! Server-rendered catalog UI: a landing page that reports the catalog API's
//! health and a filterable book grid.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

use config::Config;
use routes::{
    pages::{catalog_page, catalog_submit, landing_page},
    proxy::filter_book_proxy,
};
use services::api::CatalogApi;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CatalogApi>,
}

pub fn build_router(api: Arc<dyn CatalogApi>) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/Catalog/filter", get(catalog_page).post(catalog_submit))
        .route("/api/Catalog/Filter_Book", post(filter_book_proxy))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { api })
}

pub async fn serve(config: &Config, api: Arc<dyn CatalogApi>) -> std::io::Result<()> {
    let app = build_router(api);
    let addr = config.bind_address();

    info!("Catalog frontend starting on {} (API at {})", addr, config.api_url);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
