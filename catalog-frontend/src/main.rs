use catalog_frontend::config::Config;
use catalog_frontend::services::api::HttpCatalogApi;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_frontend=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let api = Arc::new(HttpCatalogApi::new(&config.api_url));

    if let Err(e) = catalog_frontend::serve(&config, api).await {
        error!("Catalog frontend stopped: {}", e);
        std::process::exit(1);
    }
}
