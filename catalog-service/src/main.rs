use catalog_service::config::Config;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_service=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let backend = match catalog_service::connect_backend(&config).await {
        Ok(backend) => backend,
        Err(e) => {
            error!("Failed to connect to storage backend: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = catalog_service::serve(&config, backend).await {
        error!("Catalog service stopped: {}", e);
        std::process::exit(1);
    }
}
