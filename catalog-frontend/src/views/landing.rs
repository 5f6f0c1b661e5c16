use crate::error::ClientError;
use crate::models::health::HealthStatus;
use crate::services::api::CatalogApi;
use crate::views::layout::{page, text};

/// Fetches the health payload. There is no fallback: errors go to the caller.
pub async fn load(api: &dyn CatalogApi) -> Result<HealthStatus, ClientError> {
    api.health().await
}

pub fn render(status: &HealthStatus) -> String {
    let body = format!(
        r#"<main>
    <h1>Catalog API connected</h1>
    <p>Status: {}</p>
    <p>Version: {}</p>
    <p>IP: {}</p>
</main>"#,
        text(&status.status),
        text(&status.version),
        text(&status.client_ip),
    );
    page("Book Catalog", &body)
}
