use crate::error::ClientError;
use crate::models::filter::FilterCriteria;
use crate::views::catalog::CatalogSession;
use crate::views::landing;
use crate::AppState;
use axum::{
    extract::{Form, State},
    http::header,
    response::{Html, IntoResponse},
};
use tracing::info;

pub async fn landing_page(State(state): State<AppState>) -> Result<impl IntoResponse, ClientError> {
    let status = landing::load(state.api.as_ref()).await?;

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Html(landing::render(&status)),
    ))
}

pub async fn catalog_page(State(state): State<AppState>) -> Html<String> {
    let session = CatalogSession::new(state.api.clone());
    session.initial_load().await;

    let html = session.render();
    session.dispose();
    Html(html)
}

pub async fn catalog_submit(
    State(state): State<AppState>,
    Form(criteria): Form<FilterCriteria>,
) -> Html<String> {
    info!("Catalog filter submitted: {:?}", criteria);

    let session = CatalogSession::new(state.api.clone());
    session.submit_filter(criteria).await;

    let html = session.render();
    session.dispose();
    Html(html)
}
