use crate::error::AppError;
use crate::models::requests::{FilterBooks, RegisterBook};
use crate::models::responses::{DetailResponse, FilterResponse};
use crate::models::storage::Backend;
use crate::services::catalog;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

pub async fn filter_book(
    State(backend): State<Backend>,
    Json(filter): Json<FilterBooks>,
) -> Result<Json<FilterResponse>, AppError> {
    info!("Filter request: {:?}", filter);

    let book_info = catalog::filter_books(&backend, &filter).await?;
    info!("Filter matched {} books", book_info.total_books);

    Ok(Json(FilterResponse { book_info }))
}

pub async fn register_book(
    State(backend): State<Backend>,
    Json(registry_data): Json<RegisterBook>,
) -> Result<(StatusCode, Json<DetailResponse>), AppError> {
    catalog::register_book(&backend, registry_data).await?;

    Ok((
        StatusCode::CREATED,
        Json(DetailResponse::new("book registered successfully.")),
    ))
}

pub async fn book_exists(
    Path(book_id): Path<String>,
    State(backend): State<Backend>,
) -> Result<Json<DetailResponse>, AppError> {
    catalog::ensure_book_exists(&backend, &book_id).await?;
    Ok(Json(DetailResponse::new("Book found")))
}
