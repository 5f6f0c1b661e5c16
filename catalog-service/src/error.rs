use crate::models::responses::DetailResponse;
use crate::models::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad date format for {0}. Use YYYY-MM-DD.")]
    BadDate(&'static str),

    #[error("Invalid book id: {0}")]
    InvalidBookId(String),

    #[error("book with this name already exists.")]
    DuplicateBook,

    #[error("Book not found")]
    BookNotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadDate(_) | AppError::InvalidBookId(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateBook => StatusCode::CONFLICT,
            AppError::BookNotFound => StatusCode::NOT_FOUND,
            AppError::Storage(ref e) => {
                error!("Storage failure: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(DetailResponse::new(self.to_string()))).into_response()
    }
}
