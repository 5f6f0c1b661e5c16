use crate::models::storage::Book;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub client_ip: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookInfo {
    pub total_books: usize,
    pub books: Vec<Book>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterResponse {
    pub book_info: BookInfo,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
