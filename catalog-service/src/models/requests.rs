use crate::utils::time::deserialize_datetime;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Body of `POST /catalog/filter_book`. Every field is optional and `{}`
/// selects the whole catalog.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterBooks {
    pub book_name: Option<String>,
    pub author: Option<String>,
    pub book_type: Option<String>,
    pub price: Option<f64>,
    pub publication_date_start_date: Option<String>,
    pub publication_date_end_date: Option<String>,
    pub group_by: Option<String>,
    pub asc_or_desc: Option<String>,
}

/// Body of `POST /catalog/register_book`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBook {
    pub book_name: String,
    pub author: String,
    pub book_type: String,
    pub price: f64,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub publication_date: NaiveDateTime,
    #[serde(default)]
    pub description: Option<String>,
    pub stock: i32,
    pub image: String,
}
