use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One catalog entry as the search endpoint returns it. Every field is
/// optional: a missing or oddly-typed value decodes to `None` instead of
/// failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    #[serde(deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub book_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub book_type: Option<String>,
    #[serde(deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub publication_date: Option<String>,
}

impl Book {
    pub fn name(&self) -> &str {
        self.book_name.as_deref().unwrap_or_default()
    }

    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.book_type.as_deref().unwrap_or_default()
    }

    pub fn published(&self) -> &str {
        self.publication_date.as_deref().unwrap_or_default()
    }

    /// `$` followed by the price, or empty when the price is unknown.
    pub fn price_label(&self) -> String {
        self.price.map(|p| format!("${}", p)).unwrap_or_default()
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookInfo {
    pub books: Option<Vec<Book>>,
}

/// `{ book_info: { books: [...] } }`; either level may be absent or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterResponse {
    pub book_info: Option<BookInfo>,
}

impl FilterResponse {
    pub fn into_books(self) -> Vec<Book> {
        self.book_info
            .and_then(|info| info.books)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tolerates_missing_and_mistyped_fields() {
        let book: Book = serde_json::from_value(json!({
            "book_name": "dune",
            "author": null,
            "price": "9.50",
            "publication_date": 1965,
            "stock": 3
        }))
        .unwrap();

        assert_eq!(book.name(), "dune");
        assert_eq!(book.author(), "");
        assert_eq!(book.category(), "");
        assert_eq!(book.id, None);
        assert_eq!(book.price, Some(9.5));
        assert_eq!(book.published(), "1965");
    }

    #[test]
    fn price_label_prefixes_currency() {
        let priced = Book {
            price: Some(12.0),
            ..Default::default()
        };
        assert_eq!(priced.price_label(), "$12");
        assert_eq!(Book::default().price_label(), "");
    }

    #[test]
    fn absent_or_null_book_list_is_empty() {
        for body in [json!({}), json!({"book_info": null}), json!({"book_info": {}})] {
            let response: FilterResponse = serde_json::from_value(body).unwrap();
            assert!(response.into_books().is_empty());
        }
    }

    #[test]
    fn nested_books_are_extracted_in_order() {
        let response: FilterResponse = serde_json::from_value(json!({
            "access_token": "ignored",
            "book_info": {"total_books": 2, "books": [{"book_name": "a"}, {"book_name": "b"}]}
        }))
        .unwrap();

        let names: Vec<String> = response
            .into_books()
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        assert_eq!(names, ["a", "b"]);
    }
}
