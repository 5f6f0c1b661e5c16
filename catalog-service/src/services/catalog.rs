use crate::error::AppError;
use crate::models::query::BookQuery;
use crate::models::requests::{FilterBooks, RegisterBook};
use crate::models::responses::BookInfo;
use crate::models::storage::{Backend, Book};
use crate::utils::text::collapse_whitespace;
use tracing::info;
use uuid::Uuid;

/// Names are stored trimmed and lowercased; the rest of the text is trimmed.
pub fn new_book(data: RegisterBook) -> Book {
    Book {
        id: Uuid::new_v4(),
        book_name: collapse_whitespace(&data.book_name).to_lowercase(),
        author: data.author.trim().to_string(),
        book_type: data.book_type.trim().to_string(),
        price: data.price,
        publication_date: data.publication_date,
        description: data
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        stock: data.stock,
        image: data.image.trim().to_string(),
    }
}

pub async fn register_book(backend: &Backend, data: RegisterBook) -> Result<Book, AppError> {
    let book = new_book(data);

    if !backend.insert_book(&book).await? {
        info!("Rejected duplicate book '{}'", book.book_name);
        return Err(AppError::DuplicateBook);
    }

    info!("Registered book '{}' as {}", book.book_name, book.id);
    Ok(book)
}

pub async fn filter_books(backend: &Backend, filter: &FilterBooks) -> Result<BookInfo, AppError> {
    let query = BookQuery::from_filter(filter)?;
    let books = backend.filter_books(&query).await?;

    Ok(BookInfo {
        total_books: books.len(),
        books,
    })
}

pub async fn ensure_book_exists(backend: &Backend, book_id: &str) -> Result<(), AppError> {
    let id = Uuid::parse_str(book_id.trim())
        .map_err(|_| AppError::InvalidBookId(book_id.to_string()))?;

    if backend.book_exists(id).await? {
        Ok(())
    } else {
        Err(AppError::BookNotFound)
    }
}
