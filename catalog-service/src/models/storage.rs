use crate::models::query::{BookQuery, SortKey};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Connection error: {0}")]
    Connection(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub book_name: String,
    pub author: String,
    pub book_type: String,
    pub price: f64,
    pub publication_date: NaiveDateTime,
    pub description: Option<String>,
    pub stock: i32,
    pub image: String,
}

#[async_trait]
pub trait StorageBackend {
    /// Stores `book` unless its name is taken. Returns `false` on a duplicate.
    async fn insert_book(&self, book: &Book) -> Result<bool, StorageError>;
    async fn filter_books(&self, query: &BookQuery) -> Result<Vec<Book>, StorageError>;
    async fn book_exists(&self, id: Uuid) -> Result<bool, StorageError>;
    async fn test_connection(&self) -> Result<(), StorageError>;
}

pub type Backend = Arc<dyn StorageBackend + Send + Sync>;

#[derive(Default)]
pub struct MemoryBackend {
    books: RwLock<HashMap<Uuid, Book>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StorageError {
        StorageError::Connection("in-memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn insert_book(&self, book: &Book) -> Result<bool, StorageError> {
        let mut books = self.books.write().map_err(|_| Self::poisoned())?;

        if books.values().any(|b| b.book_name == book.book_name) {
            return Ok(false);
        }
        books.insert(book.id, book.clone());
        Ok(true)
    }

    async fn filter_books(&self, query: &BookQuery) -> Result<Vec<Book>, StorageError> {
        let books = self.books.read().map_err(|_| Self::poisoned())?;
        Ok(query.apply(books.values().cloned()))
    }

    async fn book_exists(&self, id: Uuid) -> Result<bool, StorageError> {
        let books = self.books.read().map_err(|_| Self::poisoned())?;
        Ok(books.contains_key(&id))
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

pub struct RedisBackend {
    client: redis::Client,
}

const ALL_BOOKS_KEY: &str = "books:all";

impl RedisBackend {
    pub fn new(redis_url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    pub async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    fn book_key(id: impl Display) -> String {
        format!("book:{}", id)
    }

    fn name_key(book_name: &str) -> String {
        format!("book_name:{}", book_name)
    }

    /// Reserves the name, then writes the record and the index entry in one
    /// transaction. A failed write releases the reservation.
    async fn insert_with<C>(conn: &mut C, book: &Book) -> Result<bool, StorageError>
    where
        C: redis::aio::ConnectionLike + Send,
    {
        let value = serde_json::to_string(book)?;
        let name_key = Self::name_key(&book.book_name);

        let reserved: bool = conn.set_nx(&name_key, book.id.to_string()).await?;
        if !reserved {
            return Ok(false);
        }

        let written: redis::RedisResult<()> = redis::pipe()
            .atomic()
            .set(Self::book_key(book.id), &value)
            .ignore()
            .sadd(ALL_BOOKS_KEY, book.id.to_string())
            .ignore()
            .query_async(&mut *conn)
            .await;

        if let Err(e) = written {
            warn!("Releasing name '{}' after failed write: {}", book.book_name, e);
            if let Err(release) = conn.del::<_, ()>(&name_key).await {
                error!("Failed to release name '{}': {}", book.book_name, release);
            }
            return Err(e.into());
        }

        Ok(true)
    }
}

#[async_trait]
impl StorageBackend for RedisBackend {
    async fn insert_book(&self, book: &Book) -> Result<bool, StorageError> {
        let mut conn = self.get_connection().await?;
        Self::insert_with(&mut conn, book).await
    }

    async fn filter_books(&self, query: &BookQuery) -> Result<Vec<Book>, StorageError> {
        let mut conn = self.get_connection().await?;

        let ids: Vec<String> = conn.smembers(ALL_BOOKS_KEY).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| Self::book_key(id)).collect();
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await?;

        let mut books = Vec::with_capacity(ids.len());
        for (id, value) in ids.iter().zip(values) {
            match value {
                Some(json_str) => books.push(serde_json::from_str::<Book>(&json_str)?),
                None => warn!("Book {} listed but has no record", id),
            }
        }

        Ok(query.apply(books))
    }

    async fn book_exists(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut conn = self.get_connection().await?;
        let exists: bool = conn.exists(Self::book_key(id)).await?;
        Ok(exists)
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        let mut conn = self.get_connection().await?;
        let _: Option<String> = conn.get("__connection_test__").await?;
        Ok(())
    }
}

pub struct PostgresBackend {
    pool: PgPool,
}

const BOOK_COLUMNS: &str =
    "id, book_name, author, book_type, price, publication_date, description, stock, image";

/// SQL counterpart of `normalize_key` for a text column.
fn normalized(column: &str) -> String {
    format!("LOWER(REGEXP_REPLACE(TRIM({}), '\\s+', ' ', 'g'))", column)
}

/// Text columns sort bytewise on their normalized form, like the in-memory sort.
fn order_expression(key: SortKey) -> String {
    match key {
        SortKey::Price | SortKey::PublicationDate => key.column().to_string(),
        SortKey::BookName | SortKey::Author | SortKey::BookType => {
            format!("{} COLLATE \"C\"", normalized(key.column()))
        }
    }
}

fn push_text_condition(builder: &mut QueryBuilder<'_, Postgres>, column: &str, value: &Option<String>) {
    if let Some(value) = value {
        builder
            .push(format!(" AND {} = ", normalized(column)))
            .push_bind(value.clone());
    }
}

fn filter_query(query: &BookQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM books WHERE TRUE", BOOK_COLUMNS));

    push_text_condition(&mut builder, "book_name", &query.book_name);
    push_text_condition(&mut builder, "author", &query.author);
    push_text_condition(&mut builder, "book_type", &query.book_type);

    if let Some(price) = query.price {
        builder.push(" AND price = ").push_bind(price);
    }
    if let Some(from) = query.published_from {
        builder.push(" AND publication_date >= ").push_bind(from);
    }
    if let Some(until) = query.published_until {
        builder.push(" AND publication_date <= ").push_bind(until);
    }

    // Column names come from the SortKey whitelist.
    builder.push(format!(
        " ORDER BY {} {}, book_name COLLATE \"C\" ASC",
        order_expression(query.sort_key),
        query.sort_order.sql()
    ));

    builder
}

impl PostgresBackend {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPool::connect(database_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id UUID PRIMARY KEY,
                book_name TEXT NOT NULL UNIQUE,
                author TEXT NOT NULL,
                book_type TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                publication_date TIMESTAMP NOT NULL,
                description TEXT,
                stock INTEGER NOT NULL,
                image TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    fn book_from_row(row: &PgRow) -> Book {
        Book {
            id: row.get("id"),
            book_name: row.get("book_name"),
            author: row.get("author"),
            book_type: row.get("book_type"),
            price: row.get("price"),
            publication_date: row.get("publication_date"),
            description: row.get("description"),
            stock: row.get("stock"),
            image: row.get("image"),
        }
    }
}

#[async_trait]
impl StorageBackend for PostgresBackend {
    async fn insert_book(&self, book: &Book) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (id, book_name, author, book_type, price, publication_date, description, stock, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (book_name) DO NOTHING
            "#,
        )
        .bind(book.id)
        .bind(&book.book_name)
        .bind(&book.author)
        .bind(&book.book_type)
        .bind(book.price)
        .bind(book.publication_date)
        .bind(&book.description)
        .bind(book.stock)
        .bind(&book.image)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn filter_books(&self, query: &BookQuery) -> Result<Vec<Book>, StorageError> {
        let mut builder = filter_query(query);
        let rows = builder.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(Self::book_from_row).collect())
    }

    async fn book_exists(&self, id: Uuid) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get(0))
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
