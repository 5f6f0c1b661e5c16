use clap::Parser;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Loads books into a running catalog service.
#[derive(Debug, Parser)]
#[command(name = "catalog-seeder", version)]
struct Args {
    /// Base URL of the catalog service
    #[arg(long, env = "API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Health checks to attempt before giving up
    #[arg(long, default_value_t = 30)]
    max_attempts: u32,

    /// JSON file holding an array of books; a built-in sample set otherwise
    file: Option<PathBuf>,
}

#[derive(Error, Debug)]
enum SeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid book file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Registering '{book}' returned {status}")]
    Status { book: String, status: StatusCode },
    #[error("Catalog service not healthy after {0} attempts")]
    Unavailable(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct NewBook {
    book_name: String,
    author: String,
    book_type: String,
    price: f64,
    publication_date: String,
    #[serde(default)]
    description: Option<String>,
    stock: i32,
    image: String,
}

#[derive(Debug, PartialEq, Eq)]
enum RegisterOutcome {
    Created,
    Duplicate,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct SeedSummary {
    created: usize,
    duplicates: usize,
    failed: usize,
}

struct Seeder {
    client: Client,
    api_url: String,
    poll_interval: Duration,
}

impl Seeder {
    fn new(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(2),
        }
    }

    async fn wait_for_service(&self, max_attempts: u32) -> Result<(), SeedError> {
        info!("Waiting for catalog service at {}...", self.api_url);
        let url = format!("{}/health", self.api_url);

        for attempt in 1..=max_attempts {
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("Catalog service is ready");
                    return Ok(());
                }
                Ok(response) => {
                    warn!(
                        "Attempt {}: catalog service responded with status: {}",
                        attempt,
                        response.status()
                    );
                }
                Err(e) => {
                    warn!("Attempt {}: catalog service not ready: {}", attempt, e);
                }
            }
            if attempt < max_attempts {
                sleep(self.poll_interval).await;
            }
        }

        Err(SeedError::Unavailable(max_attempts))
    }

    async fn register_book(&self, book: &NewBook) -> Result<RegisterOutcome, SeedError> {
        let url = format!("{}/catalog/register_book", self.api_url);
        let response = self.client.post(&url).json(book).send().await?;

        match response.status() {
            StatusCode::CREATED => Ok(RegisterOutcome::Created),
            StatusCode::CONFLICT => Ok(RegisterOutcome::Duplicate),
            status => Err(SeedError::Status {
                book: book.book_name.clone(),
                status,
            }),
        }
    }

    async fn run(&self, books: &[NewBook]) -> SeedSummary {
        info!("Seeding {} books", books.len());
        let mut summary = SeedSummary::default();

        for book in books {
            match self.register_book(book).await {
                Ok(RegisterOutcome::Created) => {
                    info!("✓ Registered '{}'", book.book_name);
                    summary.created += 1;
                }
                Ok(RegisterOutcome::Duplicate) => {
                    info!("= '{}' already in catalog", book.book_name);
                    summary.duplicates += 1;
                }
                Err(e) => {
                    error!("✗ Failed to register '{}': {}", book.book_name, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Seeding complete: {} created, {} duplicates, {} failed",
            summary.created, summary.duplicates, summary.failed
        );
        summary
    }
}

fn load_books(path: &Path) -> Result<Vec<NewBook>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

fn sample_books() -> Vec<NewBook> {
    let book = |name: &str, author: &str, kind: &str, price: f64, date: &str| NewBook {
        book_name: name.to_string(),
        author: author.to_string(),
        book_type: kind.to_string(),
        price,
        publication_date: date.to_string(),
        description: None,
        stock: 10,
        image: format!("{}.png", name.to_lowercase().replace(' ', "_")),
    };

    vec![
        book("Pride and Prejudice", "Jane Austen", "Romance", 8.99, "1813-01-28"),
        book("Frankenstein", "Mary Wollstonecraft Shelley", "Horror", 7.5, "1818-01-01"),
        book("Alice's Adventures in Wonderland", "Lewis Carroll", "Fantasy", 6.25, "1865-11-26"),
        book("The Adventures of Tom Sawyer", "Mark Twain", "Adventure", 7.0, "1876-06-01"),
        book("A Modest Proposal", "Jonathan Swift", "Satire", 3.0, "1729-01-01"),
    ]
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_seeder=info")),
        )
        .init();

    let args = Args::parse();

    let books = match &args.file {
        Some(path) => match load_books(path) {
            Ok(books) => books,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => {
            info!("No book file given, using the sample set");
            sample_books()
        }
    };

    let seeder = Seeder::new(&args.api_url);

    if let Err(e) = seeder.wait_for_service(args.max_attempts).await {
        error!("{}", e);
        std::process::exit(1);
    }

    let summary = seeder.run(&books).await;
    if summary.failed > 0 {
        std::process::exit(1);
    }
}
