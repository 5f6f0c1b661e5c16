//! Catalog filter view: a search form over the filter endpoint and the grid
//! of books it returns.
//!
//! [`CatalogView`] holds the state and renders it. [`CatalogSession`] drives
//! requests against a [`CatalogApi`] and applies their results. Every request
//! takes a [`Ticket`]; only the newest ticket of a live view may change the
//! state, so overlapping submissions resolve to the last one issued and a
//! disposed view ignores late answers.

use crate::error::ClientError;
use crate::models::book::{Book, FilterResponse};
use crate::models::filter::{FilterCriteria, FilterRequest};
use crate::services::api::CatalogApi;
use crate::views::layout::{attr, page, text};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info};

pub const EMPTY_MESSAGE: &str = "No books found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    Loaded,
    Empty,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct CatalogView {
    books: Vec<Book>,
    loading: bool,
    filters: FilterCriteria,
    outcome: Outcome,
    generation: u64,
    disposed: bool,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            loading: true,
            filters: FilterCriteria::default(),
            outcome: Outcome::Pending,
            generation: 0,
            disposed: false,
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn set_filters(&mut self, filters: FilterCriteria) {
        self.filters = filters;
    }

    /// Marks a request as outstanding. Any earlier ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        Ticket(self.generation)
    }

    /// Applies a settled request. Returns `false` when the result was
    /// dropped because the ticket is stale or the view is gone.
    pub fn settle(&mut self, ticket: Ticket, result: Result<FilterResponse, ClientError>) -> bool {
        if self.disposed {
            debug!("Dropping response for disposed catalog view");
            return false;
        }
        if ticket.0 != self.generation {
            debug!(
                "Dropping stale response {} (latest is {})",
                ticket.0, self.generation
            );
            return false;
        }

        match result {
            Ok(response) => {
                self.books = response.into_books();
                self.outcome = if self.books.is_empty() {
                    Outcome::Empty
                } else {
                    Outcome::Loaded
                };
                info!("Catalog loaded {} books", self.books.len());
            }
            Err(e) => {
                error!("Failed to fetch books: {}", e);
                self.books.clear();
                self.outcome = Outcome::Failed;
            }
        }

        self.loading = false;
        true
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn render(&self) -> String {
        let body = format!(
            r#"<main class="catalog">
    <h1>Book Catalog</h1>
    {}
    {}
</main>"#,
            self.render_form(),
            self.render_results()
        );
        page("Book Catalog", &body)
    }

    fn render_form(&self) -> String {
        let input = |name: &str, placeholder: &str, value: &str| {
            format!(
                r#"<input type="text" name="{}" placeholder="{}" value="{}">"#,
                name,
                placeholder,
                attr(value)
            )
        };

        format!(
            r#"<form method="post" action="/Catalog/filter" class="filters">
        {}
        {}
        {}
        <button type="submit">Filter</button>
    </form>"#,
            input("book_name", "Search by name...", &self.filters.book_name),
            input("author", "Author...", &self.filters.author),
            input("book_type", "Category...", &self.filters.book_type),
        )
    }

    fn render_results(&self) -> String {
        if self.loading {
            return r#"<div class="spinner" role="status" aria-label="Loading"></div>"#.to_string();
        }

        // A failed fetch looks the same as an empty result.
        if self.books.is_empty() {
            return format!(r#"<p class="empty">{}</p>"#, EMPTY_MESSAGE);
        }

        let cards: String = self.books.iter().map(render_card).collect();
        format!(r#"<div class="grid">{}</div>"#, cards)
    }
}

fn render_card(book: &Book) -> String {
    format!(
        r#"
        <article class="book-card">
            <h2>{}</h2>
            <p><strong>Author:</strong> {}</p>
            <p><strong>Category:</strong> {}</p>
            <p><strong>Price:</strong> {}</p>
            <p class="published">Published: {}</p>
        </article>"#,
        text(book.name()),
        text(book.author()),
        text(book.category()),
        text(&book.price_label()),
        text(book.published()),
    )
}

/// A view bound to an API for the duration of one page lifetime.
#[derive(Clone)]
pub struct CatalogSession {
    api: Arc<dyn CatalogApi>,
    view: Arc<Mutex<CatalogView>>,
}

impl CatalogSession {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            view: Arc::new(Mutex::new(CatalogView::new())),
        }
    }

    fn view(&self) -> MutexGuard<'_, CatalogView> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// First render: fetch the whole catalog.
    pub async fn initial_load(&self) {
        self.fetch(FilterRequest::All).await;
    }

    pub async fn submit_filter(&self, criteria: FilterCriteria) {
        self.view().set_filters(criteria.clone());
        self.fetch(FilterRequest::Criteria(criteria)).await;
    }

    async fn fetch(&self, request: FilterRequest) {
        let ticket = self.view().begin();
        let result = self.api.filter_books(&request).await;
        self.view().settle(ticket, result);
    }

    pub fn inspect<R>(&self, f: impl FnOnce(&CatalogView) -> R) -> R {
        f(&self.view())
    }

    pub fn render(&self) -> String {
        self.view().render()
    }

    pub fn dispose(&self) {
        self.view().dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: serde_json::Value) -> FilterResponse {
        serde_json::from_value(body).unwrap()
    }

    fn upstream_failure() -> ClientError {
        ClientError::Status {
            url: "http://api/catalog/filter_book".to_string(),
            status: 500,
        }
    }

    fn card_count(html: &str) -> usize {
        html.matches(r#"class="book-card""#).count()
    }

    #[test]
    fn starts_loading_with_only_a_spinner() {
        let view = CatalogView::new();
        let html = view.render();

        assert!(view.is_loading());
        assert!(html.contains(r#"class="spinner""#));
        assert!(!html.contains(EMPTY_MESSAGE));
        assert_eq!(card_count(&html), 0);
    }

    #[test]
    fn renders_one_card_per_book() {
        let mut view = CatalogView::new();
        let ticket = view.begin();
        view.settle(
            ticket,
            Ok(response(json!({"book_info": {"books": [
                {"book_name": "dune", "author": "Frank Herbert", "book_type": "Sci-Fi",
                 "price": 9.5, "publication_date": "1965-08-01T00:00:00"},
                {"book_name": "emma"},
                {"book_name": "persuasion"}
            ]}}))),
        );

        let html = view.render();
        assert_eq!(view.outcome(), Outcome::Loaded);
        assert_eq!(card_count(&html), 3);
        assert!(html.contains("Frank Herbert"));
        assert!(html.contains("$9.5"));
        assert!(html.contains("Published: 1965-08-01T00:00:00"));
        assert!(!html.contains(r#"class="spinner""#));
    }

    #[test]
    fn empty_list_shows_empty_message() {
        let mut view = CatalogView::new();
        let ticket = view.begin();
        view.settle(ticket, Ok(response(json!({"book_info": {"books": []}}))));

        let html = view.render();
        assert_eq!(view.outcome(), Outcome::Empty);
        assert!(html.contains(EMPTY_MESSAGE));
        assert_eq!(card_count(&html), 0);
    }

    #[test]
    fn failure_clears_books_and_loading() {
        let mut view = CatalogView::new();
        let first = view.begin();
        view.settle(first, Ok(response(json!({"book_info": {"books": [{"book_name": "dune"}]}}))));

        let second = view.begin();
        assert!(view.settle(second, Err(upstream_failure())));

        let html = view.render();
        assert!(!view.is_loading());
        assert!(view.books().is_empty());
        assert_eq!(view.outcome(), Outcome::Failed);
        assert!(html.contains(EMPTY_MESSAGE));
        assert_eq!(card_count(&html), 0);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut view = CatalogView::new();
        let older = view.begin();
        let newer = view.begin();

        assert!(view.settle(newer, Ok(response(json!({"book_info": {"books": [{"book_name": "new"}]}})))));
        assert!(!view.settle(older, Ok(response(json!({})))));

        assert_eq!(view.books().len(), 1);
        assert_eq!(view.books()[0].name(), "new");
    }

    #[test]
    fn disposed_view_ignores_late_response() {
        let mut view = CatalogView::new();
        let ticket = view.begin();
        view.dispose();

        assert!(!view.settle(ticket, Ok(response(json!({"book_info": {"books": [{}]}})))));
        assert!(view.is_loading());
        assert!(view.books().is_empty());
    }

    #[test]
    fn form_echoes_escaped_filter_values() {
        let mut view = CatalogView::new();
        view.set_filters(FilterCriteria {
            book_name: r#"Dune "Messiah""#.to_string(),
            ..Default::default()
        });

        let html = view.render();
        assert!(html.contains(r#"value="Dune &quot;Messiah&quot;""#));
    }

    #[test]
    fn card_text_is_escaped() {
        let mut view = CatalogView::new();
        let ticket = view.begin();
        view.settle(
            ticket,
            Ok(response(json!({"book_info": {"books": [{"book_name": "<script>x</script>"}]}}))),
        );

        let html = view.render();
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
    }
}
