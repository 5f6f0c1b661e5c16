use crate::error::AppError;
use crate::models::requests::FilterBooks;
use crate::models::storage::Book;
use crate::utils::text::{non_blank, normalize_key};
use crate::utils::time::parse_datetime;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    BookName,
    Author,
    BookType,
    Price,
    PublicationDate,
}

impl SortKey {
    /// Unknown or missing column names fall back to the book name.
    pub fn from_group_by(group_by: Option<&str>) -> Self {
        match group_by.map(str::trim) {
            Some("author") => SortKey::Author,
            Some("book_type") => SortKey::BookType,
            Some("price") => SortKey::Price,
            Some("publication_date") => SortKey::PublicationDate,
            _ => SortKey::BookName,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortKey::BookName => "book_name",
            SortKey::Author => "author",
            SortKey::BookType => "book_type",
            SortKey::Price => "price",
            SortKey::PublicationDate => "publication_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized form of a [`FilterBooks`] request. Text fields hold
/// [`normalize_key`] output; every present condition must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookQuery {
    pub book_name: Option<String>,
    pub author: Option<String>,
    pub book_type: Option<String>,
    pub price: Option<f64>,
    pub published_from: Option<NaiveDateTime>,
    pub published_until: Option<NaiveDateTime>,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl BookQuery {
    pub fn from_filter(filter: &FilterBooks) -> Result<Self, AppError> {
        let published_from = parse_bound(
            filter.publication_date_start_date.as_deref(),
            "publication_date_start_date",
        )?;
        let published_until = parse_bound(
            filter.publication_date_end_date.as_deref(),
            "publication_date_end_date",
        )?;

        Ok(Self {
            book_name: non_blank(filter.book_name.as_deref()).map(normalize_key),
            author: non_blank(filter.author.as_deref()).map(normalize_key),
            book_type: non_blank(filter.book_type.as_deref()).map(normalize_key),
            price: filter.price.filter(|p| *p != 0.0),
            published_from,
            published_until,
            sort_key: SortKey::from_group_by(filter.group_by.as_deref()),
            sort_order: SortOrder::from_param(filter.asc_or_desc.as_deref()),
        })
    }

    pub fn matches(&self, book: &Book) -> bool {
        let text_matches = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .map_or(true, |w| normalize_key(actual) == w)
        };

        if !text_matches(&self.book_name, &book.book_name)
            || !text_matches(&self.author, &book.author)
            || !text_matches(&self.book_type, &book.book_type)
        {
            return false;
        }

        if let Some(price) = self.price {
            if book.price != price {
                return false;
            }
        }

        if let Some(from) = self.published_from {
            if book.publication_date < from {
                return false;
            }
        }

        if let Some(until) = self.published_until {
            if book.publication_date > until {
                return false;
            }
        }

        true
    }

    /// Orders by the requested column, ties broken by ascending name.
    /// Text columns compare by their [`normalize_key`] form.
    pub fn sort(&self, books: &mut [Book]) {
        let by_key = |a: &str, b: &str| normalize_key(a).cmp(&normalize_key(b));

        books.sort_by(|a, b| {
            let primary = match self.sort_key {
                SortKey::BookName => by_key(&a.book_name, &b.book_name),
                SortKey::Author => by_key(&a.author, &b.author),
                SortKey::BookType => by_key(&a.book_type, &b.book_type),
                SortKey::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
                SortKey::PublicationDate => a.publication_date.cmp(&b.publication_date),
            };
            let primary = match self.sort_order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary.then_with(|| a.book_name.cmp(&b.book_name))
        });
    }

    /// Filters and orders an unsorted collection.
    pub fn apply(&self, books: impl IntoIterator<Item = Book>) -> Vec<Book> {
        let mut selected: Vec<Book> = books.into_iter().filter(|b| self.matches(b)).collect();
        self.sort(&mut selected);
        selected
    }
}

fn parse_bound(raw: Option<&str>, field: &'static str) -> Result<Option<NaiveDateTime>, AppError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => parse_datetime(value)
            .map(Some)
            .ok_or(AppError::BadDate(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn book(name: &str, author: &str, kind: &str, price: f64, year: i32) -> Book {
        Book {
            id: Uuid::new_v4(),
            book_name: name.to_string(),
            author: author.to_string(),
            book_type: kind.to_string(),
            price,
            publication_date: NaiveDate::from_ymd_opt(year, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            description: None,
            stock: 1,
            image: String::new(),
        }
    }

    fn shelf() -> Vec<Book> {
        vec![
            book("dune", "Frank Herbert", "Sci-Fi", 9.5, 1965),
            book("emma", "Jane Austen", "Romance", 4.0, 1815),
            book("persuasion", "Jane Austen", "Romance", 6.0, 1817),
            book("neuromancer", "William Gibson", "Sci-Fi", 12.0, 1984),
        ]
    }

    fn names(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.book_name.as_str()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_sorted_by_name() {
        let query = BookQuery::from_filter(&FilterBooks::default()).unwrap();
        let result = query.apply(shelf());
        assert_eq!(names(&result), ["dune", "emma", "neuromancer", "persuasion"]);
    }

    #[test]
    fn blank_fields_are_not_conditions() {
        let filter = FilterBooks {
            book_name: Some(String::new()),
            author: Some("  ".to_string()),
            book_type: Some(String::new()),
            price: Some(0.0),
            publication_date_start_date: Some(String::new()),
            ..Default::default()
        };
        let query = BookQuery::from_filter(&filter).unwrap();
        assert_eq!(query, BookQuery::default());
    }

    #[test]
    fn text_filters_ignore_case_and_spacing() {
        let filter = FilterBooks {
            author: Some("  jane   AUSTEN".to_string()),
            ..Default::default()
        };
        let query = BookQuery::from_filter(&filter).unwrap();
        assert_eq!(names(&query.apply(shelf())), ["emma", "persuasion"]);
    }

    #[test]
    fn conditions_are_combined() {
        let filter = FilterBooks {
            book_type: Some("sci-fi".to_string()),
            publication_date_start_date: Some("1970-01-01".to_string()),
            ..Default::default()
        };
        let query = BookQuery::from_filter(&filter).unwrap();
        assert_eq!(names(&query.apply(shelf())), ["neuromancer"]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filter = FilterBooks {
            publication_date_start_date: Some("1815-01-01".to_string()),
            publication_date_end_date: Some("1817-01-01".to_string()),
            ..Default::default()
        };
        let query = BookQuery::from_filter(&filter).unwrap();
        assert_eq!(names(&query.apply(shelf())), ["emma", "persuasion"]);
    }

    #[test]
    fn price_filter_is_exact() {
        let filter = FilterBooks {
            price: Some(6.0),
            ..Default::default()
        };
        let query = BookQuery::from_filter(&filter).unwrap();
        assert_eq!(names(&query.apply(shelf())), ["persuasion"]);
    }

    #[test]
    fn sorts_descending_by_requested_column() {
        let filter = FilterBooks {
            group_by: Some("price".to_string()),
            asc_or_desc: Some("desc".to_string()),
            ..Default::default()
        };
        let query = BookQuery::from_filter(&filter).unwrap();
        assert_eq!(
            names(&query.apply(shelf())),
            ["neuromancer", "dune", "persuasion", "emma"]
        );
    }

    #[test]
    fn text_sort_ignores_case() {
        let books = vec![
            book("white teeth", "Zadie Smith", "Novel", 8.0, 2000),
            book("the color purple", "alice walker", "Novel", 7.0, 1982),
            book("the hours", "Michael Cunningham", "Novel", 9.0, 1998),
        ];
        let filter = FilterBooks {
            group_by: Some("author".to_string()),
            ..Default::default()
        };
        let query = BookQuery::from_filter(&filter).unwrap();
        assert_eq!(
            names(&query.apply(books)),
            ["the color purple", "the hours", "white teeth"]
        );
    }

    #[test]
    fn unknown_sort_column_falls_back_to_name() {
        assert_eq!(SortKey::from_group_by(Some("rating")), SortKey::BookName);
        assert_eq!(SortOrder::from_param(Some("sideways")), SortOrder::Asc);
    }

    #[test]
    fn bad_dates_name_the_field() {
        let filter = FilterBooks {
            publication_date_end_date: Some("yesterday".to_string()),
            ..Default::default()
        };
        match BookQuery::from_filter(&filter) {
            Err(AppError::BadDate(field)) => assert_eq!(field, "publication_date_end_date"),
            other => panic!("expected BadDate, got {:?}", other),
        }
    }
}
