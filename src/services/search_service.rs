//! Substring search over titles and names

use std::collections::BTreeMap;

use crate::domain::{Author, AuthorRepository, Book, BookRepository, DomainError, Link};

/// Autocomplete never returns more than this many entries
pub const AUTOCOMPLETE_LIMIT: u64 = 10;

pub const MISSING_TERM: &str = "Need a parameter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Books(String),
    Authors(String),
}

impl SearchQuery {
    /// The book title wins when both fields are filled. `None` when neither is.
    pub fn from_fields(book_title: Option<&str>, author_name: Option<&str>) -> Option<Self> {
        match (book_title, author_name) {
            (Some(title), _) if !title.is_empty() => Some(SearchQuery::Books(title.to_string())),
            (_, Some(name)) if !name.is_empty() => Some(SearchQuery::Authors(name.to_string())),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum SearchResults {
    Books(Vec<Book>),
    Authors(Vec<Author>),
}

pub async fn search(
    books: &dyn BookRepository,
    authors: &dyn AuthorRepository,
    query: &SearchQuery,
) -> Result<SearchResults, DomainError> {
    match query {
        SearchQuery::Books(term) => {
            let found = books.search(term).await?;
            tracing::debug!("Book search {:?}: {} hits", term, found.len());
            Ok(SearchResults::Books(found))
        }
        SearchQuery::Authors(term) => {
            let found = authors.search(term).await?;
            tracing::debug!("Author search {:?}: {} hits", term, found.len());
            Ok(SearchResults::Authors(found))
        }
    }
}

/// Flat id to label mapping, the shape autocomplete widgets consume
pub fn to_suggestions(links: Vec<Link>) -> BTreeMap<String, String> {
    links
        .into_iter()
        .map(|l| (l.id.to_string(), l.label))
        .collect()
}

pub async fn suggest_books(
    books: &dyn BookRepository,
    term: &str,
) -> Result<BTreeMap<String, String>, DomainError> {
    Ok(to_suggestions(books.suggest(term, AUTOCOMPLETE_LIMIT).await?))
}

pub async fn suggest_authors(
    authors: &dyn AuthorRepository,
    term: &str,
) -> Result<BTreeMap<String, String>, DomainError> {
    Ok(to_suggestions(authors.suggest(term, AUTOCOMPLETE_LIMIT).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_takes_precedence() {
        assert_eq!(
            SearchQuery::from_fields(Some("Wolf"), Some("London")),
            Some(SearchQuery::Books("Wolf".to_string()))
        );
        assert_eq!(
            SearchQuery::from_fields(Some(""), Some("London")),
            Some(SearchQuery::Authors("London".to_string()))
        );
    }

    #[test]
    fn empty_terms_are_rejected() {
        assert_eq!(SearchQuery::from_fields(None, None), None);
        assert_eq!(SearchQuery::from_fields(Some(""), Some("")), None);
        assert_eq!(SearchQuery::from_fields(Some(""), None), None);
    }

    #[test]
    fn suggestions_are_keyed_by_id() {
        let map = to_suggestions(vec![Link {
            id: 10,
            label: "The Sea Wolf".to_string(),
        }]);
        assert_eq!(map.get("10").map(String::as_str), Some("The Sea Wolf"));
    }
}
