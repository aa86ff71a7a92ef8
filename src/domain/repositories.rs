//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::Serialize;

use super::DomainError;

/// Id and display label of a catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: i32,
    pub label: String,
}

/// Book with its authors, ordered by name
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub authors: Vec<Link>,
}

/// Author with their books, ordered by title
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub books: Vec<Link>,
}

/// Input for saving a book. `id: None` inserts, `Some` updates in place.
#[derive(Debug, Clone)]
pub struct BookInput {
    pub id: Option<i32>,
    pub title: String,
    /// Replaces the book's current author set
    pub author_ids: Vec<i32>,
}

/// Input for saving an author. `id: None` inserts, `Some` updates in place.
#[derive(Debug, Clone)]
pub struct AuthorInput {
    pub id: Option<i32>,
    pub name: String,
    /// Replaces the author's current book set
    pub book_ids: Vec<i32>,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books ordered by title
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Books whose title equals `title` exactly
    async fn find_by_title(&self, title: &str) -> Result<Vec<Link>, DomainError>;

    /// Every book as a selectable choice, ordered by title
    async fn choices(&self) -> Result<Vec<Link>, DomainError>;

    /// Insert or update a book and replace its author links in one transaction
    async fn save(&self, input: BookInput) -> Result<Book, DomainError>;

    /// Delete a book and its author links
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Books whose title contains `term`, ordered by title
    async fn search(&self, term: &str) -> Result<Vec<Book>, DomainError>;

    /// At most `limit` titles containing `term`, ordered by title
    async fn suggest(&self, term: &str, limit: u64) -> Result<Vec<Link>, DomainError>;
}

/// Repository trait for Author entity
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors ordered by name
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;

    /// Find an author by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError>;

    /// Authors whose name equals `name` exactly
    async fn find_by_name(&self, name: &str) -> Result<Vec<Link>, DomainError>;

    /// Every author as a selectable choice, ordered by name
    async fn choices(&self) -> Result<Vec<Link>, DomainError>;

    /// Insert or update an author and replace their book links in one transaction
    async fn save(&self, input: AuthorInput) -> Result<Author, DomainError>;

    /// Delete an author and their book links
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Authors whose name contains `term`, ordered by name
    async fn search(&self, term: &str) -> Result<Vec<Author>, DomainError>;

    /// At most `limit` names containing `term`, ordered by name
    async fn suggest(&self, term: &str, limit: u64) -> Result<Vec<Link>, DomainError>;
}
