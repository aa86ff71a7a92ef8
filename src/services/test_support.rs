//! In-memory repositories for service tests

use async_trait::async_trait;

use crate::domain::{
    Author, AuthorInput, AuthorRepository, Book, BookInput, BookRepository, DomainError, Link,
};

/// Candidates are fixed; every `save` fails the way a lost unique race does
pub struct ConflictingCatalog {
    pub books: Vec<Link>,
    pub authors: Vec<Link>,
}

impl ConflictingCatalog {
    pub fn new() -> Self {
        Self {
            books: vec![Link {
                id: 10,
                label: "The Sea Wolf".to_string(),
            }],
            authors: vec![Link {
                id: 6,
                label: "Jack London".to_string(),
            }],
        }
    }
}

fn conflict() -> DomainError {
    DomainError::Conflict("UNIQUE constraint failed".to_string())
}

#[async_trait]
impl BookRepository for ConflictingCatalog {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        Ok(vec![])
    }

    async fn find_by_id(&self, _id: i32) -> Result<Option<Book>, DomainError> {
        Ok(None)
    }

    async fn find_by_title(&self, _title: &str) -> Result<Vec<Link>, DomainError> {
        Ok(vec![])
    }

    async fn choices(&self) -> Result<Vec<Link>, DomainError> {
        Ok(self.books.clone())
    }

    async fn save(&self, _input: BookInput) -> Result<Book, DomainError> {
        Err(conflict())
    }

    async fn delete(&self, _id: i32) -> Result<(), DomainError> {
        Err(DomainError::NotFound)
    }

    async fn search(&self, _term: &str) -> Result<Vec<Book>, DomainError> {
        Ok(vec![])
    }

    async fn suggest(&self, _term: &str, _limit: u64) -> Result<Vec<Link>, DomainError> {
        Ok(vec![])
    }
}

#[async_trait]
impl AuthorRepository for ConflictingCatalog {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        Ok(vec![])
    }

    async fn find_by_id(&self, _id: i32) -> Result<Option<Author>, DomainError> {
        Ok(None)
    }

    async fn find_by_name(&self, _name: &str) -> Result<Vec<Link>, DomainError> {
        Ok(vec![])
    }

    async fn choices(&self) -> Result<Vec<Link>, DomainError> {
        Ok(self.authors.clone())
    }

    async fn save(&self, _input: AuthorInput) -> Result<Author, DomainError> {
        Err(conflict())
    }

    async fn delete(&self, _id: i32) -> Result<(), DomainError> {
        Err(DomainError::NotFound)
    }

    async fn search(&self, _term: &str) -> Result<Vec<Author>, DomainError> {
        Ok(vec![])
    }

    async fn suggest(&self, _term: &str, _limit: u64) -> Result<Vec<Link>, DomainError> {
        Ok(vec![])
    }
}
