//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Services work against the repository traits only.

pub mod author_service;
pub mod book_service;
pub mod forms;
pub mod search_service;

#[cfg(test)]
mod test_support;

// Re-export for convenience
pub use author_service::{AuthorForm, AuthorFormView, AuthorOutcome};
pub use book_service::{BookForm, BookFormView, BookOutcome};
pub use forms::{Choice, FormErrors, FormOutcome};
pub use search_service::{SearchQuery, SearchResults};
