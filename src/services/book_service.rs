//! Book Service - Pure business logic without HTTP layer
//!
//! Validation of the add/edit form, pre-selection of the edit form and
//! deletion. Handlers only translate the outcomes to responses.

use serde::Serialize;

use super::forms::{
    mark_selected, parse_selection, submitted_ids, Choice, FormErrors, FormOutcome, DUPLICATE,
    INVALID_CHOICE, REQUIRED,
};
use crate::domain::{AuthorRepository, Book, BookInput, BookRepository, DomainError, Link};

/// Add/edit form as submitted
#[derive(Debug, Default, Clone)]
pub struct BookForm {
    /// Hidden id, empty when adding
    pub book_id: String,
    pub title: String,
    /// Selected author ids as submitted
    pub authors: Vec<String>,
}

/// Add/edit form as rendered
#[derive(Debug, Clone, Serialize)]
pub struct BookFormView {
    pub book_id: String,
    pub title: String,
    pub authors: Vec<Choice>,
    pub errors: FormErrors,
}

pub type BookOutcome = FormOutcome<Book, BookFormView>;

pub async fn get_book(books: &dyn BookRepository, id: i32) -> Result<Book, DomainError> {
    books.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

/// Empty add form offering every author
pub async fn blank_form(authors: &dyn AuthorRepository) -> Result<BookFormView, DomainError> {
    Ok(BookFormView {
        book_id: String::new(),
        title: String::new(),
        authors: mark_selected(authors.choices().await?, &[]),
        errors: FormErrors::default(),
    })
}

/// Edit form with the book's current authors pre-selected
pub async fn edit_form(
    books: &dyn BookRepository,
    authors: &dyn AuthorRepository,
    id: i32,
) -> Result<BookFormView, DomainError> {
    let book = get_book(books, id).await?;
    let current: Vec<i32> = book.authors.iter().map(|a| a.id).collect();

    Ok(BookFormView {
        book_id: book.id.to_string(),
        title: book.title,
        authors: mark_selected(authors.choices().await?, &current),
        errors: FormErrors::default(),
    })
}

/// Validate and save an add/edit submission.
///
/// A non-empty `book_id` that does not name an existing book is
/// `DomainError::NotFound`, checked after field validation.
pub async fn submit_book(
    books: &dyn BookRepository,
    authors: &dyn AuthorRepository,
    form: BookForm,
) -> Result<BookOutcome, DomainError> {
    let title = form.title.trim().to_string();
    let editing = !form.book_id.trim().is_empty();
    let editing_id: Option<i32> = form.book_id.trim().parse().ok();

    let mut errors = FormErrors::default();

    if title.is_empty() {
        errors.add("title", REQUIRED);
    } else {
        let same_title = books.find_by_title(&title).await?;
        if same_title.iter().any(|b| Some(b.id) != editing_id) {
            errors.add("title", DUPLICATE);
        }
    }

    let candidates = authors.choices().await?;
    let selected = parse_selection(&form.authors, &candidates);
    if selected.is_none() {
        errors.add("authors", INVALID_CHOICE);
    }

    let author_ids = match selected {
        Some(ids) if errors.is_empty() => ids,
        _ => {
            tracing::debug!("Book form rejected: {:?}", errors);
            return Ok(FormOutcome::Invalid(rerender(form, candidates, errors)));
        }
    };

    let id = if editing {
        Some(editing_id.ok_or(DomainError::NotFound)?)
    } else {
        None
    };

    let input = BookInput {
        id,
        title,
        author_ids,
    };

    match books.save(input).await {
        Ok(book) => {
            tracing::info!("Saved book {} ({})", book.id, book.title);
            Ok(FormOutcome::Saved {
                record: book,
                created: id.is_none(),
            })
        }
        // Lost a race with a concurrent save of the same title
        Err(DomainError::Conflict(msg)) => {
            tracing::warn!("Book title conflict after validation: {}", msg);
            errors.add("title", DUPLICATE);
            Ok(FormOutcome::Invalid(rerender(form, candidates, errors)))
        }
        Err(e) => Err(e),
    }
}

fn rerender(form: BookForm, candidates: Vec<Link>, errors: FormErrors) -> BookFormView {
    let selected = submitted_ids(&form.authors);
    BookFormView {
        book_id: form.book_id,
        title: form.title,
        authors: mark_selected(candidates, &selected),
        errors,
    }
}

/// Delete by the id submitted in the hidden `record_id` field
pub async fn delete_book(books: &dyn BookRepository, record_id: &str) -> Result<(), DomainError> {
    let id: i32 = record_id.trim().parse().map_err(|_| DomainError::NotFound)?;
    books.delete(id).await?;
    tracing::info!("Deleted book {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::ConflictingCatalog;

    #[tokio::test]
    async fn lost_title_race_becomes_duplicate_error() {
        let catalog = ConflictingCatalog::new();
        let form = BookForm {
            book_id: String::new(),
            title: "Martin Eden".to_string(),
            authors: vec!["6".to_string()],
        };

        let outcome = submit_book(&catalog, &catalog, form).await.unwrap();

        let FormOutcome::Invalid(view) = outcome else {
            panic!("expected the form to be re-rendered");
        };
        let errors = serde_json::to_value(&view.errors).unwrap();
        assert_eq!(errors["title"], serde_json::json!([DUPLICATE]));
        assert_eq!(view.title, "Martin Eden");
        assert_eq!(view.book_id, "");
        let selected: Vec<i32> = view.authors.iter().filter(|c| c.selected).map(|c| c.id).collect();
        assert_eq!(selected, vec![6]);
    }
}
