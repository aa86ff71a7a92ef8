//! Author Service - Pure business logic without HTTP layer
//!
//! Mirror of the book service: the author form selects books.

use serde::Serialize;

use super::forms::{
    mark_selected, parse_selection, submitted_ids, Choice, FormErrors, FormOutcome, DUPLICATE,
    INVALID_CHOICE, REQUIRED,
};
use crate::domain::{Author, AuthorInput, AuthorRepository, BookRepository, DomainError, Link};

/// Add/edit form as submitted
#[derive(Debug, Default, Clone)]
pub struct AuthorForm {
    /// Hidden id, empty when adding
    pub author_id: String,
    pub name: String,
    /// Selected book ids as submitted
    pub books: Vec<String>,
}

/// Add/edit form as rendered
#[derive(Debug, Clone, Serialize)]
pub struct AuthorFormView {
    pub author_id: String,
    pub name: String,
    pub books: Vec<Choice>,
    pub errors: FormErrors,
}

pub type AuthorOutcome = FormOutcome<Author, AuthorFormView>;

pub async fn get_author(authors: &dyn AuthorRepository, id: i32) -> Result<Author, DomainError> {
    authors.find_by_id(id).await?.ok_or(DomainError::NotFound)
}

pub async fn blank_form(books: &dyn BookRepository) -> Result<AuthorFormView, DomainError> {
    Ok(AuthorFormView {
        author_id: String::new(),
        name: String::new(),
        books: mark_selected(books.choices().await?, &[]),
        errors: FormErrors::default(),
    })
}

/// Edit form with the author's current books pre-selected
pub async fn edit_form(
    authors: &dyn AuthorRepository,
    books: &dyn BookRepository,
    id: i32,
) -> Result<AuthorFormView, DomainError> {
    let author = get_author(authors, id).await?;
    let current: Vec<i32> = author.books.iter().map(|b| b.id).collect();

    Ok(AuthorFormView {
        author_id: author.id.to_string(),
        name: author.name,
        books: mark_selected(books.choices().await?, &current),
        errors: FormErrors::default(),
    })
}

pub async fn submit_author(
    authors: &dyn AuthorRepository,
    books: &dyn BookRepository,
    form: AuthorForm,
) -> Result<AuthorOutcome, DomainError> {
    let name = form.name.trim().to_string();
    let editing = !form.author_id.trim().is_empty();
    let editing_id: Option<i32> = form.author_id.trim().parse().ok();

    let mut errors = FormErrors::default();

    if name.is_empty() {
        errors.add("name", REQUIRED);
    } else {
        let same_name = authors.find_by_name(&name).await?;
        if same_name.iter().any(|a| Some(a.id) != editing_id) {
            errors.add("name", DUPLICATE);
        }
    }

    let candidates = books.choices().await?;
    let selected = parse_selection(&form.books, &candidates);
    if selected.is_none() {
        errors.add("books", INVALID_CHOICE);
    }

    let book_ids = match selected {
        Some(ids) if errors.is_empty() => ids,
        _ => {
            tracing::debug!("Author form rejected: {:?}", errors);
            return Ok(FormOutcome::Invalid(rerender(form, candidates, errors)));
        }
    };

    let id = if editing {
        Some(editing_id.ok_or(DomainError::NotFound)?)
    } else {
        None
    };

    match authors.save(AuthorInput { id, name, book_ids }).await {
        Ok(author) => {
            tracing::info!("Saved author {} ({})", author.id, author.name);
            Ok(FormOutcome::Saved {
                record: author,
                created: id.is_none(),
            })
        }
        Err(DomainError::Conflict(msg)) => {
            tracing::warn!("Author name conflict after validation: {}", msg);
            errors.add("name", DUPLICATE);
            Ok(FormOutcome::Invalid(rerender(form, candidates, errors)))
        }
        Err(e) => Err(e),
    }
}

fn rerender(form: AuthorForm, candidates: Vec<Link>, errors: FormErrors) -> AuthorFormView {
    let selected = submitted_ids(&form.books);
    AuthorFormView {
        author_id: form.author_id,
        name: form.name,
        books: mark_selected(candidates, &selected),
        errors,
    }
}

pub async fn delete_author(
    authors: &dyn AuthorRepository,
    record_id: &str,
) -> Result<(), DomainError> {
    let id: i32 = record_id.trim().parse().map_err(|_| DomainError::NotFound)?;
    authors.delete(id).await?;
    tracing::info!("Deleted author {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::ConflictingCatalog;

    #[tokio::test]
    async fn lost_name_race_becomes_duplicate_error() {
        let catalog = ConflictingCatalog::new();
        let form = AuthorForm {
            author_id: String::new(),
            name: "Jack London".to_string(),
            books: vec!["10".to_string()],
        };

        let outcome = submit_author(&catalog, &catalog, form).await.unwrap();

        let FormOutcome::Invalid(view) = outcome else {
            panic!("expected the form to be re-rendered");
        };
        let errors = serde_json::to_value(&view.errors).unwrap();
        assert_eq!(errors["name"], serde_json::json!([DUPLICATE]));
        assert_eq!(view.name, "Jack London");
        let selected: Vec<i32> = view.books.iter().filter(|c| c.selected).map(|c| c.id).collect();
        assert_eq!(selected, vec![10]);
    }
}
