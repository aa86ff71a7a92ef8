//! Book pages and form handlers

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use super::error::{parse_id, ApiError};
use super::form::{check_delete, check_token, FormFields};
use super::views::{validation_error, Page};
use crate::infrastructure::auth::{AuthRequired, LoginRequired, Session};
use crate::infrastructure::AppState;
use crate::services::{book_service, BookForm, BookFormView, FormOutcome};

pub async fn list_books(
    AuthRequired(mut session): AuthRequired,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let books = state.book_repo.find_all().await?;
    let page = Page::new(&mut session, "books_list.html", "Books List").with("books", books);
    Ok((session, page).into_response())
}

pub async fn view_book(
    AuthRequired(mut session): AuthRequired,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let book = book_service::get_book(&*state.book_repo, parse_id(&id)?).await?;
    let delete_form = json!({
        "record_id": book.id.to_string(),
        "csrf_token": session.csrf_token(),
    });

    let page = Page::new(&mut session, "book.html", format!("Book: {}", book.title))
        .with("book", book)
        .with("delete_form", delete_form);
    Ok((session, page).into_response())
}

pub async fn add_book_form(
    LoginRequired(mut session): LoginRequired,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let form = book_service::blank_form(&*state.author_repo).await?;
    let page = form_page(&mut session, "Add Book", form);
    Ok((session, page).into_response())
}

pub async fn update_book_form(
    LoginRequired(mut session): LoginRequired,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let form =
        book_service::edit_form(&*state.book_repo, &*state.author_repo, parse_id(&id)?).await?;
    let page = form_page(&mut session, "Edit Book", form);
    Ok((session, page).into_response())
}

/// Create when `book_id` is empty, update otherwise
pub async fn add_book(
    LoginRequired(mut session): LoginRequired,
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, ApiError> {
    let token_errors = check_token(&session, &fields);
    if !token_errors.is_empty() {
        tracing::warn!("Book form submitted with a bad CSRF token");
        let page = validation_error(&mut session, token_errors);
        return Ok((session, page).into_response());
    }

    let form = BookForm {
        book_id: fields.text("book_id"),
        title: fields.text("title"),
        authors: fields.all("authors"),
    };

    match book_service::submit_book(&*state.book_repo, &*state.author_repo, form).await? {
        FormOutcome::Saved { record, created } => {
            session.flash(if created { "Added book" } else { "Updated book" });
            let target = format!("/book/{}", record.id);
            Ok((session, Redirect::to(&target)).into_response())
        }
        FormOutcome::Invalid(view) => {
            let title = if view.book_id.trim().is_empty() {
                "Add Book"
            } else {
                "Edit Book"
            };
            let page = form_page(&mut session, title, view);
            Ok((session, page).into_response())
        }
    }
}

pub async fn delete_book(
    LoginRequired(mut session): LoginRequired,
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, ApiError> {
    let errors = check_delete(&session, &fields);
    if !errors.is_empty() {
        let page = validation_error(&mut session, errors);
        return Ok((session, page).into_response());
    }

    book_service::delete_book(&*state.book_repo, &fields.text("record_id")).await?;
    session.flash("The book had been removed");
    Ok((session, Redirect::to("/books")).into_response())
}

fn form_page(session: &mut Session, title: &str, form: BookFormView) -> Page {
    let csrf_token = session.csrf_token();
    Page::new(session, "add_book.html", title)
        .with("form", form)
        .with("csrf_token", csrf_token)
}
