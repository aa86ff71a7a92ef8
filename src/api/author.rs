//! Author pages and form handlers

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
use crate::services::{author_service, AuthorForm, AuthorFormView, FormOutcome};

pub async fn list_authors(
    AuthRequired(mut session): AuthRequired,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let authors = state.author_repo.find_all().await?;
    let page =
        Page::new(&mut session, "authors_list.html", "Authors List").with("authors", authors);
    Ok((session, page).into_response())
}

pub async fn view_author(
    AuthRequired(mut session): AuthRequired,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let author = author_service::get_author(&*state.author_repo, parse_id(&id)?).await?;
    let delete_form = json!({
        "record_id": author.id.to_string(),
        "csrf_token": session.csrf_token(),
    });

    let page = Page::new(&mut session, "author.html", format!("Author: {}", author.name))
        .with("author", author)
        .with("delete_form", delete_form);
    Ok((session, page).into_response())
}

pub async fn add_author_form(
    LoginRequired(mut session): LoginRequired,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let form = author_service::blank_form(&*state.book_repo).await?;
    let page = form_page(&mut session, "Add Author", form);
    Ok((session, page).into_response())
}

pub async fn update_author_form(
    LoginRequired(mut session): LoginRequired,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let form =
        author_service::edit_form(&*state.author_repo, &*state.book_repo, parse_id(&id)?).await?;
    let page = form_page(&mut session, "Edit Author", form);
    Ok((session, page).into_response())
}

pub async fn add_author(
    LoginRequired(mut session): LoginRequired,
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, ApiError> {
    let token_errors = check_token(&session, &fields);
    if !token_errors.is_empty() {
        tracing::warn!("Author form submitted with a bad CSRF token");
        let page = validation_error(&mut session, token_errors);
        return Ok((session, page).into_response());
    }

    let form = AuthorForm {
        author_id: fields.text("author_id"),
        name: fields.text("name"),
        books: fields.all("books"),
    };

    match author_service::submit_author(&*state.author_repo, &*state.book_repo, form).await? {
        FormOutcome::Saved { record, created } => {
            session.flash(if created { "Added author" } else { "Updated author" });
            let target = format!("/author/{}", record.id);
            Ok((session, Redirect::to(&target)).into_response())
        }
        FormOutcome::Invalid(view) => {
            let title = if view.author_id.trim().is_empty() {
                "Add Author"
            } else {
                "Edit Author"
            };
            let page = form_page(&mut session, title, view);
            Ok((session, page).into_response())
        }
    }
}

pub async fn delete_author(
    LoginRequired(mut session): LoginRequired,
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, ApiError> {
    let errors = check_delete(&session, &fields);
    if !errors.is_empty() {
        let page = validation_error(&mut session, errors);
        return Ok((session, page).into_response());
    }

    author_service::delete_author(&*state.author_repo, &fields.text("record_id")).await?;
    session.flash("The author had been removed");
    Ok((session, Redirect::to("/authors")).into_response())
}

fn form_page(session: &mut Session, title: &str, form: AuthorFormView) -> Page {
    let csrf_token = session.csrf_token();
    Page::new(session, "add_author.html", title)
        .with("form", form)
        .with("csrf_token", csrf_token)
}
