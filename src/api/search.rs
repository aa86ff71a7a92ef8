//! Human search pages and the autocomplete endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use super::error::ApiError;
use super::form::FormFields;
use super::views::Page;
use crate::infrastructure::auth::AuthRequired;
use crate::infrastructure::AppState;
use crate::services::search_service::{self, MISSING_TERM};
use crate::services::{SearchQuery, SearchResults};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TermQuery {
    /// Substring to look for; matches everything when omitted
    pub term: Option<String>,
}

pub async fn search_form(AuthRequired(mut session): AuthRequired) -> Response {
    let page = Page::new(&mut session, "search.html", "Search").with("error", Value::Null);
    (session, page).into_response()
}

pub async fn search(
    AuthRequired(mut session): AuthRequired,
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Response, ApiError> {
    let Some(query) = SearchQuery::from_fields(fields.get("book_title"), fields.get("author_name"))
    else {
        let page = Page::new(&mut session, "search.html", "Search").with("error", MISSING_TERM);
        return Ok((session, page).into_response());
    };

    let page = match search_service::search(&*state.book_repo, &*state.author_repo, &query).await?
    {
        SearchResults::Books(books) => {
            Page::new(&mut session, "books_list.html", "Found Books").with("books", books)
        }
        SearchResults::Authors(authors) => {
            Page::new(&mut session, "authors_list.html", "Found Authors").with("authors", authors)
        }
    };
    Ok((session, page).into_response())
}

#[utoipa::path(
    get,
    path = "/search_book_api",
    params(TermQuery),
    responses(
        (status = 200, description = "Up to ten matching books as an id to title object"),
        (status = 401, description = "Session has no read access")
    )
)]
pub async fn search_book_api(
    AuthRequired(_session): AuthRequired,
    State(state): State<AppState>,
    Query(query): Query<TermQuery>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let term = query.term.unwrap_or_default();
    Ok(Json(
        search_service::suggest_books(&*state.book_repo, &term).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/search_author_api",
    params(TermQuery),
    responses(
        (status = 200, description = "Up to ten matching authors as an id to name object"),
        (status = 401, description = "Session has no read access")
    )
)]
pub async fn search_author_api(
    AuthRequired(_session): AuthRequired,
    State(state): State<AppState>,
    Query(query): Query<TermQuery>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let term = query.term.unwrap_or_default();
    Ok(Json(
        search_service::suggest_authors(&*state.author_repo, &term).await?,
    ))
}
