pub mod auth;
pub mod author;
pub mod books;
pub mod error;
pub mod form;
pub mod health;
pub mod index;
pub mod search;
pub mod views;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api_docs;
use crate::infrastructure::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        // Probes and docs
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(api_docs::openapi_json))
        // Session
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        // Books
        .route("/books", get(books::list_books))
        .route("/book/:id", get(books::view_book))
        .route("/add_book", get(books::add_book_form).post(books::add_book))
        .route("/update_book/:id", get(books::update_book_form))
        .route("/delete_book", post(books::delete_book))
        // Authors
        .route("/authors", get(author::list_authors))
        .route("/author/:id", get(author::view_author))
        .route(
            "/add_author",
            get(author::add_author_form).post(author::add_author),
        )
        .route("/update_author/:id", get(author::update_author_form))
        .route("/delete_author", post(author::delete_author))
        // Search
        .route("/search", get(search::search_form).post(search::search))
        .route("/search_book_api", get(search::search_book_api))
        .route("/search_author_api", get(search::search_author_api))
        .with_state(state)
}
