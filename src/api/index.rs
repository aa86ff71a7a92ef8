use axum::response::{IntoResponse, Response};

use super::views::Page;
use crate::infrastructure::auth::Session;

/// Landing page, open to everyone
pub async fn index(mut session: Session) -> Response {
    let page = Page::new(&mut session, "index.html", "Library Catalog");
    (session, page).into_response()
}
