//! Login and logout

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::Value;

use super::form::FormFields;
use super::views::Page;
use crate::domain::LoginOutcome;
use crate::infrastructure::auth::Session;
use crate::infrastructure::AppState;

const WRONG_CREDENTIALS: &str = "Wrong credentials";

pub async fn login_form(mut session: Session) -> Response {
    let page = Page::new(&mut session, "login.html", "Login").with("error", Value::Null);
    (session, page).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
    fields: FormFields,
) -> Response {
    let username = fields.text("username");
    tracing::info!("Login attempt for user: {}", username);

    let matches = state
        .credentials
        .matches(&username, fields.get("password").unwrap_or_default());

    match session.access_mut().submit_login(&username, matches) {
        LoginOutcome::LoggedIn => {
            tracing::info!("User logged in: {}", username);
            session.flash("You were logged in");
        }
        LoginOutcome::Authorized => {
            tracing::debug!("Read access granted to: {}", username);
            session.flash("You were authorized");
        }
        LoginOutcome::Rejected => {
            tracing::warn!("Login rejected: empty username");
            let page =
                Page::new(&mut session, "login.html", "Login").with("error", WRONG_CREDENTIALS);
            return (session, page).into_response();
        }
    }

    (session, Redirect::to("/")).into_response()
}

pub async fn logout(mut session: Session) -> Response {
    let outcome = session.access_mut().logout();
    if outcome.was_logged_in {
        session.flash("You were logged out");
    }
    if outcome.was_authorized {
        session.flash("You were unauthorized");
    }
    (session, Redirect::to("/")).into_response()
}
