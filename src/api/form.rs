//! `application/x-www-form-urlencoded` bodies with repeated keys
//!
//! Multi-selects submit one pair per selected option (`authors=1&authors=3`),
//! which `axum::Form` cannot collect into a list.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};

use crate::infrastructure::auth::Session;
use crate::services::forms::{FormErrors, REQUIRED};

pub const INVALID_CSRF: &str = "The CSRF token is invalid.";

#[derive(Debug, Default, Clone)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn parse(body: &[u8]) -> Self {
        Self(url::form_urlencoded::parse(body).into_owned().collect())
    }

    /// First value submitted for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`, empty when absent
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Every value submitted for `key`, in order
    pub fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

/// Errors of a form whose only visible input is its submit button
pub fn check_token(session: &Session, fields: &FormFields) -> FormErrors {
    let mut errors = FormErrors::default();
    if !session.verify_csrf(fields.get("csrf_token").unwrap_or_default()) {
        errors.add("csrf_token", INVALID_CSRF);
    }
    errors
}

/// Hidden-field checks of the delete forms
pub fn check_delete(session: &Session, fields: &FormFields) -> FormErrors {
    let mut errors = check_token(session, fields);
    if fields.get("record_id").map_or(true, |id| id.trim().is_empty()) {
        errors.add("record_id", REQUIRED);
    }
    errors
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self::parse(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_repeated_keys() {
        let fields = FormFields::parse(b"title=The+Hobbit&authors=5&authors=2&book_id=");
        assert_eq!(fields.get("title"), Some("The Hobbit"));
        assert_eq!(fields.all("authors"), vec!["5".to_string(), "2".to_string()]);
        assert_eq!(fields.get("book_id"), Some(""));
        assert_eq!(fields.text("missing"), "");
        assert!(fields.all("missing").is_empty());
    }

    #[test]
    fn decodes_percent_escapes() {
        let fields = FormFields::parse(b"name=J.R.R.Tolkein&q=Bk%5CCD%20ROM");
        assert_eq!(fields.get("name"), Some("J.R.R.Tolkein"));
        assert_eq!(fields.get("q"), Some("Bk\\CD ROM"));
    }
}
