//! Page view models
//!
//! Pages are rendered as JSON documents naming their template. Turning them
//! into HTML is left to whichever front end consumes them.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::AccessLevel;
use crate::infrastructure::auth::Session;
use crate::services::FormErrors;

#[derive(Debug, Serialize)]
pub struct Page {
    pub template: &'static str,
    pub title: String,
    pub access: AccessLevel,
    /// Messages queued by earlier requests, shown once
    pub flashes: Vec<String>,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl Page {
    /// Start a page, draining the session's pending flash messages
    pub fn new(session: &mut Session, template: &'static str, title: impl Into<String>) -> Self {
        Self {
            template,
            title: title.into(),
            access: session.access().level(),
            flashes: session.take_flashes(),
            context: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.context.insert(key.to_string(), value);
            }
            Err(e) => tracing::error!("Failed to serialize page field {}: {}", key, e),
        }
        self
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Page shown when a form's hidden fields fail to validate
pub fn validation_error(session: &mut Session, errors: FormErrors) -> Page {
    Page::new(session, "validation_error.html", "Validation Error").with("errors", errors)
}
