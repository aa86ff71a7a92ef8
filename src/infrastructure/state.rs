//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AuthorRepository, BookRepository};
use crate::infrastructure::auth::SessionKeys;
use crate::infrastructure::config::{Config, Credentials};
use crate::infrastructure::{SeaOrmAuthorRepository, SeaOrmBookRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Author repository
    pub author_repo: Arc<dyn AuthorRepository>,
    /// The account allowed into the mutation tier
    pub credentials: Arc<Credentials>,
    pub session_keys: SessionKeys,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, credentials: Credentials, session_keys: SessionKeys) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let author_repo = Arc::new(SeaOrmAuthorRepository::new(db.clone()));

        Self {
            db,
            book_repo,
            author_repo,
            credentials: Arc::new(credentials),
            session_keys,
        }
    }

    /// Build the state from loaded configuration, consuming its secrets
    pub fn from_config(db: DatabaseConnection, config: Config) -> Self {
        let session_keys = SessionKeys::new(
            &config.secret_key,
            &config.csrf_secret_key,
            config.session_ttl_hours,
        );
        Self::new(db, config.credentials, session_keys)
    }
}

impl axum::extract::FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.session_keys.clone()
    }
}

impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
