//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - Catalog seeding (seed)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Cookie sessions, access guards and form tokens (auth, csrf)
//! - Repository implementations (repositories)
//! - Application state (state)

pub mod auth;
pub mod config;
pub mod csrf;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;
