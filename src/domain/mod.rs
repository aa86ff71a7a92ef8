//! Domain layer - Pure business abstractions
//!
//! No Axum here. SeaORM only shows up in the `DbErr` conversion.
//! Only trait definitions, the access state machine and domain error types.

pub mod access;
pub mod errors;
pub mod repositories;

pub use access::{AccessFlags, AccessLevel, LoginOutcome, LogoutOutcome, Tier};
pub use errors::DomainError;
pub use repositories::*;
