//! Repository implementations using SeaORM

pub mod author_repository;
pub mod book_repository;

pub use author_repository::SeaOrmAuthorRepository;
pub use book_repository::SeaOrmBookRepository;

use sea_orm::sea_query::LikeExpr;
use std::collections::HashSet;

/// Escape LIKE wildcards so `term` matches literally
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `LIKE '%term%'` with the wildcards in `term` escaped
pub(crate) fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(term))).escape('\\')
}

/// Drop repeated ids, keeping first-seen order
pub(crate) fn unique_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
