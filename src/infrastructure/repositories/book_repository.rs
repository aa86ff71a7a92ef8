//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

use super::{contains_pattern, unique_ids};
use crate::domain::{Book, BookInput, BookRepository, DomainError, Link};
use crate::models::association;
use crate::models::author::{self, Entity as AuthorEntity};
use crate::models::book::{self, ActiveModel, Column, Entity as BookEntity};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Authors of every book in `book_ids`, each list ordered by name
    async fn authors_by_book(
        &self,
        book_ids: Vec<i32>,
    ) -> Result<HashMap<i32, Vec<Link>>, DomainError> {
        let mut by_book: HashMap<i32, Vec<Link>> = HashMap::new();
        if book_ids.is_empty() {
            return Ok(by_book);
        }

        let rows = association::Entity::find()
            .filter(association::Column::BookId.is_in(book_ids))
            .find_also_related(AuthorEntity)
            .all(&self.db)
            .await?;

        for (link, author) in rows {
            if let Some(author) = author {
                by_book.entry(link.book_id).or_default().push(Link {
                    id: author.id,
                    label: author.name,
                });
            }
        }
        for authors in by_book.values_mut() {
            authors.sort_by(|a, b| a.label.cmp(&b.label));
        }

        Ok(by_book)
    }

    async fn with_authors(&self, models: Vec<book::Model>) -> Result<Vec<Book>, DomainError> {
        let mut authors = self
            .authors_by_book(models.iter().map(|m| m.id).collect())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| Book {
                authors: authors.remove(&m.id).unwrap_or_default(),
                id: m.id,
                title: m.title,
            })
            .collect())
    }

    /// Point the book at exactly `author_ids`, skipping ids that do not exist
    async fn replace_authors(
        txn: &DatabaseTransaction,
        book_id: i32,
        author_ids: &[i32],
    ) -> Result<(), DomainError> {
        association::Entity::delete_many()
            .filter(association::Column::BookId.eq(book_id))
            .exec(txn)
            .await?;

        let wanted = unique_ids(author_ids);
        if wanted.is_empty() {
            return Ok(());
        }

        let existing = AuthorEntity::find()
            .filter(author::Column::Id.is_in(wanted))
            .all(txn)
            .await?;
        if existing.is_empty() {
            return Ok(());
        }

        let links = existing.into_iter().map(|a| association::ActiveModel {
            book_id: Set(book_id),
            author_id: Set(a.id),
        });
        association::Entity::insert_many(links)
            .exec_without_returning(txn)
            .await?;

        Ok(())
    }
}

fn link(model: book::Model) -> Link {
    Link {
        id: model.id,
        label: model.title,
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        self.with_authors(books).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let Some(model) = BookEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let authors = model
            .find_related(AuthorEntity)
            .order_by_asc(author::Column::Name)
            .all(&self.db)
            .await?;

        Ok(Some(Book {
            id: model.id,
            title: model.title,
            authors: authors
                .into_iter()
                .map(|a| Link {
                    id: a.id,
                    label: a.name,
                })
                .collect(),
        }))
    }

    async fn find_by_title(&self, title: &str) -> Result<Vec<Link>, DomainError> {
        let books = BookEntity::find()
            .filter(Column::Title.eq(title))
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(link).collect())
    }

    async fn choices(&self) -> Result<Vec<Link>, DomainError> {
        let books = BookEntity::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(link).collect())
    }

    async fn save(&self, input: BookInput) -> Result<Book, DomainError> {
        let txn = self.db.begin().await?;

        let saved = match input.id {
            Some(id) => {
                let existing = BookEntity::find_by_id(id)
                    .one(&txn)
                    .await?
                    .ok_or(DomainError::NotFound)?;

                let mut active: ActiveModel = existing.into();
                active.title = Set(input.title);
                active.update(&txn).await?
            }
            None => {
                ActiveModel {
                    title: Set(input.title),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        Self::replace_authors(&txn, saved.id, &input.author_ids).await?;
        txn.commit().await?;

        tracing::debug!("Saved book {} ({:?})", saved.id, saved.title);

        self.find_by_id(saved.id).await?.ok_or(DomainError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        if BookEntity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::NotFound);
        }

        // Links go first so no association row ever points at a missing book
        association::Entity::delete_many()
            .filter(association::Column::BookId.eq(id))
            .exec(&txn)
            .await?;
        BookEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn search(&self, term: &str) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .filter(Expr::col(Column::Title).like(contains_pattern(term)))
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        self.with_authors(books).await
    }

    async fn suggest(&self, term: &str, limit: u64) -> Result<Vec<Link>, DomainError> {
        let books = BookEntity::find()
            .filter(Expr::col(Column::Title).like(contains_pattern(term)))
            .order_by_asc(Column::Title)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(link).collect())
    }
}
