//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

use super::{contains_pattern, unique_ids};
use crate::domain::{Author, AuthorInput, AuthorRepository, DomainError, Link};
use crate::models::association;
use crate::models::author::{self, ActiveModel, Column, Entity as AuthorEntity};
use crate::models::book::{self, Entity as BookEntity};

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn books_by_author(
        &self,
        author_ids: Vec<i32>,
    ) -> Result<HashMap<i32, Vec<Link>>, DomainError> {
        let mut by_author: HashMap<i32, Vec<Link>> = HashMap::new();
        if author_ids.is_empty() {
            return Ok(by_author);
        }

        let rows = association::Entity::find()
            .filter(association::Column::AuthorId.is_in(author_ids))
            .find_also_related(BookEntity)
            .all(&self.db)
            .await?;

        for (link, book) in rows {
            if let Some(book) = book {
                by_author.entry(link.author_id).or_default().push(Link {
                    id: book.id,
                    label: book.title,
                });
            }
        }
        for books in by_author.values_mut() {
            books.sort_by(|a, b| a.label.cmp(&b.label));
        }

        Ok(by_author)
    }

    async fn with_books(&self, models: Vec<author::Model>) -> Result<Vec<Author>, DomainError> {
        let mut books = self
            .books_by_author(models.iter().map(|m| m.id).collect())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| Author {
                books: books.remove(&m.id).unwrap_or_default(),
                id: m.id,
                name: m.name,
            })
            .collect())
    }

    async fn replace_books(
        txn: &DatabaseTransaction,
        author_id: i32,
        book_ids: &[i32],
    ) -> Result<(), DomainError> {
        association::Entity::delete_many()
            .filter(association::Column::AuthorId.eq(author_id))
            .exec(txn)
            .await?;

        let wanted = unique_ids(book_ids);
        if wanted.is_empty() {
            return Ok(());
        }

        let existing = BookEntity::find()
            .filter(book::Column::Id.is_in(wanted))
            .all(txn)
            .await?;
        if existing.is_empty() {
            return Ok(());
        }

        let links = existing.into_iter().map(|b| association::ActiveModel {
            book_id: Set(b.id),
            author_id: Set(author_id),
        });
        association::Entity::insert_many(links)
            .exec_without_returning(txn)
            .await?;

        Ok(())
    }
}

fn link(model: author::Model) -> Link {
    Link {
        id: model.id,
        label: model.name,
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        self.with_books(authors).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError> {
        let Some(model) = AuthorEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let books = model
            .find_related(BookEntity)
            .order_by_asc(book::Column::Title)
            .all(&self.db)
            .await?;

        Ok(Some(Author {
            id: model.id,
            name: model.name,
            books: books
                .into_iter()
                .map(|b| Link {
                    id: b.id,
                    label: b.title,
                })
                .collect(),
        }))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Link>, DomainError> {
        let authors = AuthorEntity::find()
            .filter(Column::Name.eq(name))
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(link).collect())
    }

    async fn choices(&self) -> Result<Vec<Link>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(link).collect())
    }

    async fn save(&self, input: AuthorInput) -> Result<Author, DomainError> {
        let txn = self.db.begin().await?;

        let saved = match input.id {
            Some(id) => {
                let existing = AuthorEntity::find_by_id(id)
                    .one(&txn)
                    .await?
                    .ok_or(DomainError::NotFound)?;

                let mut active: ActiveModel = existing.into();
                active.name = Set(input.name);
                active.update(&txn).await?
            }
            None => {
                ActiveModel {
                    name: Set(input.name),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        Self::replace_books(&txn, saved.id, &input.book_ids).await?;
        txn.commit().await?;

        tracing::debug!("Saved author {} ({:?})", saved.id, saved.name);

        self.find_by_id(saved.id).await?.ok_or(DomainError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        if AuthorEntity::find_by_id(id).one(&txn).await?.is_none() {
            return Err(DomainError::NotFound);
        }

        association::Entity::delete_many()
            .filter(association::Column::AuthorId.eq(id))
            .exec(&txn)
            .await?;
        AuthorEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn search(&self, term: &str) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .filter(Expr::col(Column::Name).like(contains_pattern(term)))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        self.with_books(authors).await
    }

    async fn suggest(&self, term: &str, limit: u64) -> Result<Vec<Link>, DomainError> {
        let authors = AuthorEntity::find()
            .filter(Expr::col(Column::Name).like(contains_pattern(term)))
            .order_by_asc(Column::Name)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(link).collect())
    }
}
