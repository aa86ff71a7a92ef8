//! Idempotent catalog seeding
//!
//! Every row goes in through `ON CONFLICT DO NOTHING` and ids are read back
//! by their unique key, so running the seed again converges on the same
//! rows. The whole run is one transaction.

use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::collections::HashMap;

use crate::models::{association, author, book};

/// Title and author names of every seeded book
pub const SEED_BOOKS: &[(&str, &[&str])] = &[
    (
        "Linux Administration Handbook (2nd Edition)",
        &["Evi Nemeth", "Garth Snyder", "Trent R. Hein"],
    ),
    (
        "UNIX System Administration Handbook (3rd Edition)",
        &["Evi Nemeth", "Garth Snyder", "Scott Seebass", "Trent R. Hein"],
    ),
    (
        "UNIX System Administration Handbook (Bk\\CD ROM) (2nd Edition)",
        &["Evi Nemeth", "Garth Snyder", "Scott Seebass", "Trent R. Hein"],
    ),
    ("The Hobbit", &["J.R.R.Tolkein"]),
    ("The Lord of the Rings Novel", &["J.R.R.Tolkein"]),
    ("The Unfinished Tales", &["J.R.R.Tolkein"]),
    ("The Adventures of Tom Bombadil", &["J.R.R.Tolkein"]),
    ("White Fang", &["Jack London"]),
    ("The Call of the Wild", &["Jack London"]),
    ("The Sea Wolf", &["Jack London"]),
    ("To Build a Fire", &["Jack London"]),
];

/// Rows actually written by one seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub books_inserted: u64,
    pub authors_inserted: u64,
    pub links_inserted: u64,
}

pub async fn seed_catalog(db: &DatabaseConnection) -> Result<SeedReport, DbErr> {
    let txn = db.begin().await?;
    let mut report = SeedReport::default();
    let mut author_ids: HashMap<&str, i32> = HashMap::new();

    for (title, names) in SEED_BOOKS {
        let (book_id, inserted) = upsert_book(&txn, title).await?;
        report.books_inserted += inserted;

        for name in names.iter() {
            let author_id = match author_ids.get(name) {
                Some(id) => *id,
                None => {
                    let (id, inserted) = upsert_author(&txn, name).await?;
                    report.authors_inserted += inserted;
                    author_ids.insert(*name, id);
                    id
                }
            };

            let link = association::ActiveModel {
                book_id: Set(book_id),
                author_id: Set(author_id),
            };
            report.links_inserted += association::Entity::insert(link)
                .on_conflict(
                    OnConflict::columns([
                        association::Column::BookId,
                        association::Column::AuthorId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }
    }

    txn.commit().await?;

    tracing::info!(
        "Seed finished: {} books, {} authors, {} links inserted",
        report.books_inserted,
        report.authors_inserted,
        report.links_inserted
    );

    Ok(report)
}

async fn upsert_book(txn: &DatabaseTransaction, title: &str) -> Result<(i32, u64), DbErr> {
    let row = book::ActiveModel {
        title: Set(title.to_owned()),
        ..Default::default()
    };
    let inserted = book::Entity::insert(row)
        .on_conflict(
            OnConflict::column(book::Column::Title)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;

    let existing = book::Entity::find()
        .filter(book::Column::Title.eq(title))
        .one(txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("book {:?}", title)))?;

    Ok((existing.id, inserted))
}

async fn upsert_author(txn: &DatabaseTransaction, name: &str) -> Result<(i32, u64), DbErr> {
    let row = author::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    };
    let inserted = author::Entity::insert(row)
        .on_conflict(
            OnConflict::column(author::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;

    let existing = author::Entity::find()
        .filter(author::Column::Name.eq(name))
        .one(txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("author {:?}", name)))?;

    Ok((existing.id, inserted))
}
