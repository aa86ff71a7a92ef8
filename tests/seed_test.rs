use library_catalog::domain::{AuthorRepository, BookInput, BookRepository, DomainError};
use library_catalog::infrastructure::{SeaOrmAuthorRepository, SeaOrmBookRepository};
use library_catalog::models::{association, author, book};
use library_catalog::{db, seed};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn counts(db: &DatabaseConnection) -> (u64, u64, u64) {
    (
        book::Entity::find().count(db).await.unwrap(),
        author::Entity::find().count(db).await.unwrap(),
        association::Entity::find().count(db).await.unwrap(),
    )
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let db = setup_test_db().await;

    let first = seed::seed_catalog(&db).await.expect("first seed");
    assert_eq!(first.books_inserted, 11);
    assert_eq!(first.authors_inserted, 6);
    assert_eq!(first.links_inserted, 19);
    assert_eq!(counts(&db).await, (11, 6, 19));

    let second = seed::seed_catalog(&db).await.expect("second seed");
    assert_eq!(second, seed::SeedReport::default());
    assert_eq!(counts(&db).await, (11, 6, 19));
}

#[tokio::test]
async fn test_seed_fills_gaps_only() {
    let db = setup_test_db().await;
    seed::seed_catalog(&db).await.unwrap();

    let books = SeaOrmBookRepository::new(db.clone());
    let fang = books.find_by_title("White Fang").await.unwrap();
    books.delete(fang[0].id).await.unwrap();
    assert_eq!(counts(&db).await, (10, 6, 18));

    let report = seed::seed_catalog(&db).await.unwrap();
    assert_eq!(report.books_inserted, 1);
    assert_eq!(report.authors_inserted, 0);
    assert_eq!(report.links_inserted, 1);
    assert_eq!(counts(&db).await, (11, 6, 19));
}

#[tokio::test]
async fn test_seeded_relations() {
    let db = setup_test_db().await;
    seed::seed_catalog(&db).await.unwrap();

    let authors = SeaOrmAuthorRepository::new(db.clone());
    let evi = authors.find_by_name("Evi Nemeth").await.unwrap();
    let evi = authors.find_by_id(evi[0].id).await.unwrap().unwrap();
    assert_eq!(evi.books.len(), 3);

    let books = SeaOrmBookRepository::new(db.clone());
    let wolf = books.suggest("Wolf", 10).await.unwrap();
    assert_eq!(wolf.len(), 1);
    assert_eq!(wolf[0].label, "The Sea Wolf");
}

#[tokio::test]
async fn test_suggestions_are_ordered_before_the_limit() {
    let db = setup_test_db().await;
    seed::seed_catalog(&db).await.unwrap();

    let books = SeaOrmBookRepository::new(db.clone());
    let titles: Vec<String> = books
        .suggest("", 3)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.label)
        .collect();
    assert_eq!(
        titles,
        vec![
            "Linux Administration Handbook (2nd Edition)",
            "The Adventures of Tom Bombadil",
            "The Call of the Wild",
        ]
    );

    let authors = SeaOrmAuthorRepository::new(db.clone());
    let names: Vec<String> = authors
        .suggest("", 3)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.label)
        .collect();
    assert_eq!(names, vec!["Evi Nemeth", "Garth Snyder", "J.R.R.Tolkein"]);

    let london: Vec<String> = authors
        .suggest("n", 10)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.label)
        .collect();
    let mut sorted = london.clone();
    sorted.sort();
    assert_eq!(london, sorted);
}

#[tokio::test]
async fn test_unique_title_is_enforced_by_the_store() {
    let db = setup_test_db().await;
    seed::seed_catalog(&db).await.unwrap();

    let books = SeaOrmBookRepository::new(db.clone());
    let err = books
        .save(BookInput {
            id: None,
            title: "The Hobbit".to_string(),
            author_ids: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "got {:?}", err);
    assert_eq!(counts(&db).await, (11, 6, 19));
}

#[tokio::test]
async fn test_save_ignores_vanished_related_ids() {
    let db = setup_test_db().await;
    seed::seed_catalog(&db).await.unwrap();

    let books = SeaOrmBookRepository::new(db.clone());
    let saved = books
        .save(BookInput {
            id: None,
            title: "Martin Eden".to_string(),
            author_ids: vec![9999],
        })
        .await
        .unwrap();
    assert!(saved.authors.is_empty());
}
