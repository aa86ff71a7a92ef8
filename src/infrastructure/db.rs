use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Connect with default options and create the schema
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    init_db_with_logging(database_url, false).await
}

/// Connect, optionally echoing every SQL statement, and create the schema
pub async fn init_db_with_logging(
    database_url: &str,
    sql_echo: bool,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(sql_echo);

    // Every pooled connection to `:memory:` would open its own empty database
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS book (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS author (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Junction table, the pair is the primary key so it cannot repeat
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS association (
            book_id INTEGER NOT NULL,
            author_id INTEGER NOT NULL,
            PRIMARY KEY (book_id, author_id),
            FOREIGN KEY (book_id) REFERENCES book(id) ON DELETE CASCADE,
            FOREIGN KEY (author_id) REFERENCES author(id) ON DELETE CASCADE
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_association_author_id ON association(author_id)"
            .to_owned(),
    ))
    .await?;

    tracing::debug!("Catalog schema ready");

    Ok(())
}
