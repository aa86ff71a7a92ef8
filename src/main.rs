use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_catalog::infrastructure::AppState;
use library_catalog::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().collect();
    let seed_only = args.iter().any(|arg| arg == "--seed-only");
    let seed_requested =
        seed_only || args.iter().any(|arg| arg == "--seed") || std::env::var("SEED_CATALOG").is_ok();

    // Initialize database
    let db = match db::init_db_with_logging(&config.database_url, config.sql_echo).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    if seed_requested {
        tracing::info!("Seeding catalog...");
        if let Err(e) = seed::seed_catalog(&db).await {
            tracing::error!("Failed to seed catalog: {}", e);
            std::process::exit(1);
        }
        if seed_only {
            return;
        }
    }

    let port = config.port;
    let state = AppState::from_config(db, config);

    if let Err(e) = server::serve(state, port).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
