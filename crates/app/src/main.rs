use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cashbook={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    let mut builder = engine::Engine::builder();
    if let Some(db) = parse_database(&server.database).await? {
        builder = builder.database(db);
    }
    if server.seed_sample_data {
        builder = builder.seed(engine::sample_transactions());
    }
    let engine = builder.build().await?;

    let addr = format!("{}:{}", server.bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

/// Opens and migrates the SQLite database, `None` keeps everything in memory.
async fn parse_database(
    config: &Database,
) -> Result<Option<sea_orm::DatabaseConnection>, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => return Ok(None),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::info!("Opening database {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(Some(database))
}
