use std::sync::Arc;
use tracing::{error, info};

use tender_core::services::TenderService;
use tender_infrastructure::database::{connection, PgStore};
use tender_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Configuration comes first: it carries the log settings
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tender_shared::telemetry::init_telemetry(&config.log)?;
    info!("{} ({}) starting schema migration...", config.app.name, config.app.env);

    // Connect to Database
    let pool = connection::create_pool(&config.database).await?;
    info!("Database connection established.");

    if let Err(e) = connection::run_migrations(&pool).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    connection::ping(&pool).await?;
    info!("Migrations applied.");

    // Smoke-check the store through the service layer
    let tenders = TenderService::new(Arc::new(PgStore::new(pool.clone())));
    let visible = tenders.list().await?;
    info!("Tender store ready, {} tenders on record.", visible.len());

    pool.close().await;
    Ok(())
}
