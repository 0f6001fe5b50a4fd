#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use hackathon_buddy::{
    bot::{self, BotData},
    config::{database, planner},
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load planner settings (storage selection, categories, palette)
    let config = planner::load_default_config()
        .inspect_err(|e| error!("Critical error loading planner configuration: {e}"))?;
    info!(
        "Planner configuration loaded, local storage under {:?}",
        config.storage.local_dir
    );

    // 4. Connect to the database and create missing tables
    if env::var("DATABASE_URL").is_err() {
        // The default SQLite file lives here
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in the config
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(Arc::new(db), Arc::new(config))).await
}
