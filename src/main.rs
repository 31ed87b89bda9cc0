use tracing::{error, info};

use corkboard::{BoardRepository, Config, Database, NewBoard, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = corkboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        corkboard::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Corkboard stopped");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> corkboard::Result<()> {
    config.validate()?;

    info!("Corkboard - {}", config.forum.name);
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let db = Database::open(&config.database.path).await?;
    info!(path = %config.database.path, "Database ready");

    let boards = BoardRepository::new(db.pool());
    for seed in &config.boards {
        boards
            .ensure_exists(&NewBoard::new(&seed.name).with_description(&seed.description))
            .await?;
    }

    let server = WebServer::new(config, db)?;
    server.run().await?;
    Ok(())
}
