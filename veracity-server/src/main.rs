use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};
use veracity_core::{
    App, FileStore, HistoryStore, KeyValueStore, Scorer, SystemClock, VeracityConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "VERACITY_CONFIG", default_value = "veracity.toml")]
    config: String,

    /// Key-value store file (overrides storage.path)
    #[arg(long, env = "VERACITY_STORE")]
    store: Option<String>,

    /// Refuse to start when stored history is unreadable
    #[arg(long)]
    strict_history: bool,

    /// Print the loaded history size and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let mut config = match VeracityConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };
    if let Some(store) = args.store {
        config.storage.path = store;
    }

    // Init logging
    let directive: tracing_subscriber::filter::Directive = config
        .service
        .log_level
        .parse()
        .unwrap_or_else(|_| tracing::Level::INFO.into());
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    // Open storage and history
    let store_path = config.storage.resolved_path();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&store_path));
    tracing::info!("History store: {}", store_path.display());

    let app = if args.strict_history {
        match HistoryStore::load_strict(
            store,
            config.storage.history_key.clone(),
            config.history.capacity,
        ) {
            Ok(history) => App::new(
                Scorer::new(Arc::new(SystemClock), config.scorer.delay()),
                history,
            ),
            Err(e) => {
                eprintln!("Stored history is unusable: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match App::from_config(&config, store, Arc::new(SystemClock)) {
            Ok(app) => app,
            Err(e) => {
                eprintln!("Failed to open history store {}: {}", store_path.display(), e);
                std::process::exit(1);
            }
        }
    };

    if args.health {
        println!("✅ History store readable: {}", store_path.display());
        println!("✅ {} stored check(s)", app.history().len());
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    veracity_server::http::start_http_server(app, config, tx.subscribe()).await?;

    Ok(())
}
