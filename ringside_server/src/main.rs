//! Boxing association server: tournaments, fight results and the betting desk
//! over a JSON document store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use ringside::store::{Database, DocumentStore, InMemoryStore, PgDocumentStore};
use ringside_server::{
    api,
    config::{ServerConfig, StorageBackend},
    logging, metrics,
};

const HELP: &str = "\
Run the ringside association server

USAGE:
  ringside_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:7070]
  --storage    BACKEND     memory or postgres          [default: env STORAGE_BACKEND or memory]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  STORAGE_BACKEND          memory or postgres
  DATABASE_URL             PostgreSQL connection string
  DB_MAX_CONNECTIONS       Pool size upper bound
  DB_MIN_CONNECTIONS       Pool size lower bound
  METRICS_BIND             Prometheus scrape address, metrics disabled when unset
  RUST_LOG                 Log filter (e.g., info,ringside=debug)
";

struct Args {
    bind: Option<SocketAddr>,
    storage: Option<StorageBackend>,
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        storage: pargs.opt_value_from_str("--storage")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.storage, args.database_url)?;
    config.validate()?;

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(Error::msg)?;
        tracing::info!("Prometheus metrics exported at http://{}/metrics", metrics_bind);
    }

    let store: Arc<dyn DocumentStore> = match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, documents are lost on restart");
            Arc::new(InMemoryStore::new())
        }
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database");
            let db = Database::new(&config.database)
                .await
                .context("Failed to connect to database")?;
            let store = PgDocumentStore::new(db.pool().clone());
            store
                .ensure_schema()
                .await
                .context("Failed to prepare documents table")?;
            tracing::info!("Database connected successfully");
            Arc::new(store)
        }
    };

    let backend = match config.storage {
        StorageBackend::Memory => "memory",
        StorageBackend::Postgres => "postgres",
    };
    let app = api::create_router(api::AppState::new(store, backend));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    tracing::info!(
        "Server is running at http://{} ({} storage). Press Ctrl+C to stop.",
        config.bind,
        backend
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down server...");

    Ok(())
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
