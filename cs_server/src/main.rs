//! Tennis tournament administration server.
//!
//! Wires the PostgreSQL-backed stores into the domain managers and serves
//! the REST API.

use cs_server::{api, config, logging, metrics};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use pico_args::Arguments;

use courtside::auth::AuthManager;
use courtside::db::{
    Database, MatchStore, NotificationStore, PgMatchStore, PgNotificationStore,
    PgRegistrationStore, PgTournamentStore, PgUserStore, RegistrationStore, TournamentStore,
    UserStore,
};
use courtside::matches::MatchManager;
use courtside::notification::NotificationManager;
use courtside::registration::RegistrationManager;
use courtside::tournament::TournamentManager;

const HELP: &str = "\
Run the tournament administration server

USAGE:
  cs_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  METRICS_BIND             Prometheus exporter bind address (optional)
  DATABASE_URL             PostgreSQL connection string
  JWT_SECRET               JWT signing secret (required)
  PASSWORD_PEPPER          Password hashing pepper (required)
  (See .env file for all configuration options)
";

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

    let bind_override: Option<SocketAddr> = pargs.value_from_str("--bind").ok();
    let database_url_override: Option<String> = pargs.value_from_str("--db-url").ok();

    logging::init();

    let config = config::ServerConfig::from_env(bind_override, database_url_override)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        tracing::info!("Metrics exporter listening on {addr}");
    }

    tracing::info!("Connecting to database");
    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;
    tracing::info!("Database connected successfully");

    let pool = Arc::new(db.pool().clone());

    // Stores
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db.pool().clone()));
    let tournament_store: Arc<dyn TournamentStore> =
        Arc::new(PgTournamentStore::new(db.pool().clone()));
    let registration_store: Arc<dyn RegistrationStore> =
        Arc::new(PgRegistrationStore::new(db.pool().clone()));
    let match_store: Arc<dyn MatchStore> = Arc::new(PgMatchStore::new(db.pool().clone()));
    let notification_store: Arc<dyn NotificationStore> =
        Arc::new(PgNotificationStore::new(db.pool().clone()));

    // Managers
    let auth = Arc::new(AuthManager::new(
        users.clone(),
        config.security.password_pepper.clone(),
        config.security.jwt_secret.clone(),
    ));
    let notification_manager = NotificationManager::new(users.clone(), notification_store);
    let registrations = Arc::new(RegistrationManager::new(
        users.clone(),
        tournament_store.clone(),
        registration_store,
        notification_manager.clone(),
    ));
    let matches = Arc::new(MatchManager::new(
        users.clone(),
        tournament_store.clone(),
        match_store,
    ));
    let tournaments = Arc::new(TournamentManager::new(tournament_store));

    let state = api::AppState {
        auth,
        registrations,
        matches,
        notifications: Arc::new(notification_manager),
        tournaments,
        pool,
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {e}", config.bind))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    tracing::info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
