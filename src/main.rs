use actix_web::{App, HttpServer, middleware::Logger};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shp::{
  adapters::http::{RequestIdMiddleware, configure_account_routes, configure_ops_routes},
  application::account::RegisterAccountUseCase,
  domain::account::services::AccountService,
  infrastructure::{
    config::Config,
    persistence::postgres::PostgresAccountRepository,
    security::{Argon2PasswordHasher, JwtTokenIssuer, TokenSettings},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shp=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting sign-up service");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
  })?;
  tracing::info!(security = ?config.security, "Configuration loaded successfully");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(e.to_string())
    })?;
  tracing::info!("Database migrations completed");

  let account_repo = Arc::new(PostgresAccountRepository::new(db_pool));
  let password_hasher = Arc::new(
    Argon2PasswordHasher::new().map_err(|e| std::io::Error::other(e.to_string()))?,
  );
  let token_issuer = Arc::new(JwtTokenIssuer::new(TokenSettings::from_config(
    &config.security,
  )));

  let account_service = Arc::new(AccountService::new(
    account_repo,
    password_hasher,
    token_issuer,
  ));
  let register_use_case = Arc::new(RegisterAccountUseCase::new(
    account_service,
    Duration::from_secs(config.security.request_timeout_seconds),
  ));

  // Cancelled once the server stops; in-flight registrations abort with it
  let shutdown = CancellationToken::new();

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  let request_shutdown = shutdown.clone();
  let result = HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware::new())
      .configure(|cfg| {
        configure_account_routes(cfg, register_use_case.clone(), request_shutdown.clone())
      })
      .configure(configure_ops_routes)
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await;

  shutdown.cancel();
  tracing::info!("Server stopped");

  result
}
