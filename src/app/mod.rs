//! Application setup and runtime.

use crate::{db, http};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::net::SocketAddr;
use tracing::info;

/// Shared application state. The pool is handed to every handler through
/// Axum state; nothing holds a process-wide connection.
#[derive(Clone)]
pub struct AppState {
  pub db: SqlitePool,
}

/// Start the HTTP server with configured environment.
pub async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  crate::util::init_tracing();

  let db_url =
    std::env::var("LOGBOOK_DATABASE").unwrap_or_else(|_| "sqlite://logbook.db".to_string());
  let db_url = db::ensure_sqlite_path(&db_url);
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;
  db::run_migrations(&pool).await?;

  let state = AppState { db: pool.clone() };

  let app = http::build_router(state);

  let addr: SocketAddr = std::env::var("LOGBOOK_ADDR")
    .unwrap_or_else(|_| "127.0.0.1:8040".to_string())
    .parse()?;

  info!("logbook login page:  http://{}/", addr);
  info!("public feed:         http://{}/logs", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;
  Ok(())
}
