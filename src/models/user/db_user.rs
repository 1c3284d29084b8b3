//! Database row for a user account.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
  pub id: Uuid,
  pub name: String,
  pub created_at: DateTime<Utc>,
}
