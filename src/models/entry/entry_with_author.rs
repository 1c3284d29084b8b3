//! Entry joined with its author for display.

use super::db_entry::Visibility;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// What the list and detail views work with: the entry plus the author's
/// display name resolved through the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct EntryWithAuthor {
  pub id: Uuid,
  pub user_id: Uuid,
  pub title: String,
  pub body: String,
  pub visibility: Visibility,
  pub created_at: DateTime<Utc>,
  pub author_name: String,
}
