//! Data access with explicit error kinds.
//!
//! Every operation reports which way it failed instead of collapsing into a
//! catch-all: handlers match on `NotFound`, `Invalid` and `Db` to pick the
//! response they owe the client.

use crate::models::{
  entry::{
    db_entry::{DbEntry, Visibility},
    entry_with_author::EntryWithAuthor,
  },
  user::db_user::DbUser,
};
use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("record not found")]
  NotFound,

  #[error("validation failed: {0}")]
  Invalid(String),

  #[error("database error: {0}")]
  Db(#[from] sqlx::Error),
}

/// Fields accepted from the add and edit forms. Checked before any write;
/// the same checks run on create and on update.
#[derive(Debug, Clone)]
pub struct EntryFields {
  pub title: String,
  pub body: String,
  pub visibility: String,
}

impl EntryFields {
  fn validate(&self) -> Result<(String, Visibility), StoreError> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(StoreError::Invalid("title must not be empty".into()));
    }
    let visibility = Visibility::parse(&self.visibility)
      .ok_or_else(|| StoreError::Invalid(format!("unknown visibility {:?}", self.visibility)))?;
    Ok((title.to_string(), visibility))
  }
}

const SELECT_ENTRY: &str =
  "SELECT id, user_id, title, body, visibility, created_at FROM entries";

const SELECT_ENTRY_WITH_AUTHOR: &str = "SELECT e.id, e.user_id, e.title, e.body, e.visibility, \
   e.created_at, u.name AS author_name FROM entries e JOIN users u ON u.id = e.user_id";

/// Insert a new entry owned by `owner` and hand back its id.
pub async fn create_entry(
  pool: &SqlitePool,
  owner: Uuid,
  fields: &EntryFields,
) -> Result<Uuid, StoreError> {
  let (title, visibility) = fields.validate()?;
  let id = Uuid::new_v4();
  sqlx::query(
    "INSERT INTO entries (id, user_id, title, body, visibility, created_at) VALUES (?, ?, ?, ?, ?, ?)",
  )
  .bind(id)
  .bind(owner)
  .bind(title)
  .bind(&fields.body)
  .bind(visibility)
  .bind(Utc::now())
  .execute(pool)
  .await?;
  Ok(id)
}

/// Public feed: public entries only, newest first, author resolved.
pub async fn list_public_entries(pool: &SqlitePool) -> Result<Vec<EntryWithAuthor>, StoreError> {
  let rows = sqlx::query_as::<_, EntryWithAuthor>(&format!(
    "{SELECT_ENTRY_WITH_AUTHOR} WHERE e.visibility = ? ORDER BY e.created_at DESC"
  ))
  .bind(Visibility::Public)
  .fetch_all(pool)
  .await?;
  Ok(rows)
}

/// Everything one user wrote, both visibilities, newest first.
pub async fn list_entries_for(pool: &SqlitePool, owner: Uuid) -> Result<Vec<DbEntry>, StoreError> {
  let rows = sqlx::query_as::<_, DbEntry>(&format!(
    "{SELECT_ENTRY} WHERE user_id = ? ORDER BY created_at DESC"
  ))
  .bind(owner)
  .fetch_all(pool)
  .await?;
  Ok(rows)
}

pub async fn find_entry(pool: &SqlitePool, id: Uuid) -> Result<EntryWithAuthor, StoreError> {
  sqlx::query_as::<_, EntryWithAuthor>(&format!("{SELECT_ENTRY_WITH_AUTHOR} WHERE e.id = ?"))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound)
}

/// Apply submitted fields to an existing entry, re-running the field checks,
/// and hand back the updated row. The owner column is never touched.
pub async fn update_entry(
  pool: &SqlitePool,
  id: Uuid,
  fields: &EntryFields,
) -> Result<DbEntry, StoreError> {
  let (title, visibility) = fields.validate()?;
  let done = sqlx::query("UPDATE entries SET title = ?, body = ?, visibility = ? WHERE id = ?")
    .bind(title)
    .bind(&fields.body)
    .bind(visibility)
    .bind(id)
    .execute(pool)
    .await?;
  if done.rows_affected() == 0 {
    return Err(StoreError::NotFound);
  }
  sqlx::query_as::<_, DbEntry>(&format!("{SELECT_ENTRY} WHERE id = ?"))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound)
}

/// Remove an entry by id. Deleting an absent id is not an error.
pub async fn delete_entry(pool: &SqlitePool, id: Uuid) -> Result<(), StoreError> {
  sqlx::query("DELETE FROM entries WHERE id = ?")
    .bind(id)
    .execute(pool)
    .await?;
  Ok(())
}

/// Look a user up by display name, creating the account on first login.
pub async fn find_or_create_user(pool: &SqlitePool, name: &str) -> Result<DbUser, StoreError> {
  let name = name.trim();
  if name.is_empty() {
    return Err(StoreError::Invalid("name must not be empty".into()));
  }
  if let Some(user) =
    sqlx::query_as::<_, DbUser>("SELECT id, name, created_at FROM users WHERE name = ?")
      .bind(name)
      .fetch_optional(pool)
      .await?
  {
    return Ok(user);
  }
  let user = DbUser {
    id: Uuid::new_v4(),
    name: name.to_string(),
    created_at: Utc::now(),
  };
  sqlx::query("INSERT INTO users (id, name, created_at) VALUES (?, ?, ?)")
    .bind(user.id)
    .bind(&user.name)
    .bind(user.created_at)
    .execute(pool)
    .await?;
  Ok(user)
}

/// Open a session for `user_id` and hand back the opaque token.
pub async fn create_session(pool: &SqlitePool, user_id: Uuid) -> Result<Uuid, StoreError> {
  let token = Uuid::new_v4();
  sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
    .bind(token)
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;
  Ok(token)
}

/// Resolve a session token to its user, if the session is still live.
pub async fn session_user(pool: &SqlitePool, token: Uuid) -> Result<Option<DbUser>, StoreError> {
  let user = sqlx::query_as::<_, DbUser>(
    "SELECT u.id, u.name, u.created_at FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = ?",
  )
  .bind(token)
  .fetch_optional(pool)
  .await?;
  Ok(user)
}

pub async fn delete_session(pool: &SqlitePool, token: Uuid) -> Result<(), StoreError> {
  sqlx::query("DELETE FROM sessions WHERE token = ?")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(())
}
