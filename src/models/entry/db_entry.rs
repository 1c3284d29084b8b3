//! Database row for a log entry.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Whether an entry shows up on the public feed. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum Visibility {
  Public,
  Private,
}

impl Visibility {
  pub fn as_str(self) -> &'static str {
    match self {
      Visibility::Public => "public",
      Visibility::Private => "private",
    }
  }

  /// Parse a submitted form value. Anything but the two known states is
  /// rejected by validation, never coerced.
  pub fn parse(s: &str) -> Option<Visibility> {
    match s {
      "public" => Some(Visibility::Public),
      "private" => Some(Visibility::Private),
      _ => None,
    }
  }
}

/// One journal entry. `user_id` is set at creation and never updated.
#[derive(Debug, Clone, FromRow)]
pub struct DbEntry {
  pub id: Uuid,
  pub user_id: Uuid,
  pub title: String,
  pub body: String,
  pub visibility: Visibility,
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::Visibility;

  #[test]
  fn parse_known_states() {
    assert_eq!(Visibility::parse("public"), Some(Visibility::Public));
    assert_eq!(Visibility::parse("private"), Some(Visibility::Private));
    assert_eq!(Visibility::parse("Public"), None);
    assert_eq!(Visibility::parse(""), None);
  }
}
