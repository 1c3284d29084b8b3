//! Handlers for the log entry resource.
//!
//! Every route here sits behind `auth::require_auth`. Store failures map
//! onto the two generic error pages; an authorization miss on edit or
//! update answers with a redirect back to the public feed, not an error.

use crate::{
  app::AppState,
  auth::CurrentUser,
  http::redirect,
  store::{self, EntryFields, StoreError},
  views,
};
use axum::{
  Extension,
  extract::{Form, Path, State},
  response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

fn default_visibility() -> String {
  "public".to_string()
}

/// Fields submitted by the add and edit forms.
#[derive(Debug, Deserialize)]
pub struct EntryForm {
  pub title: String,
  #[serde(default)]
  pub body: String,
  #[serde(default = "default_visibility")]
  pub visibility: String,
}

impl From<EntryForm> for EntryFields {
  fn from(f: EntryForm) -> Self {
    EntryFields {
      title: f.title,
      body: f.body,
      visibility: f.visibility,
    }
  }
}

/// A malformed id behaves like any other lookup the store cannot satisfy.
fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
  Uuid::parse_str(raw).map_err(|e| StoreError::Invalid(format!("bad entry id: {e}")))
}

/// GET /logs/add
pub async fn add_form() -> Response {
  views::add_page().into_response()
}

/// POST /logs — persist a new entry owned by the current user.
pub async fn create_log(
  State(state): State<AppState>,
  Extension(user): Extension<CurrentUser>,
  Form(form): Form<EntryForm>,
) -> Response {
  match store::create_entry(&state.db, user.id, &form.into()).await {
    Ok(_) => redirect("/dashboard"),
    Err(e) => {
      error!("create entry error: {e}");
      views::server_error()
    }
  }
}

/// GET /logs — public entries, newest first.
pub async fn list_logs(
  State(state): State<AppState>,
  Extension(user): Extension<CurrentUser>,
) -> Response {
  match store::list_public_entries(&state.db).await {
    Ok(entries) => views::index_page(&entries, &user).into_response(),
    Err(e) => {
      error!("list entries error: {e}");
      views::server_error()
    }
  }
}

/// GET /logs/:id — detail view. Any signed-in user may read any entry by
/// id; a store failure renders the same not-found page as a missing entry.
pub async fn show_log(
  State(state): State<AppState>,
  Extension(user): Extension<CurrentUser>,
  Path(raw_id): Path<String>,
) -> Response {
  let lookup = match parse_id(&raw_id) {
    Ok(id) => store::find_entry(&state.db, id).await,
    Err(e) => Err(e),
  };
  match lookup {
    Ok(entry) => views::show_page(&entry, &user).into_response(),
    Err(StoreError::NotFound) => views::not_found(),
    Err(e) => {
      error!("show entry error: {e}");
      views::not_found()
    }
  }
}

/// GET /logs/edit/:id — edit form for the owner; everyone else goes back
/// to the feed.
pub async fn edit_form(
  State(state): State<AppState>,
  Extension(user): Extension<CurrentUser>,
  Path(raw_id): Path<String>,
) -> Response {
  let lookup = match parse_id(&raw_id) {
    Ok(id) => store::find_entry(&state.db, id).await,
    Err(e) => Err(e),
  };
  match lookup {
    Ok(entry) if entry.user_id != user.id => redirect("/logs"),
    Ok(entry) => views::edit_page(&entry).into_response(),
    Err(StoreError::NotFound) => views::not_found(),
    Err(e) => {
      error!("edit form error: {e}");
      views::server_error()
    }
  }
}

/// PUT /logs/:id — owner-only update with the field checks re-run.
pub async fn update_log(
  State(state): State<AppState>,
  Extension(user): Extension<CurrentUser>,
  Path(raw_id): Path<String>,
  Form(form): Form<EntryForm>,
) -> Response {
  let id = match parse_id(&raw_id) {
    Ok(id) => id,
    Err(e) => {
      error!("update entry error: {e}");
      return views::server_error();
    }
  };
  let entry = match store::find_entry(&state.db, id).await {
    Ok(entry) => entry,
    Err(StoreError::NotFound) => return views::not_found(),
    Err(e) => {
      error!("update lookup error: {e}");
      return views::server_error();
    }
  };
  if entry.user_id != user.id {
    return redirect("/logs");
  }
  match store::update_entry(&state.db, id, &form.into()).await {
    Ok(_) => redirect("/dashboard"),
    Err(StoreError::NotFound) => views::not_found(),
    Err(e) => {
      error!("update entry error: {e}");
      views::server_error()
    }
  }
}

/// DELETE /logs/:id
// TODO: deletion skips the owner check that update enforces; confirm
// whether that is intended before tightening it.
pub async fn delete_log(
  State(state): State<AppState>,
  Extension(_user): Extension<CurrentUser>,
  Path(raw_id): Path<String>,
) -> Response {
  let outcome = match parse_id(&raw_id) {
    Ok(id) => store::delete_entry(&state.db, id).await,
    Err(e) => Err(e),
  };
  match outcome {
    Ok(()) => redirect("/dashboard"),
    Err(e) => {
      error!("delete entry error: {e}");
      views::server_error()
    }
  }
}
