//! Dashboard: the signed-in user's own entries.

use crate::{app::AppState, auth::CurrentUser, store, views};
use axum::{
  Extension,
  extract::State,
  response::{IntoResponse, Response},
};
use tracing::error;

/// GET /dashboard — every entry the current user owns, both visibilities,
/// newest first. This is where successful mutations land.
pub async fn show_dashboard(
  State(state): State<AppState>,
  Extension(user): Extension<CurrentUser>,
) -> Response {
  match store::list_entries_for(&state.db, user.id).await {
    Ok(entries) => views::dashboard_page(&user, &entries).into_response(),
    Err(e) => {
      error!("dashboard error: {e}");
      views::server_error()
    }
  }
}
