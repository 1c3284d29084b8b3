//! Login and logout handlers.

use crate::{app::AppState, auth, http::redirect, store, views};
use axum::{
  Form,
  extract::State,
  http::{HeaderMap, header},
  response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  pub name: String,
}

/// GET / — login page. An existing session goes straight to the dashboard.
pub async fn login_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
  match auth::authenticated_user(&state, &headers).await {
    Ok(Some(_)) => redirect("/dashboard"),
    Ok(None) => views::login_page().into_response(),
    Err(e) => {
      // A broken session lookup should not lock anyone out of logging in.
      error!("login page session check error: {e}");
      views::login_page().into_response()
    }
  }
}

/// POST /auth/login — find or create the account, open a session, set the
/// cookie.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
  let user = match store::find_or_create_user(&state.db, &form.name).await {
    Ok(user) => user,
    Err(store::StoreError::Invalid(reason)) => {
      error!("login rejected: {reason}");
      return views::login_page().into_response();
    }
    Err(e) => {
      error!("login error: {e}");
      return views::server_error();
    }
  };
  let token = match store::create_session(&state.db, user.id).await {
    Ok(token) => token,
    Err(e) => {
      error!("session create error: {e}");
      return views::server_error();
    }
  };
  let mut res = redirect("/dashboard");
  res
    .headers_mut()
    .insert(header::SET_COOKIE, auth::login_cookie(token).parse().unwrap());
  res
}

/// GET /auth/logout — drop the session row and expire the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
  if let Some(token) = auth::session_token(&headers) {
    if let Err(e) = store::delete_session(&state.db, token).await {
      error!("logout error: {e}");
    }
  }
  let mut res = redirect("/");
  res
    .headers_mut()
    .insert(header::SET_COOKIE, auth::logout_cookie().parse().unwrap());
  res
}
