//! Session cookie handling and the signed-in-user gate.
//!
//! Sessions are rows in the `sessions` table keyed by an opaque token; the
//! browser holds the token in an HttpOnly cookie. `require_auth` resolves
//! the cookie once per request and stashes the result as a `CurrentUser`
//! extension for the handlers behind it.

use crate::{app::AppState, http, store, views};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use tracing::error;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sid";

/// The authenticated requester. The id comes out of the store already in
/// canonical `Uuid` form, so ownership checks compare typed ids, never raw
/// cookie text.
#[derive(Debug, Clone)]
pub struct CurrentUser {
  pub id: Uuid,
  pub name: String,
}

/// Pull the session token out of the Cookie header, if one is present and
/// well formed.
pub fn session_token(headers: &HeaderMap) -> Option<Uuid> {
  let raw = headers.get(header::COOKIE)?.to_str().ok()?;
  raw.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    if name == SESSION_COOKIE {
      Uuid::parse_str(value.trim()).ok()
    } else {
      None
    }
  })
}

/// Resolve the request's cookie to a user, if any.
pub async fn authenticated_user(
  state: &AppState,
  headers: &HeaderMap,
) -> Result<Option<CurrentUser>, store::StoreError> {
  let Some(token) = session_token(headers) else {
    return Ok(None);
  };
  let user = store::session_user(&state.db, token).await?;
  Ok(user.map(|u| CurrentUser {
    id: u.id,
    name: u.name,
  }))
}

/// Gate for every route that assumes a signed-in user. Unknown visitors are
/// sent to the login page rather than shown an error.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
  match authenticated_user(&state, req.headers()).await {
    Ok(Some(user)) => {
      req.extensions_mut().insert(user);
      next.run(req).await
    }
    Ok(None) => http::redirect("/"),
    Err(e) => {
      error!("session lookup error: {e}");
      views::server_error()
    }
  }
}

/// Set-Cookie value for a fresh login.
pub fn login_cookie(token: Uuid) -> String {
  format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Set-Cookie value that expires the session cookie.
pub fn logout_cookie() -> String {
  format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

#[cfg(test)]
mod tests {
  use super::session_token;
  use axum::http::{HeaderMap, header};
  use uuid::Uuid;

  fn headers(cookie: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::COOKIE, cookie.parse().unwrap());
    h
  }

  #[test]
  fn token_is_found_among_other_cookies() {
    let id = Uuid::new_v4();
    let h = headers(&format!("theme=dark; sid={id}; lang=en"));
    assert_eq!(session_token(&h), Some(id));
  }

  #[test]
  fn malformed_or_missing_token_is_none() {
    assert_eq!(session_token(&HeaderMap::new()), None);
    assert_eq!(session_token(&headers("sid=not-a-uuid")), None);
    assert_eq!(session_token(&headers("side=abc")), None);
  }
}
