//! HTTP router and handlers.

use crate::{app::AppState, auth};
use axum::{
    Router,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};

pub mod dashboard;
pub mod logs;
pub mod session;

/// 302 redirect. Form posts answer with one of these rather than a page.
pub fn redirect(to: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, to.to_string())]).into_response()
}

/// Assemble the HTTP router with all routes.
pub fn build_router(state: AppState) -> Router {
    let authed = Router::new()
        .route("/dashboard", get(dashboard::show_dashboard))
        .route("/logs/add", get(logs::add_form))
        .route("/logs", get(logs::list_logs).post(logs::create_log))
        .route("/logs/edit/:id", get(logs::edit_form))
        .route(
            "/logs/:id",
            get(logs::show_log)
                .put(logs::update_log)
                .delete(logs::delete_log),
        )
        .route("/auth/logout", get(session::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .merge(authed)
        .route("/", get(session::login_form))
        .route("/auth/login", post(session::login))
        .with_state(state)
}
