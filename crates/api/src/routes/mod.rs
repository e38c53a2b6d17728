pub mod health;

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login              mint an admin session token (public)
///
/// /categories              list (public), create (admin)
/// /categories/{id}         delete (admin)
///
/// /pictures                list (public), record metadata (admin),
///                          delete-all (admin)
/// /pictures/archive        bulk ZIP download (public)
/// /pictures/{id}           reassign category, delete (admin)
///
/// /upload                  issue a scoped upload token (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route("/categories/{id}", delete(handlers::categories::remove))
        .route(
            "/pictures",
            get(handlers::pictures::list)
                .post(handlers::pictures::create)
                .delete(handlers::pictures::delete_all),
        )
        .route("/pictures/archive", get(handlers::archive::download))
        .route(
            "/pictures/{id}",
            patch(handlers::pictures::update_category).delete(handlers::pictures::remove),
        )
        .route("/upload", post(handlers::upload::issue_token))
}
