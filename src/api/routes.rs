//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `GET    /links`            - List links, newest first
/// - `POST   /links`            - Create a short link
/// - `DELETE /links/{id}`       - Delete a link (access history is kept)
/// - `GET    /links/{id}/stats` - Click count and access history
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{id}", delete(delete_link_handler))
        .route("/links/{id}/stats", get(stats_handler))
}
