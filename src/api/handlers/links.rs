//! Handlers for link management endpoints (create, list, delete).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse, MessageResponse};
use crate::domain::entities::LinkId;
use crate::error::AppError;
use crate::state::AppState;

/// Parses a path id. Anything that is not an integer names no link.
pub(crate) fn parse_link_id(raw: &str) -> Result<LinkId, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found("Link not found", json!({ "id": raw })))
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "destination_url": "https://example.com/some/page",
///   "short_code": "promo2025"   // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with `invalid_format`, `is_redirect`, `code_in_use`
/// or `validation_error` (also used for malformed JSON bodies).
/// Returns 500 Internal Server Error with `exhausted_retries` or `store_unavailable`.
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.destination_url, payload.short_code)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists all links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links().await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Deletes a link. Its access history is kept.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the id is unknown or not numeric.
pub async fn delete_link_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_link_id(&id)?;

    state.link_service.delete_link(id).await?;

    Ok(Json(MessageResponse {
        message: "Link deleted".to_string(),
    }))
}
