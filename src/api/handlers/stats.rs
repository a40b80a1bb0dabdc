//! Handler for per-link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use super::links::parse_link_id;
use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the click count and access history of a link.
///
/// # Endpoint
///
/// `GET /api/links/{id}/stats`
///
/// # Response
///
/// ```json
/// {
///   "click_count": 2,
///   "history": [
///     { "id": "1", "link_id": "7", "timestamp": "2025-01-01T12:00:00Z", "client_ip": "203.0.113.7" },
///     { "id": "5", "link_id": "7", "timestamp": "2025-01-01T12:03:10Z", "client_ip": null }
///   ]
/// }
/// ```
///
/// History is ordered oldest first.
///
/// # Errors
///
/// Returns 404 Not Found if the id is unknown or not numeric.
pub async fn stats_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let id = parse_link_id(&id)?;

    let stats = state.stats_service.get_link_stats(id).await?;

    Ok(Json(stats.into()))
}
