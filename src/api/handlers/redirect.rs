//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the code
/// 2. Append an access-log entry with the client IP
/// 3. Increment the link's click count
/// 4. Return 302 Found
///
/// The client IP comes from the socket peer, or from forwarding headers when
/// `BEHIND_PROXY` is set.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 Internal Server Error if the lookup or the log append fails.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let ip = client_ip(&headers, Some(peer), state.behind_proxy);

    let destination = state.redirect_service.resolve_and_record(&code, ip).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, destination)]))
}
