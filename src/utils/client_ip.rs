//! Client IP extraction for access logging.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Returns the best-effort client IP of a request.
///
/// When `behind_proxy` is set, the first address of `X-Forwarded-For` wins,
/// then `X-Real-IP`; otherwise, or when neither header carries a value, the
/// socket peer address is used. Header values are not verified and are only
/// trustworthy behind a reverse proxy that overwrites them.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = client_ip(&headers, Some(peer), true);
/// assert_eq!(ip.as_deref(), Some("203.0.113.7"));
/// ```
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<String> {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }

        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = real_ip {
            return Some(ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}
