//! Destination URL validation.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::domain::probe::{ProbeOutcome, RedirectProbe};
use crate::error::AppError;

static URL_SCHEME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://").unwrap());

/// Checks the syntax of a destination URL without any I/O.
///
/// The URL must start with `http://` or `https://` (lowercase) and parse as an
/// absolute URL with a host.
///
/// # Errors
///
/// Returns [`AppError::InvalidFormat`] otherwise.
pub fn check_url_format(url: &str) -> Result<(), AppError> {
    if !URL_SCHEME_REGEX.is_match(url) {
        return Err(AppError::invalid_format(json!({ "url": url })));
    }

    match Url::parse(url) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
        Ok(_) => Err(AppError::invalid_format(
            json!({ "url": url, "reason": "missing host" }),
        )),
        Err(e) => Err(AppError::invalid_format(
            json!({ "url": url, "reason": e.to_string() }),
        )),
    }
}

/// Validates destination URLs before they are shortened.
///
/// Validation runs two checks in order:
///
/// 1. [`check_url_format`] - pure syntax check; the probe is skipped on failure
/// 2. A redirect probe - rejects destinations that answer with 301, 302, 303,
///    307 or 308
///
/// Probe failures (timeout, DNS error, refused connection) are accepted: the
/// destination is treated as not being a redirect.
pub struct UrlValidator<P: RedirectProbe + ?Sized> {
    probe: Arc<P>,
}

impl<P: RedirectProbe + ?Sized> UrlValidator<P> {
    pub fn new(probe: Arc<P>) -> Self {
        Self { probe }
    }

    /// Runs the format check, then the redirect probe.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidFormat`] or [`AppError::IsRedirectTarget`].
    pub async fn validate(&self, url: &str) -> Result<(), AppError> {
        check_url_format(url)?;
        self.check_not_redirect(url).await
    }

    /// Runs only the redirect probe. The URL must already be well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::IsRedirectTarget`] if the probe detects a redirect.
    async fn check_not_redirect(&self, url: &str) -> Result<(), AppError> {
        match self.probe.probe(url).await {
            ProbeOutcome::RedirectDetected(status) => {
                warn!(url, status, "Rejected destination that is itself a redirect");
                Err(AppError::is_redirect(json!({ "url": url, "status": status })))
            }
            ProbeOutcome::NotRedirect(status) => {
                debug!(url, status, "Destination probe passed");
                Ok(())
            }
            ProbeOutcome::Unreachable(reason) => {
                warn!(url, reason = %reason, "Destination unreachable, accepting it as not a redirect");
                Ok(())
            }
        }
    }
}
