//! Outbound redirect probe contract.

use async_trait::async_trait;

/// HTTP statuses that mark a destination as a redirect.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// Classified result of probing a destination URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The destination answered with one of [`REDIRECT_STATUSES`].
    RedirectDetected(u16),
    /// The destination answered with any other status.
    NotRedirect(u16),
    /// No usable answer: timeout, DNS failure, refused connection, TLS error.
    Unreachable(String),
}

impl ProbeOutcome {
    /// Classifies a response status.
    pub fn from_status(status: u16) -> Self {
        if REDIRECT_STATUSES.contains(&status) {
            Self::RedirectDetected(status)
        } else {
            Self::NotRedirect(status)
        }
    }
}

/// Issues a single request to a destination without following redirects.
///
/// Implementations must bound the call with a timeout and must never fail:
/// every problem is reported as [`ProbeOutcome::Unreachable`].
///
/// # Implementations
///
/// - [`crate::infrastructure::probe::HttpRedirectProbe`] - `reqwest` HEAD probe
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectProbe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}
