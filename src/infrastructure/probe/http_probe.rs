//! `reqwest`-backed redirect probe.

use async_trait::async_trait;
use reqwest::{Client, redirect};
use std::time::Duration;
use tracing::debug;

use crate::domain::probe::{ProbeOutcome, RedirectProbe};

const USER_AGENT: &str = concat!("shortlink/", env!("CARGO_PKG_VERSION"));

/// Sends one `HEAD` request per probe and never follows redirects.
///
/// The whole request, including connect and TLS, is bounded by the timeout
/// given at construction. Any transport failure becomes
/// [`ProbeOutcome::Unreachable`].
#[derive(Clone)]
pub struct HttpRedirectProbe {
    client: Client,
}

impl HttpRedirectProbe {
    /// Builds the probe client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RedirectProbe for HttpRedirectProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(url, status, "Destination probed");
                ProbeOutcome::from_status(status)
            }
            Err(e) => ProbeOutcome::Unreachable(e.to_string()),
        }
    }
}
