//! Access-log entry recorded for every served redirect.

use chrono::{DateTime, Utc};

use super::link::LinkId;

/// One successful redirect of a short code.
///
/// `link_id` is a plain identifier, not an owning reference: entries outlive
/// the link they point to and are never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLogEntry {
    pub id: i64,
    pub link_id: LinkId,
    pub timestamp: DateTime<Utc>,
    pub client_ip: Option<String>,
}

impl AccessLogEntry {
    /// Creates a new AccessLogEntry instance.
    pub fn new(
        id: i64,
        link_id: LinkId,
        timestamp: DateTime<Utc>,
        client_ip: Option<String>,
    ) -> Self {
        Self {
            id,
            link_id,
            timestamp,
            client_ip,
        }
    }
}

/// Input data for appending an access-log entry.
///
/// `client_ip` is best-effort and may be absent behind proxies.
#[derive(Debug, Clone)]
pub struct NewAccessLogEntry {
    pub link_id: LinkId,
    pub timestamp: DateTime<Utc>,
    pub client_ip: Option<String>,
}
