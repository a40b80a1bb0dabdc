//! DTOs for per-link statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::LinkStats;
use crate::domain::entities::{AccessLogEntry, LinkId};

/// Click count and full access history of a link.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub click_count: i64,
    pub history: Vec<AccessLogItem>,
}

/// One recorded redirect.
///
/// `client_ip` is `null` when it could not be determined.
#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessLogItem {
    #[serde_as(as = "DisplayFromStr")]
    pub id: i64,
    #[serde_as(as = "DisplayFromStr")]
    pub link_id: LinkId,
    pub timestamp: DateTime<Utc>,
    pub client_ip: Option<String>,
}

impl From<AccessLogEntry> for AccessLogItem {
    fn from(entry: AccessLogEntry) -> Self {
        Self {
            id: entry.id,
            link_id: entry.link_id,
            timestamp: entry.timestamp,
            client_ip: entry.client_ip,
        }
    }
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            click_count: stats.click_count,
            history: stats.history.into_iter().map(AccessLogItem::from).collect(),
        }
    }
}
