//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::{Link, LinkId};

/// Request to create a short link.
///
/// Scheme and host checks happen in the service so they report
/// `invalid_format` rather than a generic validation error. A missing or empty
/// `destination_url` reaches that check as `""`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[serde(default)]
    #[validate(length(max = 2048, message = "destination_url must be at most 2048 characters"))]
    pub destination_url: String,

    /// Optional caller-chosen short code. Empty means "generate one".
    pub short_code: Option<String>,
}

/// JSON representation of a stored link.
///
/// `id` is rendered as a string so clients never depend on its numeric form.
#[serde_as]
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    #[serde_as(as = "DisplayFromStr")]
    pub id: LinkId,
    pub short_code: String,
    pub destination_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            destination_url: link.destination_url,
            created_at: link.created_at,
            click_count: link.click_count,
        }
    }
}

/// Confirmation returned by `DELETE /api/links/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
