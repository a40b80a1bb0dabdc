//! Link entity representing a short code to destination mapping.

use chrono::{DateTime, Utc};

/// Store-assigned link identifier.
pub type LinkId = i64;

/// A shortened link with its click counter.
///
/// `click_count` is a denormalized cache of the access-log count. It is only
/// ever changed through [`crate::domain::repositories::LinkRepository::increment_clicks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: LinkId,
    pub short_code: String,
    pub destination_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: LinkId,
        short_code: String,
        destination_url: String,
        created_at: DateTime<Utc>,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            short_code,
            destination_url,
            created_at,
            click_count,
        }
    }
}

/// Input data for inserting a new link.
///
/// The store assigns `id` and `created_at` and starts `click_count` at zero.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub short_code: String,
    pub destination_url: String,
}
