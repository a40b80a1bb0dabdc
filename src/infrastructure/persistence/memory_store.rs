//! Process-local store implementing both repository traits.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::domain::entities::{AccessLogEntry, Link, LinkId, NewAccessLogEntry, NewLink};
use crate::domain::repositories::{AccessLogRepository, LinkRepository, StoreError};

/// Name reported for short code collisions, matching the PostgreSQL schema.
const SHORT_CODE_CONSTRAINT: &str = "links_short_code_key";

#[derive(Default)]
struct State {
    next_link_id: LinkId,
    next_log_id: i64,
    links: BTreeMap<LinkId, Link>,
    ids_by_code: HashMap<String, LinkId>,
    logs_by_link: HashMap<LinkId, Vec<AccessLogEntry>>,
}

/// In-memory store with the same uniqueness semantics as PostgreSQL.
///
/// Intended for development (`STORE_BACKEND=memory`) and tests. Every
/// operation takes a single lock, so `insert_unique` is atomic and
/// `increment_clicks` is a relative update. Data is lost on restart and is
/// not shared between processes.
///
/// # Use Cases
///
/// - Local runs without PostgreSQL
/// - HTTP handler tests
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory store (data is not persisted)");
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let mut state = self.state()?;

        if state.ids_by_code.contains_key(&new_link.short_code) {
            return Err(StoreError::UniquenessViolation {
                constraint: SHORT_CODE_CONSTRAINT.to_string(),
            });
        }

        state.next_link_id += 1;
        let link = Link::new(
            state.next_link_id,
            new_link.short_code,
            new_link.destination_url,
            Utc::now(),
            0,
        );

        state
            .ids_by_code
            .insert(link.short_code.clone(), link.id);
        state.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, StoreError> {
        let state = self.state()?;

        Ok(state
            .ids_by_code
            .get(short_code)
            .and_then(|id| state.links.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: LinkId) -> Result<Option<Link>, StoreError> {
        Ok(self.state()?.links.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: LinkId) -> Result<bool, StoreError> {
        let mut state = self.state()?;

        match state.links.remove(&id) {
            Some(link) => {
                state.ids_by_code.remove(&link.short_code);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_clicks(&self, id: LinkId, by: i64) -> Result<(), StoreError> {
        if let Some(link) = self.state()?.links.get_mut(&id) {
            link.click_count += by;
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Link>, StoreError> {
        // Ids grow with insertion order, so reverse id order is newest first.
        Ok(self.state()?.links.values().rev().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.state().map(|_| ())
    }
}

#[async_trait]
impl AccessLogRepository for InMemoryStore {
    async fn append_log(&self, entry: NewAccessLogEntry) -> Result<AccessLogEntry, StoreError> {
        let mut state = self.state()?;

        state.next_log_id += 1;
        let stored = AccessLogEntry::new(
            state.next_log_id,
            entry.link_id,
            entry.timestamp,
            entry.client_ip,
        );

        state
            .logs_by_link
            .entry(stored.link_id)
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    async fn find_logs_by_link(&self, link_id: LinkId) -> Result<Vec<AccessLogEntry>, StoreError> {
        Ok(self
            .state()?
            .logs_by_link
            .get(&link_id)
            .cloned()
            .unwrap_or_default())
    }
}
