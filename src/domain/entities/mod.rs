//! Core domain entities.
//!
//! Entities are plain data structures without business logic. Each entity has
//! a companion `New*` struct carrying only the fields a caller supplies on
//! insertion; identifiers and timestamps assigned by the store are absent.
//!
//! - [`Link`] - A short code mapped to a destination URL
//! - [`AccessLogEntry`] - One served redirect

pub mod access_log;
pub mod link;

pub use access_log::{AccessLogEntry, NewAccessLogEntry};
pub use link::{Link, LinkId, NewLink};
