//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and the outbound redirect probe.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL and in-memory stores
//! - [`probe`] - HTTP HEAD probe for destination URLs

pub mod persistence;
pub mod probe;
