//! Domain layer containing business entities and contracts.
//!
//! This module is independent of infrastructure and presentation concerns.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`probe`] - Outbound redirect probe contract
//!
//! Business logic lives in [`crate::application::services`]; implementations
//! of the traits defined here live in [`crate::infrastructure`].

pub mod entities;
pub mod probe;
pub mod repositories;
