//! Utility functions for code generation and request handling.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`client_ip`] - Best-effort client IP extraction

pub mod client_ip;
pub mod code_generator;
