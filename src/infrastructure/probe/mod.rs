//! Outbound probe implementations.

pub mod http_probe;

pub use http_probe::HttpRedirectProbe;
